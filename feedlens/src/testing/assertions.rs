//! Test assertions for extracted items.

use crate::extract::ContentItem;

/// Asserts that every item has a non-blank, trimmed title and a confidence
/// in [0, 1].
pub fn assert_items_well_formed(items: &[ContentItem]) {
    for item in items {
        assert!(
            !item.title.trim().is_empty() && item.title.trim() == item.title,
            "Expected a trimmed, non-empty title, got {:?}",
            item.title
        );
        assert!(
            (0.0..=1.0).contains(&item.confidence),
            "Expected confidence in [0, 1], got {} for {:?}",
            item.confidence,
            item.title
        );
    }
}

/// Asserts the item titles, in order.
pub fn assert_titles(items: &[ContentItem], expected: &[&str]) {
    let titles: Vec<&str> = items.iter().map(|i| i.title.as_str()).collect();
    assert_eq!(titles, expected, "Unexpected titles");
}

/// Asserts that every item has at least the given confidence.
pub fn assert_min_confidence(items: &[ContentItem], min: f64) {
    for item in items {
        assert!(
            item.confidence >= min,
            "Expected confidence >= {min}, got {} for {:?}",
            item.confidence,
            item.title
        );
    }
}
