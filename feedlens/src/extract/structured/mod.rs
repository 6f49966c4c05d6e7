//! Site-specific extractors for platforms with known result markup.
//!
//! Each extractor reads a repeating container and a title element inside it.
//! An entry without a readable title is skipped; extraction as a whole never
//! fails.

mod marketplace;
mod search;
mod video;

pub use marketplace::{AmazonExtractor, EbayExtractor};
pub use search::{BingExtractor, DuckDuckGoExtractor, GoogleExtractor};
pub use video::YouTubeExtractor;

use crate::document::{same_site, DocumentTree};
use crate::extract::ContentItem;

/// Reads one item per element matching `containers`, in document order.
fn collect_entries<'a, D, F>(doc: &'a D, containers: &str, read: F) -> Vec<ContentItem>
where
    D: DocumentTree,
    F: FnMut(D::Node<'a>) -> Option<ContentItem>,
{
    doc.query_all(containers)
        .into_iter()
        .filter_map(read)
        .collect()
}

/// Trimmed text of the first element under `scope` matching `selector`.
fn text_within<'a, D: DocumentTree>(doc: &'a D, scope: D::Node<'a>, selector: &str) -> Option<String> {
    doc.query_first_within(scope, selector)
        .and_then(|node| doc.trimmed_text(node))
}

/// The target of `node` (or of its enclosing link), resolved against the
/// page and kept only when it stays on the same site.
fn same_site_href<'a, D: DocumentTree>(doc: &'a D, node: D::Node<'a>) -> Option<String> {
    let link = doc
        .closest(node, &["a"])
        .or_else(|| doc.query_first_within(node, "a[href]"))?;
    let href = doc.resolved_href(link)?;
    same_site(&href, doc.url()).then(|| href.to_string())
}
