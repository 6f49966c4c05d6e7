//! The boundary to the external metrics collaborator.
//!
//! Extraction hands content items to a [`FeedAnalyzer`], which reduces them
//! to aggregate scores. Only those aggregates, wrapped in a
//! [`MetricsUpdate`], ever leave the core through a [`MetricsSink`]. Titles
//! and URLs stay behind.

mod sink;

pub use sink::{CollectingMetricsSink, LoggingMetricsSink, MetricsSink, NoOpMetricsSink};

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::{Mode, PageContext, Platform};
use crate::extract::ContentItem;

/// Aggregate scores computed over one extraction pass.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct FeedMetrics {
    /// How varied the feed is, in [0, 1].
    pub diversity: f64,
    /// How strongly the feed reinforces one viewpoint, in [0, 1].
    pub bubble_score: f64,
    /// Share of items per category, in percent.
    pub category_percentages: BTreeMap<String, f64>,
    /// Number of items analysed.
    pub total_items: usize,
}

/// Reduces content items to aggregate metrics. Implemented outside this
/// crate.
#[cfg_attr(test, mockall::automock)]
pub trait FeedAnalyzer: Send + Sync {
    /// Analyses one pass worth of items.
    fn analyze(&self, items: &[ContentItem]) -> FeedMetrics;
}

/// Payload forwarded to the metrics collaborator.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "type", rename = "UPDATE_METRICS", rename_all = "camelCase")]
pub struct MetricsUpdate {
    /// Platform the pass ran on.
    pub platform: Platform,
    /// Mode the pass ran in.
    pub mode: Mode,
    /// Diversity score.
    pub feed_diversity: f64,
    /// Bubble score.
    pub bubble_score: f64,
    /// Category to percentage.
    pub category_distribution: BTreeMap<String, f64>,
    /// Number of items analysed.
    pub total_items: usize,
}

impl MetricsUpdate {
    /// Builds the payload from context and aggregates only.
    #[must_use]
    pub fn new(ctx: &PageContext, metrics: FeedMetrics) -> Self {
        Self {
            platform: ctx.platform,
            mode: ctx.mode,
            feed_diversity: metrics.diversity,
            bubble_score: metrics.bubble_score,
            category_distribution: metrics.category_percentages,
            total_items: metrics.total_items,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::extract::ItemSource;
    use serde_json::json;

    fn metrics() -> FeedMetrics {
        FeedMetrics {
            diversity: 0.4,
            bubble_score: 0.7,
            category_percentages: BTreeMap::from([
                ("politics".to_string(), 75.0),
                ("sports".to_string(), 25.0),
            ]),
            total_items: 4,
        }
    }

    #[test]
    fn test_update_wire_shape() {
        let ctx = PageContext::new(Platform::YouTube, Mode::Feed, true);
        let update = MetricsUpdate::new(&ctx, metrics());
        let value = serde_json::to_value(&update).unwrap();
        assert_eq!(
            value,
            json!({
                "type": "UPDATE_METRICS",
                "platform": "youtube",
                "mode": "feed",
                "feedDiversity": 0.4,
                "bubbleScore": 0.7,
                "categoryDistribution": {"politics": 75.0, "sports": 25.0},
                "totalItems": 4
            })
        );
    }

    #[test]
    fn test_mock_analyzer() {
        let mut analyzer = MockFeedAnalyzer::new();
        analyzer
            .expect_analyze()
            .withf(|items| items.len() == 1)
            .times(1)
            .returning(|_| metrics());

        let items = vec![ContentItem::new("A video", ItemSource::YouTube).unwrap()];
        assert_eq!(analyzer.analyze(&items).total_items, 4);
    }
}
