//! Host capabilities the scheduler depends on: location, document snapshots
//! and subtree change notifications.

use futures::stream::BoxStream;
use serde::{Deserialize, Serialize};

use crate::context::{PageLocation, Platform};
use crate::document::DocumentTree;

/// One observed change to a subtree.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MutationRecord {
    /// Nodes inserted.
    pub added_nodes: usize,
    /// Nodes removed.
    pub removed_nodes: usize,
}

impl MutationRecord {
    /// A record of `count` insertions.
    #[must_use]
    pub const fn added(count: usize) -> Self {
        Self {
            added_nodes: count,
            removed_nodes: 0,
        }
    }

    /// A record of `count` removals.
    #[must_use]
    pub const fn removed(count: usize) -> Self {
        Self {
            added_nodes: 0,
            removed_nodes: count,
        }
    }
}

/// Records delivered together.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChangeBatch {
    /// The records, in observation order.
    pub records: Vec<MutationRecord>,
}

impl ChangeBatch {
    /// Creates a batch.
    #[must_use]
    pub fn new(records: Vec<MutationRecord>) -> Self {
        Self { records }
    }

    /// Whether any record inserted at least one node.
    #[must_use]
    pub fn has_insertions(&self) -> bool {
        self.records.iter().any(|r| r.added_nodes > 0)
    }
}

/// Change notifications for an observed container. The stream ending means
/// the container went stale and must be located again.
pub type ChangeStream = BoxStream<'static, ChangeBatch>;

/// The page the scheduler runs against.
pub trait PageHost {
    /// Snapshot type handed to extraction.
    type Document: DocumentTree;

    /// The current navigation location.
    fn location(&self) -> PageLocation;

    /// A fresh read-only snapshot of the current document.
    fn document(&self) -> Self::Document;

    /// Subscribes to subtree changes under the first element matching
    /// `selector`. `None` when no such element exists yet.
    fn observe(&self, selector: &str) -> Option<ChangeStream>;
}

/// The element whose subtree holds the results for a platform.
#[must_use]
pub fn container_selector(platform: Platform) -> &'static str {
    match platform {
        Platform::Google => r#"#search, #rso, div[role="main"]"#,
        Platform::Bing => "#b_results, main",
        Platform::DuckDuckGo => r#"ol[data-testid="mainline"]"#,
        Platform::Amazon => {
            r#"div.s-main-slot, div[data-component-type="s-search-results"]"#
        }
        Platform::Ebay => "div.srp-results",
        Platform::YouTube => {
            "ytd-rich-grid-renderer, ytd-section-list-renderer, ytd-two-column-search-results-renderer"
        }
        Platform::Walmart
        | Platform::Etsy
        | Platform::Twitter
        | Platform::TikTok
        | Platform::Unknown => r#"main, [role="main"], body"#,
    }
}
