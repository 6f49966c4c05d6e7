//! Content extraction: turning a document snapshot into content items.
//!
//! This module provides:
//! - The [`ContentItem`] model and its provenance tag
//! - Site-specific extractors for known platforms
//! - A schema-free heuristic extractor for everything else
//! - A router that picks between them per platform

mod heuristic;
mod item;
mod router;
mod structured;

pub use heuristic::HeuristicExtractor;
pub use item::{ContentItem, ExtractionResult, ItemSource};
pub use router::{ExtractionRouter, ExtractorKind};
pub use structured::{
    BingExtractor, DuckDuckGoExtractor, EbayExtractor, GoogleExtractor, AmazonExtractor,
    YouTubeExtractor,
};

use crate::context::PageContext;
use crate::document::DocumentTree;

/// Protocol for content extraction.
///
/// Implementations are pure reads of the snapshot: they never fail, and an
/// entry that cannot be read is skipped rather than aborting the batch.
pub trait ContentExtractor<D: DocumentTree> {
    /// Short name used in logs.
    fn name(&self) -> &'static str;

    /// Extracts items from the document, in document order.
    fn extract(&self, doc: &D, ctx: &PageContext) -> Vec<ContentItem>;
}
