//! Marketplace listing pages.

use tracing::debug;

use super::{collect_entries, text_within};
use crate::context::PageContext;
use crate::document::DocumentTree;
use crate::extract::{ContentExtractor, ContentItem, ItemSource};

/// Amazon search results.
#[derive(Debug, Clone, Copy, Default)]
pub struct AmazonExtractor;

impl<D: DocumentTree> ContentExtractor<D> for AmazonExtractor {
    fn name(&self) -> &'static str {
        "amazon"
    }

    fn extract(&self, doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        let items = collect_entries(
            doc,
            r#"div[data-component-type="s-search-result"]"#,
            |result| {
                let title = text_within(doc, result, "h2 a span")?;
                ContentItem::new(&title, ItemSource::Amazon)
            },
        );
        debug!(items = items.len(), "Extracted Amazon products");
        items
    }
}

/// eBay listings.
#[derive(Debug, Clone, Copy, Default)]
pub struct EbayExtractor;

impl EbayExtractor {
    /// Title of the template card eBay renders ahead of real listings.
    const PLACEHOLDER_TITLE: &'static str = "Shop on eBay";
}

impl<D: DocumentTree> ContentExtractor<D> for EbayExtractor {
    fn name(&self) -> &'static str {
        "ebay"
    }

    fn extract(&self, doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        let items = collect_entries(doc, "div.s-item__info", |listing| {
            let title = text_within(doc, listing, "div.s-item__title span")?;
            if title == Self::PLACEHOLDER_TITLE {
                return None;
            }
            ContentItem::new(&title, ItemSource::Ebay)
        });
        debug!(items = items.len(), "Extracted eBay listings");
        items
    }
}
