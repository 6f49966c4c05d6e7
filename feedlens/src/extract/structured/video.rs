//! Video feeds.

use tracing::debug;

use super::{collect_entries, same_site_href, text_within};
use crate::context::PageContext;
use crate::document::DocumentTree;
use crate::extract::{ContentExtractor, ContentItem, ItemSource};

/// Renderer elements in the order they are scanned: home grid, search and
/// channel lists, legacy grids.
const VIDEO_RENDERERS: [&str; 3] = [
    "ytd-rich-item-renderer",
    "ytd-video-renderer",
    "ytd-grid-video-renderer",
];
const TITLE: &str = "#video-title, h3 a";
const CHANNEL: &str = "#channel-name a, ytd-channel-name a";

/// YouTube home feed, search results and channel grids.
#[derive(Debug, Clone, Copy, Default)]
pub struct YouTubeExtractor;

impl<D: DocumentTree> ContentExtractor<D> for YouTubeExtractor {
    fn name(&self) -> &'static str {
        "youtube"
    }

    fn extract(&self, doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        let mut items = Vec::new();
        for renderer in VIDEO_RENDERERS {
            items.extend(collect_entries(doc, renderer, |video| {
                let title_node = doc.query_first_within(video, TITLE)?;
                let title = doc.trimmed_text(title_node)?;
                let channel = text_within(doc, video, CHANNEL);
                ContentItem::new(&title, ItemSource::YouTube).map(|item| {
                    item.with_channel(channel)
                        .with_url(same_site_href(doc, title_node))
                })
            }));
        }
        debug!(items = items.len(), "Extracted YouTube videos");
        items
    }
}
