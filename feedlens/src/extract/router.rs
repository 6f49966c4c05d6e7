//! Per-platform dispatch between structured and heuristic extraction.

use std::collections::HashMap;
use std::fmt;
use tracing::{debug, info};

use super::structured::{
    AmazonExtractor, BingExtractor, DuckDuckGoExtractor, EbayExtractor, GoogleExtractor,
    YouTubeExtractor,
};
use super::{ContentExtractor, ContentItem, ExtractionResult, HeuristicExtractor};
use crate::config::ExtractionConfig;
use crate::context::{PageContext, Platform};
use crate::document::DocumentTree;
use crate::errors::FeedLensError;
use crate::observability::SpanTimer;

/// Which kind of extractor handles a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ExtractorKind {
    /// A registered site-specific extractor.
    Structured(Platform),
    /// The schema-free fallback.
    Heuristic,
}

impl fmt::Display for ExtractorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Structured(platform) => write!(f, "structured:{platform}"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// Routes a page context to the extractor registered for its platform,
/// falling back to the heuristic extractor.
pub struct ExtractionRouter<D: DocumentTree> {
    extractors: HashMap<Platform, Box<dyn ContentExtractor<D> + Send + Sync>>,
    fallback: Box<dyn ContentExtractor<D> + Send + Sync>,
}

impl<D: DocumentTree> ExtractionRouter<D> {
    /// Creates a router with no structured extractors.
    pub fn new(config: ExtractionConfig) -> Result<Self, FeedLensError> {
        Ok(Self {
            extractors: HashMap::new(),
            fallback: Box::new(HeuristicExtractor::new(config)?),
        })
    }

    /// Creates a router with the built-in extractors for Google, Bing,
    /// DuckDuckGo, Amazon, eBay and YouTube.
    pub fn with_default_extractors(config: ExtractionConfig) -> Result<Self, FeedLensError> {
        Ok(Self::new(config)?
            .with_extractor(Platform::Google, GoogleExtractor)
            .with_extractor(Platform::Bing, BingExtractor)
            .with_extractor(Platform::DuckDuckGo, DuckDuckGoExtractor)
            .with_extractor(Platform::Amazon, AmazonExtractor)
            .with_extractor(Platform::Ebay, EbayExtractor)
            .with_extractor(Platform::YouTube, YouTubeExtractor))
    }

    /// Registers an extractor, replacing any previous one for the platform.
    pub fn register<E>(&mut self, platform: Platform, extractor: E)
    where
        E: ContentExtractor<D> + Send + Sync + 'static,
    {
        self.extractors.insert(platform, Box::new(extractor));
    }

    /// Builder form of [`register`](Self::register).
    #[must_use]
    pub fn with_extractor<E>(mut self, platform: Platform, extractor: E) -> Self
    where
        E: ContentExtractor<D> + Send + Sync + 'static,
    {
        self.register(platform, extractor);
        self
    }

    /// Replaces the fallback extractor.
    #[must_use]
    pub fn with_fallback<E>(mut self, extractor: E) -> Self
    where
        E: ContentExtractor<D> + Send + Sync + 'static,
    {
        self.fallback = Box::new(extractor);
        self
    }

    /// Which extractor a platform is dispatched to.
    #[must_use]
    pub fn route(&self, platform: Platform) -> ExtractorKind {
        if self.extractors.contains_key(&platform) {
            ExtractorKind::Structured(platform)
        } else {
            ExtractorKind::Heuristic
        }
    }

    /// Platforms with a registered extractor.
    #[must_use]
    pub fn registered_platforms(&self) -> Vec<Platform> {
        let mut platforms: Vec<Platform> = self.extractors.keys().copied().collect();
        platforms.sort_by_key(ToString::to_string);
        platforms
    }

    /// Extracts items from the document under the given context.
    ///
    /// Items with a blank title are dropped and confidences clamped, whatever
    /// the extractor returned.
    pub fn extract(&self, ctx: &PageContext, doc: &D) -> ExtractionResult {
        let kind = self.route(ctx.platform);
        let extractor = match kind {
            ExtractorKind::Structured(platform) => self
                .extractors
                .get(&platform)
                .unwrap_or(&self.fallback),
            ExtractorKind::Heuristic => &self.fallback,
        };

        let timer = SpanTimer::start("extract");
        let items: Vec<ContentItem> = extractor
            .extract(doc, ctx)
            .into_iter()
            .filter_map(ContentItem::normalized)
            .collect();
        let duration_ms = timer.finish();

        let result = ExtractionResult::new(*ctx, items);
        if result.is_empty() {
            debug!(extractor = extractor.name(), %kind, duration_ms, "Extraction found no items");
        } else {
            info!(
                extractor = extractor.name(),
                %kind,
                items = result.len(),
                fingerprint = %result.fingerprint(),
                duration_ms,
                "Extraction complete"
            );
        }
        result
    }
}

impl<D: DocumentTree> fmt::Debug for ExtractionRouter<D> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ExtractionRouter")
            .field("registered", &self.registered_platforms())
            .field("fallback", &self.fallback.name())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Mode;
    use crate::document::HtmlDocument;
    use crate::extract::ItemSource;
    use crate::testing::StubExtractor;
    use pretty_assertions::assert_eq;

    fn empty_doc() -> HtmlDocument {
        HtmlDocument::parse_with_url("<html><body></body></html>", "https://example.com/").unwrap()
    }

    fn ctx(platform: Platform) -> PageContext {
        PageContext::new(platform, Mode::Web, true)
    }

    #[test]
    fn test_default_routing_table() {
        let router = ExtractionRouter::<HtmlDocument>::with_default_extractors(
            ExtractionConfig::default(),
        )
        .unwrap();
        for platform in [
            Platform::Google,
            Platform::Bing,
            Platform::DuckDuckGo,
            Platform::Amazon,
            Platform::Ebay,
            Platform::YouTube,
        ] {
            assert_eq!(router.route(platform), ExtractorKind::Structured(platform));
        }
        for platform in [
            Platform::Walmart,
            Platform::Etsy,
            Platform::Twitter,
            Platform::TikTok,
            Platform::Unknown,
        ] {
            assert_eq!(router.route(platform), ExtractorKind::Heuristic);
        }
    }

    #[test]
    fn test_dispatch_to_stubs() {
        let structured = StubExtractor::new("structured", &["From structured"]);
        let fallback = StubExtractor::new("fallback", &["From fallback"]);
        let router = ExtractionRouter::<HtmlDocument>::new(ExtractionConfig::default())
            .unwrap()
            .with_extractor(Platform::Amazon, structured.clone())
            .with_fallback(fallback.clone());
        let doc = empty_doc();

        let result = router.extract(&ctx(Platform::Amazon), &doc);
        assert_eq!(result.items[0].title, "From structured");
        assert_eq!(result.context.platform, Platform::Amazon);

        let result = router.extract(&ctx(Platform::Etsy), &doc);
        assert_eq!(result.items[0].title, "From fallback");

        assert_eq!(structured.call_count(), 1);
        assert_eq!(fallback.call_count(), 1);
    }

    #[test]
    fn test_register_replaces() {
        let mut router =
            ExtractionRouter::<HtmlDocument>::new(ExtractionConfig::default()).unwrap();
        router.register(Platform::Bing, StubExtractor::new("first", &["One"]));
        router.register(Platform::Bing, StubExtractor::new("second", &["Two"]));
        let result = router.extract(&ctx(Platform::Bing), &empty_doc());
        assert_eq!(result.items[0].title, "Two");
        assert_eq!(router.registered_platforms(), vec![Platform::Bing]);
    }

    #[test]
    fn test_items_are_finalized() {
        let mut sloppy = ContentItem::new("x", ItemSource::Heuristic).unwrap();
        sloppy.title = "   ".to_string();
        let mut overconfident = ContentItem::new("kept", ItemSource::Heuristic).unwrap();
        overconfident.confidence = 3.0;
        let stub = StubExtractor::with_items("stub", vec![sloppy, overconfident]);
        let router = ExtractionRouter::<HtmlDocument>::new(ExtractionConfig::default())
            .unwrap()
            .with_fallback(stub);

        let result = router.extract(&ctx(Platform::Unknown), &empty_doc());
        assert_eq!(result.len(), 1);
        assert_eq!(result.items[0].confidence, 1.0);
    }

    #[test]
    fn test_heuristic_fallback_on_real_document() {
        let rows: String = (0..4)
            .map(|i| format!(r#"<tr><td><a href="/product/{i}">Handmade mug number {i}</a></td></tr>"#))
            .collect();
        let doc = HtmlDocument::parse_with_url(
            &format!("<html><body><table>{rows}</table></body></html>"),
            "https://www.etsy.com/search?q=mug",
        )
        .unwrap();
        let router = ExtractionRouter::<HtmlDocument>::with_default_extractors(
            ExtractionConfig::default(),
        )
        .unwrap();
        let result = router.extract(&PageContext::new(Platform::Etsy, Mode::Search, true), &doc);
        assert_eq!(result.len(), 4);
        assert!(result.items.iter().all(|i| i.source == ItemSource::Heuristic));
    }

    #[test]
    fn test_extractor_kind_display() {
        assert_eq!(ExtractorKind::Structured(Platform::Ebay).to_string(), "structured:ebay");
        assert_eq!(ExtractorKind::Heuristic.to_string(), "heuristic");
    }
}
