//! Search engine result pages.

use tracing::debug;

use super::{collect_entries, text_within};
use crate::context::{Mode, PageContext};
use crate::document::DocumentTree;
use crate::extract::{ContentExtractor, ContentItem, ItemSource};

/// Google web, shopping and news results.
#[derive(Debug, Clone, Copy, Default)]
pub struct GoogleExtractor;

impl GoogleExtractor {
    const WEB_RESULTS: &'static str = "div.g, div[data-sokoban-container]";
    const WEB_SNIPPET: &'static str = "div[data-sncf], div.VwiC3b";
    const SHOPPING_RESULTS: &'static str = "div[data-docid]";
    const NEWS_HEADINGS: &'static str = r#"div[role="heading"]"#;
}

impl<D: DocumentTree> ContentExtractor<D> for GoogleExtractor {
    fn name(&self) -> &'static str {
        "google"
    }

    fn extract(&self, doc: &D, ctx: &PageContext) -> Vec<ContentItem> {
        let items = match ctx.mode {
            Mode::Web => collect_entries(doc, Self::WEB_RESULTS, |entry| {
                let title = text_within(doc, entry, "h3")?;
                let snippet = text_within(doc, entry, Self::WEB_SNIPPET);
                ContentItem::new(&title, ItemSource::GoogleWeb)
                    .map(|item| item.with_description(snippet))
            }),
            Mode::Shopping => collect_entries(doc, Self::SHOPPING_RESULTS, |entry| {
                let title = text_within(doc, entry, "h3, h4")?;
                ContentItem::new(&title, ItemSource::GoogleShopping)
            }),
            Mode::News => collect_entries(doc, Self::NEWS_HEADINGS, |heading| {
                let title = doc.trimmed_text(heading)?;
                ContentItem::new(&title, ItemSource::GoogleNews)
            }),
            _ => Vec::new(),
        };
        debug!(mode = %ctx.mode, items = items.len(), "Extracted Google results");
        items
    }
}

/// Bing web and shopping results.
#[derive(Debug, Clone, Copy, Default)]
pub struct BingExtractor;

impl<D: DocumentTree> ContentExtractor<D> for BingExtractor {
    fn name(&self) -> &'static str {
        "bing"
    }

    fn extract(&self, doc: &D, ctx: &PageContext) -> Vec<ContentItem> {
        let items = match ctx.mode {
            Mode::Web => collect_entries(doc, "li.b_algo", |entry| {
                let title = text_within(doc, entry, "h2 a")?;
                ContentItem::new(&title, ItemSource::BingWeb)
            }),
            Mode::Shopping => collect_entries(doc, "div.sp_carditem", |card| {
                let title = text_within(doc, card, "a.title")?;
                ContentItem::new(&title, ItemSource::BingShopping)
            }),
            _ => Vec::new(),
        };
        debug!(mode = %ctx.mode, items = items.len(), "Extracted Bing results");
        items
    }
}

/// DuckDuckGo results. The markup is the same in every mode.
#[derive(Debug, Clone, Copy, Default)]
pub struct DuckDuckGoExtractor;

impl<D: DocumentTree> ContentExtractor<D> for DuckDuckGoExtractor {
    fn name(&self) -> &'static str {
        "duckduckgo"
    }

    fn extract(&self, doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        let items = collect_entries(doc, r#"article[data-testid="result"]"#, |article| {
            let title = text_within(doc, article, "h2")?;
            ContentItem::new(&title, ItemSource::DuckDuckGo)
        });
        debug!(items = items.len(), "Extracted DuckDuckGo results");
        items
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::Platform;
    use crate::document::HtmlDocument;
    use pretty_assertions::assert_eq;

    fn doc(url: &str, body: &str) -> HtmlDocument {
        HtmlDocument::parse_with_url(&format!("<html><body>{body}</body></html>"), url).unwrap()
    }

    fn titles(items: &[ContentItem]) -> Vec<&str> {
        items.iter().map(|i| i.title.as_str()).collect()
    }

    #[test]
    fn test_google_web_with_snippets() {
        let doc = doc(
            "https://www.google.com/search?q=rust",
            r#"
            <div class="g"><a href="https://rust-lang.org"><h3>Rust Language</h3></a>
                <div class="VwiC3b"> A systems language </div></div>
            <div class="g"><h3>   </h3></div>
            <div data-sokoban-container="x"><h3>The Book</h3></div>
            "#,
        );
        let ctx = PageContext::new(Platform::Google, Mode::Web, true);
        let items = GoogleExtractor.extract(&doc, &ctx);
        assert_eq!(titles(&items), vec!["Rust Language", "The Book"]);
        assert_eq!(items[0].description.as_deref(), Some("A systems language"));
        assert_eq!(items[0].source, ItemSource::GoogleWeb);
        assert!(items[1].description.is_none());
        assert!(items.iter().all(|i| i.confidence == 1.0));
    }

    #[test]
    fn test_google_shopping_and_news() {
        let doc = doc(
            "https://www.google.com/search?q=kettle&tbm=shop",
            r#"
            <div data-docid="1"><h4>Kettle A</h4></div>
            <div data-docid="2"><span>no title</span></div>
            <div role="heading"> Kettle prices rise </div>
            "#,
        );
        let shopping = PageContext::new(Platform::Google, Mode::Shopping, true);
        let items = GoogleExtractor.extract(&doc, &shopping);
        assert_eq!(titles(&items), vec!["Kettle A"]);
        assert_eq!(items[0].source, ItemSource::GoogleShopping);

        let news = PageContext::new(Platform::Google, Mode::News, true);
        let items = GoogleExtractor.extract(&doc, &news);
        assert_eq!(titles(&items), vec!["Kettle prices rise"]);
        assert_eq!(items[0].source, ItemSource::GoogleNews);
    }

    #[test]
    fn test_google_other_modes_yield_nothing() {
        let doc = doc("https://www.google.com/maps", r#"<div class="g"><h3>Place</h3></div>"#);
        let ctx = PageContext::new(Platform::Google, Mode::Maps, true);
        assert!(GoogleExtractor.extract(&doc, &ctx).is_empty());
    }

    #[test]
    fn test_bing_web_and_shopping() {
        let doc = doc(
            "https://www.bing.com/search?q=rust",
            r#"
            <ol><li class="b_algo"><h2><a href="/x">Rust</a></h2></li>
                <li class="b_algo"><h2>No link</h2></li></ol>
            <div class="sp_carditem"><a class="title">Card</a></div>
            "#,
        );
        let web = PageContext::new(Platform::Bing, Mode::Web, true);
        let items = BingExtractor.extract(&doc, &web);
        assert_eq!(titles(&items), vec!["Rust"]);
        assert_eq!(items[0].source, ItemSource::BingWeb);

        let shopping = PageContext::new(Platform::Bing, Mode::Shopping, true);
        let items = BingExtractor.extract(&doc, &shopping);
        assert_eq!(titles(&items), vec!["Card"]);
        assert_eq!(items[0].source, ItemSource::BingShopping);

        let news = PageContext::new(Platform::Bing, Mode::News, true);
        assert!(BingExtractor.extract(&doc, &news).is_empty());
    }

    #[test]
    fn test_duckduckgo() {
        let doc = doc(
            "https://duckduckgo.com/?q=rust",
            r#"
            <article data-testid="result"><h2><a href="/r">First</a></h2></article>
            <article data-testid="ad"><h2>Sponsored</h2></article>
            <article data-testid="result"><h2>Second</h2></article>
            "#,
        );
        let ctx = PageContext::new(Platform::DuckDuckGo, Mode::Web, true);
        let items = DuckDuckGoExtractor.extract(&doc, &ctx);
        assert_eq!(titles(&items), vec!["First", "Second"]);
        assert!(items.iter().all(|i| i.source == ItemSource::DuckDuckGo));
    }
}
