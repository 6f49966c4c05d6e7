//! `scraper`-backed document snapshots.

use scraper::{ElementRef, Html, Selector};
use std::fmt;
use tracing::debug;
use url::Url;

use super::DocumentTree;
use crate::errors::FeedLensError;

/// A parsed HTML snapshot together with the URL it was loaded from.
pub struct HtmlDocument {
    html: Html,
    url: Url,
}

impl HtmlDocument {
    /// Parses a full HTML document.
    #[must_use]
    pub fn parse(markup: &str, url: Url) -> Self {
        Self {
            html: Html::parse_document(markup),
            url,
        }
    }

    /// Parses a full HTML document loaded from `page_url`.
    pub fn parse_with_url(markup: &str, page_url: &str) -> Result<Self, FeedLensError> {
        let url = Url::parse(page_url)
            .map_err(|e| FeedLensError::invalid_url(page_url, e.to_string()))?;
        Ok(Self::parse(markup, url))
    }

    /// Compiles a selector, reporting parse failures.
    pub fn compile_selector(selector: &str) -> Result<Selector, FeedLensError> {
        Selector::parse(selector)
            .map_err(|e| FeedLensError::invalid_selector(selector, format!("{e:?}")))
    }

    fn selector(selector: &str) -> Option<Selector> {
        match Self::compile_selector(selector) {
            Ok(compiled) => Some(compiled),
            Err(err) => {
                debug!(error = %err, "Ignoring unparseable selector");
                None
            }
        }
    }
}

impl fmt::Debug for HtmlDocument {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("HtmlDocument")
            .field("url", &self.url.as_str())
            .finish_non_exhaustive()
    }
}

impl DocumentTree for HtmlDocument {
    type Node<'a> = ElementRef<'a> where Self: 'a;

    fn url(&self) -> &Url {
        &self.url
    }

    fn query_all(&self, selector: &str) -> Vec<ElementRef<'_>> {
        Self::selector(selector)
            .map(|compiled| self.html.select(&compiled).collect())
            .unwrap_or_default()
    }

    fn query_within<'a>(&'a self, scope: ElementRef<'a>, selector: &str) -> Vec<ElementRef<'a>> {
        Self::selector(selector)
            .map(|compiled| scope.select(&compiled).collect())
            .unwrap_or_default()
    }

    fn tag_name<'a>(&'a self, node: ElementRef<'a>) -> &'a str {
        node.value().name()
    }

    fn text<'a>(&'a self, node: ElementRef<'a>) -> String {
        node.text().collect()
    }

    fn attribute<'a>(&'a self, node: ElementRef<'a>, name: &str) -> Option<&'a str> {
        node.value().attr(name)
    }

    fn is_hidden<'a>(&'a self, node: ElementRef<'a>) -> bool {
        let mut visibility_seen = false;
        let mut current = Some(node);
        while let Some(el) = current {
            let element = el.value();
            if element.attr("hidden").is_some() {
                return true;
            }
            if let Some(style) = element.attr("style") {
                let style = InlineStyle::parse(style);
                if style.display_none {
                    return true;
                }
                // visibility inherits, so only the nearest declaration counts
                if !visibility_seen {
                    if let Some(hidden) = style.visibility_hidden {
                        if hidden {
                            return true;
                        }
                        visibility_seen = true;
                    }
                }
            }
            current = self.parent(el);
        }
        false
    }

    fn parent<'a>(&'a self, node: ElementRef<'a>) -> Option<ElementRef<'a>> {
        node.parent().and_then(ElementRef::wrap)
    }
}

/// The two layout properties that hide an element, read from a `style`
/// attribute.
#[derive(Debug, Default, PartialEq, Eq)]
struct InlineStyle {
    display_none: bool,
    visibility_hidden: Option<bool>,
}

impl InlineStyle {
    fn parse(style: &str) -> Self {
        let mut parsed = Self::default();
        for declaration in style.split(';') {
            let Some((property, value)) = declaration.split_once(':') else {
                continue;
            };
            let value = value.trim().to_ascii_lowercase();
            let value = value.trim_end_matches("!important").trim();
            match property.trim().to_ascii_lowercase().as_str() {
                "display" => parsed.display_none = value == "none",
                "visibility" => {
                    parsed.visibility_hidden = Some(value == "hidden" || value == "collapse");
                }
                _ => {}
            }
        }
        parsed
    }
}
