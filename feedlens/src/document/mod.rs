//! Read-only document access.
//!
//! Extraction code never touches a concrete DOM. It goes through
//! [`DocumentTree`], which offers selector queries, text and attribute reads,
//! a layout-visibility check and parent navigation. [`HtmlDocument`] is the
//! `scraper`-backed implementation used for parsed HTML snapshots.

mod html;
mod urls;

pub use html::HtmlDocument;
pub use urls::{registrable_domain, same_site};

use std::fmt;
use url::Url;

/// Heading elements, in the form accepted by [`DocumentTree::closest`].
pub const HEADING_TAGS: [&str; 6] = ["h1", "h2", "h3", "h4", "h5", "h6"];

/// Tree-query capability over a document snapshot.
///
/// Node handles are cheap copies borrowed from the document. Every query is
/// infallible: an invalid selector matches nothing.
pub trait DocumentTree {
    /// Handle to an element of this document.
    type Node<'a>: Copy + PartialEq + fmt::Debug
    where
        Self: 'a;

    /// The location the document was loaded from. Relative hrefs resolve
    /// against it.
    fn url(&self) -> &Url;

    /// All elements matching a CSS selector, in document order.
    fn query_all(&self, selector: &str) -> Vec<Self::Node<'_>>;

    /// Descendants of `scope` matching a CSS selector, in document order.
    fn query_within<'a>(&'a self, scope: Self::Node<'a>, selector: &str) -> Vec<Self::Node<'a>>;

    /// Lowercase tag name.
    fn tag_name<'a>(&'a self, node: Self::Node<'a>) -> &'a str;

    /// Concatenated text of all descendant text nodes, untrimmed.
    fn text<'a>(&'a self, node: Self::Node<'a>) -> String;

    /// Attribute value, if present.
    fn attribute<'a>(&'a self, node: Self::Node<'a>, name: &str) -> Option<&'a str>;

    /// Whether layout hides the element (display or visibility).
    fn is_hidden<'a>(&'a self, node: Self::Node<'a>) -> bool;

    /// Parent element, `None` at the root.
    fn parent<'a>(&'a self, node: Self::Node<'a>) -> Option<Self::Node<'a>>;

    /// First descendant of `scope` matching a selector.
    fn query_first_within<'a>(
        &'a self,
        scope: Self::Node<'a>,
        selector: &str,
    ) -> Option<Self::Node<'a>> {
        self.query_within(scope, selector).into_iter().next()
    }

    /// All elements for which `predicate` holds, in document order.
    fn find_all<'a, P>(&'a self, mut predicate: P) -> Vec<Self::Node<'a>>
    where
        P: FnMut(Self::Node<'a>) -> bool,
    {
        self.query_all("*")
            .into_iter()
            .filter(|node| predicate(*node))
            .collect()
    }

    /// Nearest element, starting with `node` itself, whose tag is in `tags`.
    fn closest<'a>(&'a self, node: Self::Node<'a>, tags: &[&str]) -> Option<Self::Node<'a>> {
        let mut current = Some(node);
        while let Some(el) = current {
            let tag = self.tag_name(el);
            if tags.iter().any(|t| *t == tag) {
                return Some(el);
            }
            current = self.parent(el);
        }
        None
    }

    /// Trimmed text, `None` when empty.
    fn trimmed_text<'a>(&'a self, node: Self::Node<'a>) -> Option<String> {
        let text = self.text(node);
        let trimmed = text.trim();
        if trimmed.is_empty() {
            None
        } else {
            Some(trimmed.to_string())
        }
    }

    /// The element's `href` resolved against [`DocumentTree::url`].
    fn resolved_href<'a>(&'a self, node: Self::Node<'a>) -> Option<Url> {
        let href = self.attribute(node, "href")?;
        self.url().join(href).ok()
    }
}
