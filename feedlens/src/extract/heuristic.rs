//! Schema-free extraction of the dominant repeating link list.
//!
//! The extractor knows nothing about the page's markup. It works in four
//! stages:
//!
//! 1. **Candidate filtering**: keep links with enough visible text, no
//!    navigation phrase, a same-site target and no layout hiding.
//! 2. **Structural grouping**: key every candidate by the tag names of its
//!    nearest ancestors and drop groups that are too small to be a list.
//! 3. **Group selection**: the largest group is taken as the result list.
//!    Among groups of equal size the lexicographically smallest signature
//!    wins.
//! 4. **Item synthesis**: title, description and a confidence score per
//!    member of the selected group.

use regex::{Regex, RegexBuilder};
use std::collections::BTreeMap;
use tracing::{debug, trace};
use url::Url;

use super::{ContentExtractor, ContentItem, ItemSource};
use crate::config::ExtractionConfig;
use crate::context::PageContext;
use crate::document::{same_site, DocumentTree, HEADING_TAGS};
use crate::errors::FeedLensError;

const LINK_SELECTOR: &str = "a[href]";
const HEADING_SELECTOR: &str = "h1, h2, h3, h4, h5, h6";
const CONTAINER_TAGS: [&str; 4] = ["div", "article", "li", "section"];

/// Confidence, in tenths.
const BASE_TENTHS: u8 = 5;
const MAX_TENTHS: u8 = 10;

/// A link that survived filtering.
#[derive(Debug, Clone)]
struct LinkCandidate<N> {
    node: N,
    text: String,
    href: Url,
    signature: String,
}

/// Extracts content items from arbitrary documents by structural repetition.
#[derive(Debug, Clone)]
pub struct HeuristicExtractor {
    config: ExtractionConfig,
    nav_pattern: Option<Regex>,
}

impl HeuristicExtractor {
    /// Creates an extractor, validating the configuration and compiling the
    /// navigation denylist.
    pub fn new(config: ExtractionConfig) -> Result<Self, FeedLensError> {
        config.validate()?;
        let nav_pattern = compile_nav_pattern(&config.nav_phrases)?;
        Ok(Self {
            config,
            nav_pattern,
        })
    }

    /// The active configuration.
    #[must_use]
    pub fn config(&self) -> &ExtractionConfig {
        &self.config
    }

    /// Runs all four stages over the document.
    ///
    /// Returns an empty list when no link qualifies or no group is large
    /// enough. Never mutates the document.
    pub fn extract_items<D: DocumentTree>(&self, doc: &D) -> Vec<ContentItem> {
        let candidates = self.collect_candidates(doc);
        if candidates.is_empty() {
            debug!("No content links found");
            return Vec::new();
        }

        let groups = self.group_by_signature(candidates);
        let Some((signature, group)) = select_group(groups) else {
            debug!("No repeating link group found");
            return Vec::new();
        };
        debug!(signature = %signature, size = group.len(), "Selected largest link group");

        let group_size = group.len();
        let items: Vec<ContentItem> = group
            .into_iter()
            .filter_map(|candidate| self.synthesize(doc, candidate, group_size))
            .collect();
        debug!(items = items.len(), "Heuristic extraction finished");
        items
    }

    /// Stage 1: all links that look like content.
    fn collect_candidates<'a, D: DocumentTree>(
        &self,
        doc: &'a D,
    ) -> Vec<LinkCandidate<D::Node<'a>>> {
        let links = doc.query_all(LINK_SELECTOR);
        let total = links.len();
        let candidates: Vec<_> = links
            .into_iter()
            .filter_map(|node| self.candidate(doc, node))
            .collect();
        debug!(total, candidates = candidates.len(), "Filtered content links");
        candidates
    }

    fn candidate<'a, D: DocumentTree>(
        &self,
        doc: &'a D,
        node: D::Node<'a>,
    ) -> Option<LinkCandidate<D::Node<'a>>> {
        let text = doc.trimmed_text(node)?;
        if text.chars().count() < self.config.min_text_length {
            return None;
        }
        if self.is_navigation(&text) {
            return None;
        }
        let href = doc.resolved_href(node)?;
        if !same_site(&href, doc.url()) {
            return None;
        }
        if doc.is_hidden(node) {
            return None;
        }
        let signature = signature(doc, node, self.config.signature_depth);
        Some(LinkCandidate {
            node,
            text,
            href,
            signature,
        })
    }

    fn is_navigation(&self, text: &str) -> bool {
        self.nav_pattern
            .as_ref()
            .is_some_and(|pattern| pattern.is_match(text))
    }

    /// Stage 2: partition by signature, keeping only significant groups.
    fn group_by_signature<N>(
        &self,
        candidates: Vec<LinkCandidate<N>>,
    ) -> BTreeMap<String, Vec<LinkCandidate<N>>> {
        let mut groups: BTreeMap<String, Vec<LinkCandidate<N>>> = BTreeMap::new();
        for candidate in candidates {
            groups
                .entry(candidate.signature.clone())
                .or_default()
                .push(candidate);
        }
        groups.retain(|_, members| members.len() >= self.config.min_group_size);
        debug!(groups = groups.len(), "Grouped links by structure");
        groups
    }

    /// Stage 4: one item per selected candidate.
    fn synthesize<'a, D: DocumentTree>(
        &self,
        doc: &'a D,
        candidate: LinkCandidate<D::Node<'a>>,
        group_size: usize,
    ) -> Option<ContentItem> {
        let description = self.description(doc, candidate.node, &candidate.text);
        let tenths = confidence_tenths(
            group_size,
            candidate.text.chars().count(),
            has_heading(doc, candidate.node),
        );
        trace!(title = %candidate.text, tenths, "Synthesized heuristic item");
        ContentItem::new(&candidate.text, ItemSource::Heuristic).map(|item| {
            item.with_description(description)
                .with_url(Some(candidate.href.to_string()))
                .with_confidence(f64::from(tenths) / 10.0)
        })
    }

    /// Text of the nearest container with every occurrence of the title
    /// removed, trimmed and then cut to `description_max_chars`. The cut is
    /// not trimmed again.
    fn description<'a, D: DocumentTree>(
        &self,
        doc: &'a D,
        node: D::Node<'a>,
        title: &str,
    ) -> Option<String> {
        let container = doc.closest(node, &CONTAINER_TAGS)?;
        let text = doc.trimmed_text(container)?;
        let stripped = text.replace(title, "");
        let description: String = stripped
            .trim()
            .chars()
            .take(self.config.description_max_chars)
            .collect();
        if description.is_empty() {
            None
        } else {
            Some(description)
        }
    }
}

impl<D: DocumentTree> ContentExtractor<D> for HeuristicExtractor {
    fn name(&self) -> &'static str {
        "heuristic"
    }

    fn extract(&self, doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        self.extract_items(doc)
    }
}

/// Anchored, case-insensitive alternation over the escaped phrases.
fn compile_nav_pattern(phrases: &[String]) -> Result<Option<Regex>, FeedLensError> {
    let alternatives: Vec<String> = phrases
        .iter()
        .map(|p| p.trim())
        .filter(|p| !p.is_empty())
        .map(regex::escape)
        .collect();
    if alternatives.is_empty() {
        return Ok(None);
    }
    let pattern = RegexBuilder::new(&format!("^(?:{})$", alternatives.join("|")))
        .case_insensitive(true)
        .build()?;
    Ok(Some(pattern))
}

/// Tag names of up to `depth` ancestors, nearest first, joined by `.`.
fn signature<'a, D: DocumentTree>(doc: &'a D, node: D::Node<'a>, depth: usize) -> String {
    let mut tags = Vec::with_capacity(depth);
    let mut current = doc.parent(node);
    while let Some(el) = current {
        if tags.len() == depth {
            break;
        }
        tags.push(doc.tag_name(el));
        current = doc.parent(el);
    }
    tags.join(".")
}

/// Stage 3: the largest group, smallest signature first among equals.
fn select_group<N>(
    groups: BTreeMap<String, Vec<LinkCandidate<N>>>,
) -> Option<(String, Vec<LinkCandidate<N>>)> {
    let mut best: Option<(String, Vec<LinkCandidate<N>>)> = None;
    for (signature, members) in groups {
        let larger = best
            .as_ref()
            .map_or(true, |(_, current)| members.len() > current.len());
        if larger {
            best = Some((signature, members));
        }
    }
    best
}

fn has_heading<'a, D: DocumentTree>(doc: &'a D, node: D::Node<'a>) -> bool {
    doc.closest(node, &HEADING_TAGS).is_some()
        || doc.query_first_within(node, HEADING_SELECTOR).is_some()
}

fn confidence_tenths(group_size: usize, title_chars: usize, heading: bool) -> u8 {
    let mut tenths = BASE_TENTHS;
    if group_size > 10 {
        tenths += 2;
    } else if group_size > 5 {
        tenths += 1;
    }
    if title_chars > 50 {
        tenths += 2;
    } else if title_chars > 30 {
        tenths += 1;
    }
    if heading {
        tenths += 1;
    }
    tenths.min(MAX_TENTHS)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::document::HtmlDocument;
    use crate::testing::{padded_title as title, ResultListFixture};
    use pretty_assertions::assert_eq;

    const PAGE: &str = "https://www.shop.example/search?q=kettle";

    fn extractor() -> HeuristicExtractor {
        HeuristicExtractor::new(ExtractionConfig::default()).unwrap()
    }

    fn doc(body: &str) -> HtmlDocument {
        HtmlDocument::parse_with_url(&format!("<html><body>{body}</body></html>"), PAGE).unwrap()
    }

    /// `count` results as `ul > li > h3 > a`, titles of `len` characters.
    fn result_list(count: usize, len: usize) -> String {
        let items: String = (0..count)
            .map(|i| {
                format!(
                    r#"<li><h3><a href="/item/{i}">{}</a></h3><p>Snippet {i}</p></li>"#,
                    title(i, len)
                )
            })
            .collect();
        format!("<ul>{items}</ul>")
    }

    #[test]
    fn test_no_links_yields_nothing() {
        assert!(extractor().extract_items(&doc("<p>No links at all</p>")).is_empty());
    }

    #[test]
    fn test_no_surviving_candidates_yields_nothing() {
        let body = r#"
            <a href="/a">short</a>
            <a href="https://ads.example.net/x">A long cross-domain advert</a>
            <a href="/b" style="display:none">A long but hidden link text</a>
        "#;
        assert!(extractor().extract_items(&doc(body)).is_empty());
    }

    #[test]
    fn test_small_groups_are_noise() {
        let body = r#"
            <div><p><a href="/1">First isolated link text</a></p></div>
            <div><p><a href="/2">Second isolated link text</a></p></div>
        "#;
        assert!(extractor().extract_items(&doc(body)).is_empty());
    }

    #[test]
    fn test_single_group_is_selected() {
        let doc = doc(&result_list(4, 20));
        let items = extractor().extract_items(&doc);
        assert_eq!(items.len(), 4);
        assert_eq!(items[0].title, title(0, 20));
        assert_eq!(items[3].url.as_deref(), Some("https://www.shop.example/item/3"));
        assert!(items.iter().all(|i| i.source == ItemSource::Heuristic));
    }

    #[test]
    fn test_group_of_eleven_with_long_heading_title_is_certain() {
        let doc = doc(&result_list(11, 60));
        let items = extractor().extract_items(&doc);
        assert_eq!(items.len(), 11);
        assert!(items.iter().all(|i| i.confidence == 1.0));
    }

    #[test]
    fn test_confidence_tenths() {
        assert_eq!(confidence_tenths(3, 10, false), 5);
        assert_eq!(confidence_tenths(6, 31, false), 7);
        assert_eq!(confidence_tenths(8, 35, true), 8);
        assert_eq!(confidence_tenths(11, 51, false), 9);
        assert_eq!(confidence_tenths(11, 60, true), 10);
    }

    #[test]
    fn test_heading_inside_link_counts() {
        let items: String = (0..3)
            .map(|i| format!(r#"<div><a href="/p/{i}"><h2>{}</h2></a></div>"#, title(i, 20)))
            .collect();
        let doc = doc(&format!("<section>{items}</section>"));
        let found = extractor().extract_items(&doc);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|i| i.confidence == 0.6));
    }

    #[test]
    fn test_ads_are_excluded_from_mixed_list() {
        let ads: String = (0..5)
            .map(|i| {
                format!(
                    r#"<li><h3><a href="https://tracker.adnet.com/c/{i}">{}</a></h3></li>"#,
                    title(i, 40)
                )
            })
            .collect();
        let organic: String = (0..8)
            .map(|i| format!(r#"<li><h3><a href="/r/{i}">{}</a></h3></li>"#, title(i, 40)))
            .collect();
        let doc = doc(&format!("<ul>{ads}{organic}</ul>"));
        let items = extractor().extract_items(&doc);
        assert_eq!(items.len(), 8);
        assert!(items.iter().all(|i| i.confidence >= 0.8));
        assert!(items
            .iter()
            .all(|i| i.url.as_deref().is_some_and(|u| u.contains("shop.example"))));
    }

    #[test]
    fn test_subdomain_links_are_same_site() {
        let items: String = (0..3)
            .map(|i| {
                format!(
                    r#"<li><a href="https://media.shop.example/v/{i}">{}</a></li>"#,
                    title(i, 20)
                )
            })
            .collect();
        let doc = doc(&format!("<ul>{items}</ul>"));
        assert_eq!(extractor().extract_items(&doc).len(), 3);
    }

    #[test]
    fn test_unparseable_and_hostless_hrefs_rejected() {
        let items: String = (0..3)
            .map(|i| format!(r#"<li><a href="javascript:void({i})">{}</a></li>"#, title(i, 20)))
            .collect();
        let broken: String = (0..3)
            .map(|i| format!(r#"<li><a href="http://[bad/{i}">{}</a></li>"#, title(i, 20)))
            .collect();
        let doc = doc(&format!("<ul>{items}{broken}</ul>"));
        assert!(extractor().extract_items(&doc).is_empty());
    }

    #[test]
    fn test_navigation_phrases_excluded_inside_group() {
        let config = ExtractionConfig::default().with_min_text_length(1);
        let extractor = HeuristicExtractor::new(config).unwrap();
        let mut items = result_list(3, 20);
        items = items.replace(
            "</ul>",
            r#"<li><h3><a href="/">Home</a></h3></li><li><h3><a href="/login"> SIGN IN </a></h3></li></ul>"#,
        );
        let doc = doc(&items);
        let found = extractor.extract_items(&doc);
        assert_eq!(found.len(), 3);
        assert!(found.iter().all(|i| i.title.starts_with("Result number")));
    }

    #[test]
    fn test_nav_pattern_is_exact_match() {
        let pattern = compile_nav_pattern(&["sign in".to_string(), "more".to_string()])
            .unwrap()
            .unwrap();
        assert!(pattern.is_match("Sign In"));
        assert!(pattern.is_match("MORE"));
        assert!(!pattern.is_match("Learn more about kettles"));
        assert!(compile_nav_pattern(&[]).unwrap().is_none());
    }

    #[test]
    fn test_tie_break_prefers_smallest_signature() {
        // "p.div.body" sorts before "span.div.body"
        let spans: String = (0..3)
            .map(|i| format!(r#"<span><a href="/s/{i}">{}</a></span>"#, title(i, 20)))
            .collect();
        let paras: String = (0..3)
            .map(|i| format!(r#"<p><a href="/p/{i}">Para {}</a></p>"#, title(i, 20)))
            .collect();
        let doc = doc(&format!("<div>{spans}{paras}</div>"));
        let items = extractor().extract_items(&doc);
        assert_eq!(items.len(), 3);
        assert!(items.iter().all(|i| i.title.starts_with("Para")));
    }

    #[test]
    fn test_larger_group_beats_smaller() {
        let body = format!(
            "{}<div>{}</div>",
            result_list(5, 20),
            (0..3)
                .map(|i| format!(r#"<p><a href="/o/{i}">{}</a></p>"#, title(i, 20)))
                .collect::<String>()
        );
        assert_eq!(extractor().extract_items(&doc(&body)).len(), 5);
    }

    #[test]
    fn test_signature_depth() {
        let doc = doc(r#"<article><div><h3><a href="/x">t</a></h3></div></article>"#);
        let link = doc.query_all("a")[0];
        assert_eq!(signature(&doc, link, 3), "h3.div.article");
        assert_eq!(signature(&doc, link, 1), "h3");
        assert_eq!(signature(&doc, link, 10), "h3.div.article.body.html");
    }

    #[test]
    fn test_description_strips_every_title_occurrence() {
        let t = "Stainless kettle 1.7L";
        let items: String = (0..3)
            .map(|i| {
                format!(
                    r#"<div class="r"><a href="/k/{i}">{t}</a> Best {t} deal {i}</div>"#
                )
            })
            .collect();
        let doc = doc(&format!("<section>{items}</section>"));
        let found = extractor().extract_items(&doc);
        assert_eq!(found.len(), 3);
        assert_eq!(found[1].description.as_deref(), Some("Best  deal 1"));
    }

    #[test]
    fn test_offsite_result_list_is_ignored() {
        let onsite = ResultListFixture::new(5);
        let offsite = ResultListFixture::new(5).with_href_base("https://ads.tracker.net/click");
        assert_eq!(extractor().extract_items(&doc(&onsite.to_html())).len(), 5);
        assert!(extractor().extract_items(&doc(&offsite.to_html())).is_empty());
    }

    #[test]
    fn test_description_truncated_and_empty_dropped() {
        let long = "y".repeat(400);
        let items: String = (0..3)
            .map(|i| format!(r#"<div><a href="/l/{i}">{}</a>{long}</div>"#, title(i, 20)))
            .collect();
        let long_doc = doc(&items);
        let found = extractor().extract_items(&long_doc);
        assert_eq!(found.len(), 3);
        assert_eq!(found[0].description.as_ref().map(|d| d.chars().count()), Some(200));

        let split = format!("{} {}", "y".repeat(199), "z".repeat(50));
        let items: String = (0..3)
            .map(|i| format!(r#"<div><a href="/s/{i}">{}</a>{split}</div>"#, title(i, 20)))
            .collect();
        let split_doc = doc(&items);
        let found = extractor().extract_items(&split_doc);
        let cut = found[0].description.as_deref().unwrap();
        assert_eq!(cut.chars().count(), 200);
        assert!(cut.ends_with(' '));

        let bare: String = (0..3)
            .map(|i| format!(r#"<div><a href="/b/{i}">{}</a></div>"#, title(i, 20)))
            .collect();
        let bare_doc = doc(&bare);
        let found = extractor().extract_items(&bare_doc);
        assert!(found.iter().all(|i| i.description.is_none()));
    }

    #[test]
    fn test_idempotent() {
        let doc = doc(&result_list(7, 45));
        let extractor = extractor();
        let first = serde_json::to_vec(&extractor.extract_items(&doc)).unwrap();
        let second = serde_json::to_vec(&extractor.extract_items(&doc)).unwrap();
        assert_eq!(first, second);
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = ExtractionConfig::default().with_min_group_size(0);
        assert!(HeuristicExtractor::new(config).is_err());
    }
}
