//! Stub extractors, analyzers and hosts for testing.

use futures::channel::mpsc::{unbounded, UnboundedReceiver, UnboundedSender};
use futures::StreamExt;
use parking_lot::Mutex;
use std::collections::{BTreeMap, VecDeque};
use std::sync::Arc;
use url::Url;

use crate::context::{PageContext, PageLocation};
use crate::document::{DocumentTree, HtmlDocument};
use crate::errors::FeedLensError;
use crate::extract::{ContentExtractor, ContentItem, ItemSource};
use crate::metrics::{FeedAnalyzer, FeedMetrics};
use crate::schedule::{ChangeBatch, ChangeStream, MutationRecord, PageHost};

/// An extractor that returns fixed items and counts its calls. Clones share
/// the counter.
#[derive(Debug, Clone)]
pub struct StubExtractor {
    name: &'static str,
    items: Vec<ContentItem>,
    call_count: Arc<Mutex<usize>>,
}

impl StubExtractor {
    /// A stub returning one heuristic item per title.
    #[must_use]
    pub fn new(name: &'static str, titles: &[&str]) -> Self {
        let items = titles
            .iter()
            .filter_map(|t| ContentItem::new(t, ItemSource::Heuristic))
            .collect();
        Self::with_items(name, items)
    }

    /// A stub returning exactly these items.
    #[must_use]
    pub fn with_items(name: &'static str, items: Vec<ContentItem>) -> Self {
        Self {
            name,
            items,
            call_count: Arc::new(Mutex::new(0)),
        }
    }

    /// Number of extractions performed.
    #[must_use]
    pub fn call_count(&self) -> usize {
        *self.call_count.lock()
    }
}

impl<D: DocumentTree> ContentExtractor<D> for StubExtractor {
    fn name(&self) -> &'static str {
        self.name
    }

    fn extract(&self, _doc: &D, _ctx: &PageContext) -> Vec<ContentItem> {
        *self.call_count.lock() += 1;
        self.items.clone()
    }
}

/// An analyzer returning fixed scores, with `total_items` taken from the
/// input. Records how many items each call received.
#[derive(Debug, Clone, Default)]
pub struct FixedAnalyzer {
    diversity: f64,
    bubble_score: f64,
    categories: BTreeMap<String, f64>,
    calls: Arc<Mutex<Vec<usize>>>,
}

impl FixedAnalyzer {
    /// An analyzer returning the given scores.
    #[must_use]
    pub fn new(diversity: f64, bubble_score: f64) -> Self {
        Self {
            diversity,
            bubble_score,
            ..Self::default()
        }
    }

    /// Adds a category share to every result.
    #[must_use]
    pub fn with_category(mut self, category: impl Into<String>, percent: f64) -> Self {
        self.categories.insert(category.into(), percent);
        self
    }

    /// Item counts seen by each call.
    #[must_use]
    pub fn calls(&self) -> Vec<usize> {
        self.calls.lock().clone()
    }
}

impl FeedAnalyzer for FixedAnalyzer {
    fn analyze(&self, items: &[ContentItem]) -> FeedMetrics {
        self.calls.lock().push(items.len());
        FeedMetrics {
            diversity: self.diversity,
            bubble_score: self.bubble_score,
            category_percentages: self.categories.clone(),
            total_items: items.len(),
        }
    }
}

#[derive(Debug)]
enum Binding {
    Missing,
    Attached(UnboundedReceiver<ChangeBatch>),
}

#[derive(Debug)]
struct HostState {
    url: Url,
    markup: String,
    bindings: VecDeque<Binding>,
    observed: Vec<String>,
}

/// A page host driven by the test: markup is swapped in at will and every
/// `observe` call consumes the next scripted binding. With nothing
/// scripted, the container is reported missing. Clones share state.
#[derive(Debug, Clone)]
pub struct ScriptedHost {
    state: Arc<Mutex<HostState>>,
}

impl ScriptedHost {
    /// A host showing `markup` at `page_url`.
    pub fn new(page_url: &str, markup: impl Into<String>) -> Result<Self, FeedLensError> {
        let url = Url::parse(page_url)
            .map_err(|e| FeedLensError::invalid_url(page_url, e.to_string()))?;
        Ok(Self {
            state: Arc::new(Mutex::new(HostState {
                url,
                markup: markup.into(),
                bindings: VecDeque::new(),
                observed: Vec::new(),
            })),
        })
    }

    /// Replaces the page markup.
    pub fn set_markup(&self, markup: impl Into<String>) {
        self.state.lock().markup = markup.into();
    }

    /// The next `observe` call finds no container.
    pub fn push_missing(&self) {
        self.state.lock().bindings.push_back(Binding::Missing);
    }

    /// The next `observe` call binds; batches sent on the returned handle
    /// are delivered to the subscriber.
    #[must_use]
    pub fn attach(&self) -> ChangeHandle {
        let (tx, rx) = unbounded();
        self.state.lock().bindings.push_back(Binding::Attached(rx));
        ChangeHandle { tx }
    }

    /// Number of `observe` calls so far.
    #[must_use]
    pub fn observe_count(&self) -> usize {
        self.state.lock().observed.len()
    }

    /// Selectors passed to `observe`, in call order.
    #[must_use]
    pub fn observed_selectors(&self) -> Vec<String> {
        self.state.lock().observed.clone()
    }
}

impl PageHost for ScriptedHost {
    type Document = HtmlDocument;

    fn location(&self) -> PageLocation {
        PageLocation::from_url(&self.state.lock().url)
    }

    fn document(&self) -> HtmlDocument {
        let state = self.state.lock();
        HtmlDocument::parse(&state.markup, state.url.clone())
    }

    fn observe(&self, selector: &str) -> Option<ChangeStream> {
        let mut state = self.state.lock();
        state.observed.push(selector.to_string());
        match state.bindings.pop_front() {
            Some(Binding::Attached(rx)) => Some(rx.boxed()),
            Some(Binding::Missing) | None => None,
        }
    }
}

/// Sending half of a scripted change subscription. Dropping it ends the
/// stream, which the scheduler treats as a stale container.
#[derive(Debug, Clone)]
pub struct ChangeHandle {
    tx: UnboundedSender<ChangeBatch>,
}

impl ChangeHandle {
    /// Delivers a batch. Returns `false` once the subscriber is gone.
    pub fn send(&self, batch: ChangeBatch) -> bool {
        self.tx.unbounded_send(batch).is_ok()
    }

    /// Delivers a batch reporting `count` inserted nodes.
    pub fn insert(&self, count: usize) -> bool {
        self.send(ChangeBatch::new(vec![MutationRecord::added(count)]))
    }

    /// Delivers a batch reporting only removals.
    pub fn remove(&self, count: usize) -> bool {
        self.send(ChangeBatch::new(vec![MutationRecord::removed(count)]))
    }

    /// Ends the stream.
    pub fn close(self) {
        self.tx.close_channel();
    }
}
