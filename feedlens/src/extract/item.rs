//! Content item model.

use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};
use std::fmt;

use crate::context::PageContext;

/// Which extractor produced an item.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum ItemSource {
    /// Google web results.
    #[serde(rename = "google-web")]
    GoogleWeb,
    /// Google shopping results.
    #[serde(rename = "google-shopping")]
    GoogleShopping,
    /// Google news results.
    #[serde(rename = "google-news")]
    GoogleNews,
    /// Bing web results.
    #[serde(rename = "bing-web")]
    BingWeb,
    /// Bing shopping results.
    #[serde(rename = "bing-shopping")]
    BingShopping,
    /// DuckDuckGo results.
    #[serde(rename = "duckduckgo")]
    DuckDuckGo,
    /// Amazon search results.
    #[serde(rename = "amazon")]
    Amazon,
    /// eBay listings.
    #[serde(rename = "ebay")]
    Ebay,
    /// YouTube videos.
    #[serde(rename = "youtube")]
    YouTube,
    /// Schema-free heuristic extraction.
    #[serde(rename = "heuristic")]
    Heuristic,
}

impl ItemSource {
    /// Whether the item came from a site-specific extractor.
    #[must_use]
    pub fn is_structured(&self) -> bool {
        !matches!(self, Self::Heuristic)
    }
}

impl fmt::Display for ItemSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GoogleWeb => write!(f, "google-web"),
            Self::GoogleShopping => write!(f, "google-shopping"),
            Self::GoogleNews => write!(f, "google-news"),
            Self::BingWeb => write!(f, "bing-web"),
            Self::BingShopping => write!(f, "bing-shopping"),
            Self::DuckDuckGo => write!(f, "duckduckgo"),
            Self::Amazon => write!(f, "amazon"),
            Self::Ebay => write!(f, "ebay"),
            Self::YouTube => write!(f, "youtube"),
            Self::Heuristic => write!(f, "heuristic"),
        }
    }
}

/// A single extracted result.
///
/// `title` is never empty; constructors return `None` instead.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ContentItem {
    /// Trimmed, non-empty title.
    pub title: String,
    /// Supporting text near the title.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Channel, seller or author.
    #[serde(default, skip_serializing_if = "Option::is_none", rename = "channelOrAuthor")]
    pub channel: Option<String>,
    /// Same-site target URL.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// Producing extractor.
    pub source: ItemSource,
    /// Confidence in [0, 1].
    pub confidence: f64,
}

impl ContentItem {
    /// Creates an item with full confidence. Returns `None` for a blank title.
    #[must_use]
    pub fn new(title: &str, source: ItemSource) -> Option<Self> {
        let title = title.trim();
        if title.is_empty() {
            return None;
        }
        Some(Self {
            title: title.to_string(),
            description: None,
            channel: None,
            url: None,
            source,
            confidence: 1.0,
        })
    }

    /// Sets the description; blank text clears it.
    #[must_use]
    pub fn with_description(mut self, description: Option<String>) -> Self {
        self.description = non_blank(description);
        self
    }

    /// Sets the channel; blank text clears it.
    #[must_use]
    pub fn with_channel(mut self, channel: Option<String>) -> Self {
        self.channel = non_blank(channel);
        self
    }

    /// Sets the URL.
    #[must_use]
    pub fn with_url(mut self, url: Option<String>) -> Self {
        self.url = url;
        self
    }

    /// Sets the confidence, clamped to [0, 1].
    #[must_use]
    pub fn with_confidence(mut self, confidence: f64) -> Self {
        self.confidence = clamp_confidence(confidence);
        self
    }

    /// Re-establishes the invariants on an item built elsewhere.
    #[must_use]
    pub fn normalized(mut self) -> Option<Self> {
        let title = self.title.trim();
        if title.is_empty() {
            return None;
        }
        if title.len() != self.title.len() {
            self.title = title.to_string();
        }
        self.confidence = clamp_confidence(self.confidence);
        Some(self)
    }
}

fn non_blank(text: Option<String>) -> Option<String> {
    text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty())
}

fn clamp_confidence(confidence: f64) -> f64 {
    if confidence.is_nan() {
        0.0
    } else {
        confidence.clamp(0.0, 1.0)
    }
}

/// Items extracted in one analysis pass, with the context they were computed
/// under. Recomputed on every pass and never persisted.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionResult {
    /// Page context.
    pub context: PageContext,
    /// Items in document order.
    pub items: Vec<ContentItem>,
}

impl ExtractionResult {
    /// Creates a result.
    #[must_use]
    pub fn new(context: PageContext, items: Vec<ContentItem>) -> Self {
        Self { context, items }
    }

    /// Number of items.
    #[must_use]
    pub fn len(&self) -> usize {
        self.items.len()
    }

    /// Whether nothing was extracted.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Hex SHA-256 over the serialized items.
    ///
    /// Lets logs tell passes apart without carrying titles or URLs.
    #[must_use]
    pub fn fingerprint(&self) -> String {
        let mut hasher = Sha256::new();
        for item in &self.items {
            if let Ok(bytes) = serde_json::to_vec(item) {
                hasher.update(&bytes);
            }
            hasher.update([0u8]);
        }
        hex::encode(hasher.finalize())
    }
}
