//! Platform and mode enums.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The website or service family a page belongs to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Platform {
    /// Google search.
    Google,
    /// Bing search.
    Bing,
    /// DuckDuckGo search.
    DuckDuckGo,
    /// Amazon marketplace.
    Amazon,
    /// eBay marketplace.
    Ebay,
    /// Walmart marketplace.
    Walmart,
    /// Etsy marketplace.
    Etsy,
    /// YouTube video feed.
    YouTube,
    /// Twitter / X timeline.
    Twitter,
    /// TikTok feed.
    TikTok,
    /// Anything else.
    Unknown,
}

impl Default for Platform {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for Platform {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Google => write!(f, "google"),
            Self::Bing => write!(f, "bing"),
            Self::DuckDuckGo => write!(f, "duckduckgo"),
            Self::Amazon => write!(f, "amazon"),
            Self::Ebay => write!(f, "ebay"),
            Self::Walmart => write!(f, "walmart"),
            Self::Etsy => write!(f, "etsy"),
            Self::YouTube => write!(f, "youtube"),
            Self::Twitter => write!(f, "twitter"),
            Self::TikTok => write!(f, "tiktok"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}

/// The operating sub-context within a platform.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Mode {
    /// Regular web search results.
    Web,
    /// Shopping / product search.
    Shopping,
    /// Video search.
    Video,
    /// News search.
    News,
    /// Image search.
    Images,
    /// Map search.
    Maps,
    /// Landing page without a query.
    Homepage,
    /// Marketplace search results.
    Search,
    /// Single product page.
    Product,
    /// Marketplace browsing.
    Browse,
    /// Recommendation feed.
    Feed,
    /// Single video page.
    Watch,
    /// Unrecognised page.
    Unknown,
}

impl Default for Mode {
    fn default() -> Self {
        Self::Unknown
    }
}

impl fmt::Display for Mode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Web => write!(f, "web"),
            Self::Shopping => write!(f, "shopping"),
            Self::Video => write!(f, "video"),
            Self::News => write!(f, "news"),
            Self::Images => write!(f, "images"),
            Self::Maps => write!(f, "maps"),
            Self::Homepage => write!(f, "homepage"),
            Self::Search => write!(f, "search"),
            Self::Product => write!(f, "product"),
            Self::Browse => write!(f, "browse"),
            Self::Feed => write!(f, "feed"),
            Self::Watch => write!(f, "watch"),
            Self::Unknown => write!(f, "unknown"),
        }
    }
}
