//! Classify a navigation location into a platform and mode.

use serde::{Deserialize, Serialize};

use super::location::PageLocation;
use super::platform::{Mode, Platform};

/// The platform, mode and support flag derived from a location.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct PageContext {
    /// Identified platform.
    pub platform: Platform,
    /// Mode within the platform.
    pub mode: Mode,
    /// Whether the page is analysed at all.
    pub supported: bool,
}

impl PageContext {
    /// Creates a context.
    #[must_use]
    pub const fn new(platform: Platform, mode: Mode, supported: bool) -> Self {
        Self {
            platform,
            mode,
            supported,
        }
    }

    /// The context for unrecognised hosts.
    #[must_use]
    pub const fn unknown() -> Self {
        Self::new(Platform::Unknown, Mode::Unknown, false)
    }

    const fn active(platform: Platform, mode: Mode) -> Self {
        Self::new(platform, mode, true)
    }

    const fn inactive(platform: Platform, mode: Mode) -> Self {
        Self::new(platform, mode, false)
    }
}

/// Classifies a location. Total and deterministic: unrecognised hosts map to
/// [`PageContext::unknown`]. The first matching rule wins.
#[must_use]
pub fn classify(location: &PageLocation) -> PageContext {
    let host = location.hostname.as_str();

    if host.contains("google.com") {
        return classify_google(location);
    }
    if host.contains("bing.com") {
        return classify_bing(location);
    }
    if host.contains("duckduckgo.com") {
        return classify_duckduckgo(location);
    }
    if host.contains("amazon.com") || host.contains("amazon.co.uk") {
        return classify_amazon(location);
    }
    if host.contains("ebay.com") {
        let path = location.pathname.as_str();
        if path.contains("/sch/") || location.has_query_param("_nkw") {
            return PageContext::active(Platform::Ebay, Mode::Search);
        }
        return PageContext::active(Platform::Ebay, Mode::Browse);
    }
    if host.contains("walmart.com") {
        return search_or_browse(Platform::Walmart, location);
    }
    if host.contains("etsy.com") {
        return search_or_browse(Platform::Etsy, location);
    }
    if host.contains("youtube.com") {
        return classify_youtube(location);
    }
    if host.contains("twitter.com") || is_domain(host, "x.com") {
        return PageContext::active(Platform::Twitter, Mode::Feed);
    }
    if host.contains("tiktok.com") {
        return PageContext::active(Platform::TikTok, Mode::Feed);
    }

    PageContext::unknown()
}

fn classify_google(location: &PageLocation) -> PageContext {
    let mode = match location.query_param("tbm") {
        Some("shop") => Some(Mode::Shopping),
        Some("vid") => Some(Mode::Video),
        Some("nws") => Some(Mode::News),
        Some("isch") => Some(Mode::Images),
        _ => None,
    };
    if let Some(mode) = mode {
        return PageContext::active(Platform::Google, mode);
    }
    if location.pathname.contains("/maps") {
        return PageContext::active(Platform::Google, Mode::Maps);
    }
    if location.has_query_param("q") {
        return PageContext::active(Platform::Google, Mode::Web);
    }
    PageContext::inactive(Platform::Google, Mode::Homepage)
}

fn classify_bing(location: &PageLocation) -> PageContext {
    let path = location.pathname.as_str();
    let by_path = [
        ("/shop", Mode::Shopping),
        ("/videos", Mode::Video),
        ("/news", Mode::News),
        ("/images", Mode::Images),
    ];
    if let Some((_, mode)) = by_path.iter().find(|(fragment, _)| path.contains(fragment)) {
        return PageContext::active(Platform::Bing, *mode);
    }
    if location.has_query_param("q") {
        return PageContext::active(Platform::Bing, Mode::Web);
    }
    PageContext::inactive(Platform::Bing, Mode::Homepage)
}

fn classify_duckduckgo(location: &PageLocation) -> PageContext {
    let iax = location.query_param("iax");
    let ia = location.query_param("ia");
    let by_param = [
        ("shopping", Mode::Shopping),
        ("videos", Mode::Video),
        ("news", Mode::News),
        ("images", Mode::Images),
    ];
    for (value, mode) in by_param {
        if iax == Some(value) || ia == Some(value) {
            return PageContext::active(Platform::DuckDuckGo, mode);
        }
    }
    if location.has_query_param("q") {
        return PageContext::active(Platform::DuckDuckGo, Mode::Web);
    }
    PageContext::inactive(Platform::DuckDuckGo, Mode::Homepage)
}

fn classify_amazon(location: &PageLocation) -> PageContext {
    let path = location.pathname.as_str();
    if path.contains("/s/") || location.has_query_param("k") {
        return PageContext::active(Platform::Amazon, Mode::Search);
    }
    if path.contains("/dp/") || path.contains("/gp/product") {
        return PageContext::inactive(Platform::Amazon, Mode::Product);
    }
    PageContext::active(Platform::Amazon, Mode::Browse)
}

fn classify_youtube(location: &PageLocation) -> PageContext {
    let path = location.pathname.as_str();
    if path == "/" || path == "/feed/subscriptions" {
        return PageContext::active(Platform::YouTube, Mode::Feed);
    }
    if path.contains("/results") {
        return PageContext::active(Platform::YouTube, Mode::Search);
    }
    PageContext::inactive(Platform::YouTube, Mode::Watch)
}

/// Exact host or subdomain match, for domains short enough to collide as
/// substrings of unrelated hosts.
fn is_domain(host: &str, domain: &str) -> bool {
    host == domain
        || host
            .strip_suffix(domain)
            .is_some_and(|prefix| prefix.ends_with('.'))
}

fn search_or_browse(platform: Platform, location: &PageLocation) -> PageContext {
    if location.pathname.contains("/search") {
        PageContext::active(platform, Mode::Search)
    } else {
        PageContext::active(platform, Mode::Browse)
    }
}
