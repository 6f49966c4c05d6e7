//! Navigation location: hostname, path and query parameters.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::errors::FeedLensError;

/// The current navigation location of a page.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct PageLocation {
    /// Lowercased hostname.
    pub hostname: String,
    /// URL path, always starting with `/`.
    pub pathname: String,
    /// Decoded query pairs in their original order.
    #[serde(default)]
    pub query: Vec<(String, String)>,
}

impl PageLocation {
    /// Creates a location from its parts. `query` is a raw query string with
    /// or without the leading `?`.
    #[must_use]
    pub fn new(hostname: impl Into<String>, pathname: impl Into<String>, query: &str) -> Self {
        let query = query.strip_prefix('?').unwrap_or(query);
        let mut pathname = pathname.into();
        if !pathname.starts_with('/') {
            pathname.insert(0, '/');
        }
        Self {
            hostname: hostname.into().to_lowercase(),
            pathname,
            query: url::form_urlencoded::parse(query.as_bytes())
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Parses an absolute URL.
    pub fn parse(raw: &str) -> Result<Self, FeedLensError> {
        let url = Url::parse(raw).map_err(|e| FeedLensError::invalid_url(raw, e.to_string()))?;
        Ok(Self::from_url(&url))
    }

    /// Builds a location from an already parsed URL.
    #[must_use]
    pub fn from_url(url: &Url) -> Self {
        Self {
            hostname: url.host_str().unwrap_or_default().to_lowercase(),
            pathname: url.path().to_string(),
            query: url
                .query_pairs()
                .map(|(k, v)| (k.into_owned(), v.into_owned()))
                .collect(),
        }
    }

    /// Returns the first value for a query key.
    #[must_use]
    pub fn query_param(&self, key: &str) -> Option<&str> {
        self.query
            .iter()
            .find(|(k, _)| k == key)
            .map(|(_, v)| v.as_str())
    }

    /// Whether the query contains the key (with any value).
    #[must_use]
    pub fn has_query_param(&self, key: &str) -> bool {
        self.query.iter().any(|(k, _)| k == key)
    }
}
