//! Error types for feedlens.
//!
//! Errors only surface at configuration and parsing seams. The extraction
//! pipeline itself never fails: a lookup that cannot be satisfied degrades to
//! fewer (or zero) content items instead.

use thiserror::Error;

/// The main error type for feedlens operations.
#[derive(Debug, Error)]
pub enum FeedLensError {
    /// A configuration value is out of range or inconsistent.
    #[error("Invalid configuration: {0}")]
    Config(String),

    /// A CSS selector could not be parsed.
    #[error("Invalid selector '{selector}': {reason}")]
    InvalidSelector {
        /// The offending selector.
        selector: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A URL could not be parsed or resolved.
    #[error("Invalid URL '{url}': {reason}")]
    InvalidUrl {
        /// The offending URL.
        url: String,
        /// Parser diagnostic.
        reason: String,
    },

    /// A navigation denylist pattern failed to compile.
    #[error("Invalid pattern: {0}")]
    Pattern(#[from] regex::Error),

    /// The tracing subscriber could not be installed.
    #[error("Telemetry initialisation failed: {0}")]
    Telemetry(String),

    /// Serialization/deserialization error.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

impl FeedLensError {
    /// Creates a configuration error.
    #[must_use]
    pub fn config(message: impl Into<String>) -> Self {
        Self::Config(message.into())
    }

    /// Creates an invalid-selector error.
    #[must_use]
    pub fn invalid_selector(selector: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidSelector {
            selector: selector.into(),
            reason: reason.into(),
        }
    }

    /// Creates an invalid-URL error.
    #[must_use]
    pub fn invalid_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }
}
