//! Configuration types for extraction and re-analysis scheduling.

use serde::{Deserialize, Serialize};
use std::path::Path;
use std::time::Duration;

use crate::errors::FeedLensError;

/// Configuration for the heuristic extractor.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExtractionConfig {
    /// Minimum trimmed link text length (in characters) for a candidate.
    #[serde(default = "default_min_text_length")]
    pub min_text_length: usize,
    /// Number of ancestor levels that make up a structural signature.
    #[serde(default = "default_signature_depth")]
    pub signature_depth: usize,
    /// Minimum number of links sharing a signature to count as a list.
    #[serde(default = "default_min_group_size")]
    pub min_group_size: usize,
    /// Maximum description length in characters.
    #[serde(default = "default_description_max_chars")]
    pub description_max_chars: usize,
    /// Link texts treated as navigation chrome (case-insensitive exact match).
    #[serde(default = "default_nav_phrases")]
    pub nav_phrases: Vec<String>,
}

fn default_min_text_length() -> usize {
    10
}

fn default_signature_depth() -> usize {
    3
}

fn default_min_group_size() -> usize {
    3
}

fn default_description_max_chars() -> usize {
    200
}

fn default_nav_phrases() -> Vec<String> {
    [
        "home", "about", "contact", "login", "sign in", "cart", "account", "help", "menu",
        "more", "next", "previous",
    ]
    .iter()
    .map(|s| (*s).to_string())
    .collect()
}

impl Default for ExtractionConfig {
    fn default() -> Self {
        Self {
            min_text_length: default_min_text_length(),
            signature_depth: default_signature_depth(),
            min_group_size: default_min_group_size(),
            description_max_chars: default_description_max_chars(),
            nav_phrases: default_nav_phrases(),
        }
    }
}

impl ExtractionConfig {
    /// Creates a new extraction configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum group size.
    #[must_use]
    pub fn with_min_group_size(mut self, size: usize) -> Self {
        self.min_group_size = size;
        self
    }

    /// Sets the minimum candidate text length.
    #[must_use]
    pub fn with_min_text_length(mut self, length: usize) -> Self {
        self.min_text_length = length;
        self
    }

    /// Sets the signature depth.
    #[must_use]
    pub fn with_signature_depth(mut self, depth: usize) -> Self {
        self.signature_depth = depth;
        self
    }

    /// Adds a navigation phrase to the denylist.
    #[must_use]
    pub fn with_nav_phrase(mut self, phrase: impl Into<String>) -> Self {
        self.nav_phrases.push(phrase.into());
        self
    }

    /// Checks that the values can drive an extraction pass.
    pub fn validate(&self) -> Result<(), FeedLensError> {
        if self.signature_depth == 0 {
            return Err(FeedLensError::config("signature_depth must be at least 1"));
        }
        if self.min_group_size == 0 {
            return Err(FeedLensError::config("min_group_size must be at least 1"));
        }
        Ok(())
    }
}

/// Configuration for the re-analysis scheduler.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScheduleConfig {
    /// Minimum time between two accepted analyses, in seconds.
    #[serde(default = "default_min_interval")]
    pub min_interval_seconds: f64,
    /// Delay before the first analysis after binding, in seconds.
    #[serde(default = "default_settle_delay")]
    pub settle_delay_seconds: f64,
    /// Backoff between container binding attempts, in seconds.
    #[serde(default = "default_bind_retry")]
    pub bind_retry_seconds: f64,
}

fn default_min_interval() -> f64 {
    10.0
}

fn default_settle_delay() -> f64 {
    2.0
}

fn default_bind_retry() -> f64 {
    3.0
}

impl Default for ScheduleConfig {
    fn default() -> Self {
        Self {
            min_interval_seconds: default_min_interval(),
            settle_delay_seconds: default_settle_delay(),
            bind_retry_seconds: default_bind_retry(),
        }
    }
}

impl ScheduleConfig {
    /// Creates a new schedule configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the minimum re-analysis interval.
    #[must_use]
    pub fn with_min_interval(mut self, seconds: f64) -> Self {
        self.min_interval_seconds = seconds;
        self
    }

    /// Sets the settle delay.
    #[must_use]
    pub fn with_settle_delay(mut self, seconds: f64) -> Self {
        self.settle_delay_seconds = seconds;
        self
    }

    /// Sets the binding retry backoff.
    #[must_use]
    pub fn with_bind_retry(mut self, seconds: f64) -> Self {
        self.bind_retry_seconds = seconds;
        self
    }

    /// Gets the minimum interval as Duration.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        seconds_or(self.min_interval_seconds, default_min_interval())
    }

    /// Gets the settle delay as Duration.
    #[must_use]
    pub fn settle_delay(&self) -> Duration {
        seconds_or(self.settle_delay_seconds, default_settle_delay())
    }

    /// Gets the binding retry backoff as Duration.
    #[must_use]
    pub fn bind_retry(&self) -> Duration {
        seconds_or(self.bind_retry_seconds, default_bind_retry())
    }

    /// Checks that every duration is finite and non-negative.
    pub fn validate(&self) -> Result<(), FeedLensError> {
        for (name, value) in [
            ("min_interval_seconds", self.min_interval_seconds),
            ("settle_delay_seconds", self.settle_delay_seconds),
            ("bind_retry_seconds", self.bind_retry_seconds),
        ] {
            if !value.is_finite() || value < 0.0 {
                return Err(FeedLensError::config(format!(
                    "{name} must be a finite, non-negative number of seconds (got {value})"
                )));
            }
        }
        Ok(())
    }
}

fn seconds_or(seconds: f64, fallback: f64) -> Duration {
    Duration::try_from_secs_f64(seconds).unwrap_or_else(|_| Duration::from_secs_f64(fallback))
}

/// Combined configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LensConfig {
    /// Heuristic extraction settings.
    #[serde(default)]
    pub extraction: ExtractionConfig,
    /// Scheduler settings.
    #[serde(default)]
    pub schedule: ScheduleConfig,
}

impl LensConfig {
    /// Creates a new configuration with defaults.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses and validates a configuration from JSON. Missing keys take defaults.
    pub fn from_json_str(json: &str) -> Result<Self, FeedLensError> {
        let config: Self = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Reads, parses and validates a JSON configuration file.
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self, FeedLensError> {
        let raw = std::fs::read_to_string(path)?;
        Self::from_json_str(&raw)
    }

    /// Validates both sections.
    pub fn validate(&self) -> Result<(), FeedLensError> {
        self.extraction.validate()?;
        self.schedule.validate()
    }
}
