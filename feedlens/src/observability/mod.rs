//! Logging setup and span helpers for analysis passes.

mod spans;

pub use spans::{AnalysisSpanAttributes, SpanTimer};

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

use crate::errors::FeedLensError;

/// Directive applied when `RUST_LOG` is unset.
pub const DEFAULT_FILTER: &str = "feedlens=info";

/// Installs a global `tracing` subscriber.
///
/// The filter comes from `RUST_LOG`, falling back to [`DEFAULT_FILTER`].
/// With `json` set, events are emitted as one JSON object per line.
pub fn init_tracing(json: bool) -> Result<(), FeedLensError> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(DEFAULT_FILTER))
        .map_err(|e| FeedLensError::Telemetry(e.to_string()))?;

    let registry = tracing_subscriber::registry().with(filter);
    let installed = if json {
        registry.with(fmt::layer().json()).try_init()
    } else {
        registry.with(fmt::layer()).try_init()
    };
    installed.map_err(|e| FeedLensError::Telemetry(e.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_filter_parses() {
        assert!(EnvFilter::try_new(DEFAULT_FILTER).is_ok());
    }

    #[test]
    fn test_second_init_reports_error() {
        // Whichever call installs first wins; a later one must not panic.
        let first = init_tracing(false);
        let second = init_tracing(true);
        assert!(first.is_err() || second.is_err());
    }
}
