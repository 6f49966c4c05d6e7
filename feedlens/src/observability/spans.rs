//! Span attributes and timing for analysis passes.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;
use tracing::Span;

use crate::context::PageContext;

/// Attributes recorded on every analysis span. Never carries page content.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct AnalysisSpanAttributes {
    /// Session the pass belongs to.
    pub session_id: Option<String>,
    /// Platform identifier.
    pub platform: Option<String>,
    /// Mode identifier.
    pub mode: Option<String>,
    /// What requested the pass (settle timer, mutation, command).
    pub trigger: Option<String>,
}

impl AnalysisSpanAttributes {
    /// Creates empty attributes.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the session ID.
    #[must_use]
    pub fn with_session_id(mut self, id: impl Into<String>) -> Self {
        self.session_id = Some(id.into());
        self
    }

    /// Sets platform and mode from a page context.
    #[must_use]
    pub fn with_context(mut self, ctx: &PageContext) -> Self {
        self.platform = Some(ctx.platform.to_string());
        self.mode = Some(ctx.mode.to_string());
        self
    }

    /// Sets the trigger.
    #[must_use]
    pub fn with_trigger(mut self, trigger: impl Into<String>) -> Self {
        self.trigger = Some(trigger.into());
        self
    }

    /// Flattens to dotted attribute keys.
    #[must_use]
    pub fn to_attributes(&self) -> HashMap<String, String> {
        let mut attrs = HashMap::new();
        if let Some(ref v) = self.session_id {
            attrs.insert("analysis.session_id".to_string(), v.clone());
        }
        if let Some(ref v) = self.platform {
            attrs.insert("analysis.platform".to_string(), v.clone());
        }
        if let Some(ref v) = self.mode {
            attrs.insert("analysis.mode".to_string(), v.clone());
        }
        if let Some(ref v) = self.trigger {
            attrs.insert("analysis.trigger".to_string(), v.clone());
        }
        attrs
    }

    /// Opens an `analysis` span carrying these attributes.
    #[must_use]
    pub fn span(&self) -> Span {
        tracing::info_span!(
            "analysis",
            session_id = self.session_id.as_deref().unwrap_or_default(),
            platform = self.platform.as_deref().unwrap_or_default(),
            mode = self.mode.as_deref().unwrap_or_default(),
            trigger = self.trigger.as_deref().unwrap_or_default(),
        )
    }
}

/// Wall-clock timer for a named operation.
#[derive(Debug)]
pub struct SpanTimer {
    start: Instant,
    name: &'static str,
}

impl SpanTimer {
    /// Starts a timer.
    #[must_use]
    pub fn start(name: &'static str) -> Self {
        Self {
            start: Instant::now(),
            name,
        }
    }

    /// Elapsed time in milliseconds.
    #[must_use]
    pub fn elapsed_ms(&self) -> f64 {
        self.start.elapsed().as_secs_f64() * 1000.0
    }

    /// The operation name.
    #[must_use]
    pub fn name(&self) -> &'static str {
        self.name
    }

    /// Stops the timer and returns the duration in milliseconds.
    #[must_use]
    pub fn finish(self) -> f64 {
        self.elapsed_ms()
    }
}
