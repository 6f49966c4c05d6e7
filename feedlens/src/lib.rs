//! # Feedlens
//!
//! Extraction of content items (results, products, videos, posts) from
//! rendered pages, and the scheduling that keeps the extraction current.
//!
//! Feedlens provides:
//!
//! - **Context classification**: platform and page mode from a URL
//! - **Structured extraction**: selector-driven extractors for known sites
//! - **Heuristic extraction**: schema-free detection of repeated link lists
//! - **Routing**: per-platform dispatch with a heuristic fallback
//! - **Scheduling**: settle delay, change watching and throttled re-analysis
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use feedlens::prelude::*;
//!
//! let router = ExtractionRouter::with_default_extractors(ExtractionConfig::default())?;
//! let mut scheduler = Scheduler::new(host, router, analyzer, sink, ScheduleConfig::default());
//!
//! let (tx, rx) = tokio::sync::mpsc::channel(16);
//! scheduler.run(rx).await;
//! ```

#![forbid(unsafe_code)]
#![warn(
    clippy::all,
    clippy::pedantic,
    missing_docs,
    rust_2018_idioms
)]
#![allow(
    clippy::module_name_repetitions,
    clippy::must_use_candidate,
    clippy::missing_errors_doc,
    clippy::missing_panics_doc
)]

pub mod commands;
pub mod config;
pub mod context;
pub mod document;
pub mod errors;
pub mod extract;
pub mod metrics;
pub mod observability;
pub mod schedule;
pub mod testing;

/// Prelude module for convenient imports
pub mod prelude {
    pub use crate::commands::{AckStatus, Acknowledgement, Command, SuggestedAction};
    pub use crate::config::{ExtractionConfig, LensConfig, ScheduleConfig};
    pub use crate::context::{classify, Mode, PageContext, PageLocation, Platform};
    pub use crate::document::{DocumentTree, HtmlDocument};
    pub use crate::errors::FeedLensError;
    pub use crate::extract::{
        ContentExtractor, ContentItem, ExtractionResult, ExtractionRouter, ExtractorKind,
        HeuristicExtractor, ItemSource,
    };
    pub use crate::metrics::{
        FeedAnalyzer, FeedMetrics, LoggingMetricsSink, MetricsSink, MetricsUpdate,
        NoOpMetricsSink,
    };
    pub use crate::observability::init_tracing;
    pub use crate::schedule::{
        AnalysisOutcome, AnalysisTrigger, ChangeBatch, ChangeStream, PageHost, Scheduler,
        SchedulerInput,
    };
}
