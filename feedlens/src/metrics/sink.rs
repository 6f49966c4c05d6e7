//! Metrics sink trait and implementations.

use async_trait::async_trait;
use tracing::{debug, info, Level};

use super::MetricsUpdate;

/// Destination for metrics updates.
///
/// Sinks are the only way aggregate results leave the core.
#[async_trait]
pub trait MetricsSink: Send + Sync {
    /// Publishes an update.
    async fn publish(&self, update: MetricsUpdate);
}

/// A sink that discards every update.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpMetricsSink;

#[async_trait]
impl MetricsSink for NoOpMetricsSink {
    async fn publish(&self, _update: MetricsUpdate) {}
}

/// A sink that logs updates through `tracing`.
#[derive(Debug, Clone)]
pub struct LoggingMetricsSink {
    level: Level,
}

impl Default for LoggingMetricsSink {
    fn default() -> Self {
        Self { level: Level::INFO }
    }
}

impl LoggingMetricsSink {
    /// Creates a logging sink at the given level. Anything other than DEBUG
    /// logs at INFO.
    #[must_use]
    pub fn new(level: Level) -> Self {
        Self { level }
    }

    /// Creates a debug-level logging sink.
    #[must_use]
    pub fn debug() -> Self {
        Self::new(Level::DEBUG)
    }

    fn log_update(&self, update: &MetricsUpdate) {
        if self.level == Level::DEBUG {
            debug!(
                platform = %update.platform,
                mode = %update.mode,
                diversity = update.feed_diversity,
                bubble_score = update.bubble_score,
                categories = ?update.category_distribution,
                total_items = update.total_items,
                "Metrics update"
            );
        } else {
            info!(
                platform = %update.platform,
                mode = %update.mode,
                diversity = update.feed_diversity,
                bubble_score = update.bubble_score,
                total_items = update.total_items,
                "Metrics update"
            );
        }
    }
}

#[async_trait]
impl MetricsSink for LoggingMetricsSink {
    async fn publish(&self, update: MetricsUpdate) {
        self.log_update(&update);
    }
}

/// A sink that keeps every update, for tests.
#[derive(Debug, Default)]
pub struct CollectingMetricsSink {
    updates: parking_lot::RwLock<Vec<MetricsUpdate>>,
}

impl CollectingMetricsSink {
    /// Creates an empty sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// All updates received so far.
    #[must_use]
    pub fn updates(&self) -> Vec<MetricsUpdate> {
        self.updates.read().clone()
    }

    /// The most recent update.
    #[must_use]
    pub fn last(&self) -> Option<MetricsUpdate> {
        self.updates.read().last().cloned()
    }

    /// Number of updates received.
    #[must_use]
    pub fn len(&self) -> usize {
        self.updates.read().len()
    }

    /// Whether nothing was received.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.updates.read().is_empty()
    }

    /// Forgets all updates.
    pub fn clear(&self) {
        self.updates.write().clear();
    }
}

#[async_trait]
impl MetricsSink for CollectingMetricsSink {
    async fn publish(&self, update: MetricsUpdate) {
        self.updates.write().push(update);
    }
}
