//! Minimum-interval gate for analysis requests.

use tokio::time::{Duration, Instant};

/// Admits at most one request per interval.
///
/// The first request is always admitted. The gate tracks that with an
/// `Option` rather than a sentinel timestamp, so a clock near its origin can
/// never look "recent".
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ThrottleGate {
    min_interval: Duration,
    last: Option<Instant>,
}

impl ThrottleGate {
    /// Creates a gate that has never admitted anything.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last: None,
        }
    }

    /// Admits the request if the interval has passed since the last admitted
    /// one, recording `now` on success.
    pub fn try_acquire(&mut self, now: Instant) -> bool {
        let open = match self.last {
            None => true,
            Some(last) => now.saturating_duration_since(last) >= self.min_interval,
        };
        if open {
            self.last = Some(now);
        }
        open
    }

    /// Time until the gate reopens; zero when open.
    #[must_use]
    pub fn remaining(&self, now: Instant) -> Duration {
        self.last.map_or(Duration::ZERO, |last| {
            self.min_interval
                .saturating_sub(now.saturating_duration_since(last))
        })
    }

    /// When the last request was admitted.
    #[must_use]
    pub fn last(&self) -> Option<Instant> {
        self.last
    }

    /// Whether anything was ever admitted.
    #[must_use]
    pub fn has_run(&self) -> bool {
        self.last.is_some()
    }

    /// The configured interval.
    #[must_use]
    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }
}
