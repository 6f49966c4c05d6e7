//! Per-page scheduling state.

use chrono::{DateTime, Utc};
use tokio::time::{Duration, Instant};
use uuid::Uuid;

use super::throttle::ThrottleGate;
use crate::context::PageContext;

/// Mutable scheduling state for one loaded page. Written only by the
/// scheduler that owns it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScheduleState {
    gate: ThrottleGate,
    watcher_bound: bool,
    analyses_run: u64,
}

impl ScheduleState {
    /// Fresh state: unbound, nothing analysed.
    #[must_use]
    pub fn new(min_interval: Duration) -> Self {
        Self {
            gate: ThrottleGate::new(min_interval),
            watcher_bound: false,
            analyses_run: 0,
        }
    }

    /// When the last analysis was admitted.
    #[must_use]
    pub fn last_analysis(&self) -> Option<Instant> {
        self.gate.last()
    }

    /// Whether a change watcher is attached.
    #[must_use]
    pub fn watcher_bound(&self) -> bool {
        self.watcher_bound
    }

    /// Number of admitted analyses.
    #[must_use]
    pub fn analyses_run(&self) -> u64 {
        self.analyses_run
    }

    /// Time until the next analysis would be admitted.
    #[must_use]
    pub fn throttled_for(&self, now: Instant) -> Duration {
        self.gate.remaining(now)
    }

    pub(super) fn try_begin_analysis(&mut self, now: Instant) -> bool {
        let admitted = self.gate.try_acquire(now);
        if admitted {
            self.analyses_run += 1;
        }
        admitted
    }

    pub(super) fn set_watcher_bound(&mut self, bound: bool) {
        self.watcher_bound = bound;
    }
}

/// Everything the scheduler knows about the current page. Replaced on
/// navigation.
#[derive(Debug, Clone)]
pub struct AnalysisSession {
    /// Session identifier, used in logs.
    pub id: Uuid,
    /// Context derived from the page location.
    pub context: PageContext,
    /// Scheduling state.
    pub state: ScheduleState,
    /// Lens chosen by the user or the rule engine.
    pub active_lens: Option<String>,
    /// Persona chosen by the user.
    pub active_persona: Option<String>,
    /// When the session began.
    pub started_at: DateTime<Utc>,
}

impl AnalysisSession {
    /// Starts a session for a page.
    #[must_use]
    pub fn new(context: PageContext, min_interval: Duration) -> Self {
        Self {
            id: Uuid::new_v4(),
            context,
            state: ScheduleState::new(min_interval),
            active_lens: None,
            active_persona: None,
            started_at: Utc::now(),
        }
    }

    /// A new session for the next page. The lens and persona carry over;
    /// they are user preferences, not page state.
    #[must_use]
    pub fn renew(&self, context: PageContext) -> Self {
        Self {
            active_lens: self.active_lens.clone(),
            active_persona: self.active_persona.clone(),
            ..Self::new(context, self.state.gate.min_interval())
        }
    }
}
