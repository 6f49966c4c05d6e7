//! Throttled re-analysis driven by document changes.
//!
//! This module provides:
//! - [`ThrottleGate`], the minimum-interval gate every request passes
//! - [`AnalysisSession`] and [`ScheduleState`], the per-page state
//! - [`PageHost`], the host capabilities a scheduler runs against
//! - [`Scheduler`], the event loop tying them together

mod scheduler;
mod session;
mod throttle;
mod watcher;


pub use scheduler::{AnalysisOutcome, AnalysisTrigger, Scheduler, SchedulerInput};
pub use session::{AnalysisSession, ScheduleState};
pub use throttle::ThrottleGate;
pub use watcher::{container_selector, ChangeBatch, ChangeStream, MutationRecord, PageHost};
