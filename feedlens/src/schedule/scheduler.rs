//! The re-analysis scheduler.
//!
//! A scheduler owns one page session. It binds a change watcher to the
//! platform's result container (retrying until the container exists), runs
//! a first analysis once the page has settled, and re-analyses whenever the
//! container gains nodes. Every analysis request passes the throttle gate.
//! Commands are served on the same task, between those events.

use std::fmt;
use std::sync::Arc;

use futures::StreamExt;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{sleep, Instant};
use tracing::{debug, info, warn, Instrument};

use super::session::{AnalysisSession, ScheduleState};
use super::watcher::{container_selector, ChangeBatch, PageHost};
use crate::commands::{AckStatus, Acknowledgement, Command, SuggestedAction};
use crate::config::ScheduleConfig;
use crate::context::{classify, PageContext, PageLocation};
use crate::extract::{ExtractionResult, ExtractionRouter};
use crate::metrics::{FeedAnalyzer, MetricsSink, MetricsUpdate};
use crate::observability::AnalysisSpanAttributes;

/// What asked for an analysis.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AnalysisTrigger {
    /// The settle delay after binding elapsed.
    Settled,
    /// The watched container gained nodes.
    Mutation,
    /// An `ANALYZE_FEED` command.
    Command,
}

impl fmt::Display for AnalysisTrigger {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Settled => write!(f, "settled"),
            Self::Mutation => write!(f, "mutation"),
            Self::Command => write!(f, "command"),
        }
    }
}

/// Result of one analysis request.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnalysisOutcome {
    /// Metrics were published for this many extracted items.
    Published {
        /// Items extracted.
        total_items: usize,
    },
    /// Nothing was extracted; nothing was published.
    Empty,
    /// Dropped by the throttle gate.
    Throttled,
    /// The page is not analysed at all.
    Inactive,
}

/// Input delivered to a running scheduler.
#[derive(Debug)]
pub enum SchedulerInput {
    /// A command, with an optional reply channel for the acknowledgement.
    Command {
        /// The command.
        command: Command,
        /// Where to send the acknowledgement.
        reply: Option<oneshot::Sender<Acknowledgement>>,
    },
    /// The host navigated to a new location.
    Navigate(PageLocation),
}

impl SchedulerInput {
    /// A command paired with a fresh reply channel.
    #[must_use]
    pub fn command(command: Command) -> (Self, oneshot::Receiver<Acknowledgement>) {
        let (tx, rx) = oneshot::channel();
        (
            Self::Command {
                command,
                reply: Some(tx),
            },
            rx,
        )
    }
}

enum BoundEvent {
    Settled,
    Changes(Option<ChangeBatch>),
    Input(Option<SchedulerInput>),
}

enum UnboundEvent {
    Retry,
    Input(Option<SchedulerInput>),
}

/// Drives extraction for one page.
pub struct Scheduler<H: PageHost> {
    host: H,
    router: ExtractionRouter<H::Document>,
    analyzer: Arc<dyn FeedAnalyzer>,
    sink: Arc<dyn MetricsSink>,
    config: ScheduleConfig,
    session: AnalysisSession,
}

impl<H: PageHost> Scheduler<H> {
    /// Creates a scheduler for the host's current page.
    pub fn new(
        host: H,
        router: ExtractionRouter<H::Document>,
        analyzer: Arc<dyn FeedAnalyzer>,
        sink: Arc<dyn MetricsSink>,
        config: ScheduleConfig,
    ) -> Self {
        let context = classify(&host.location());
        let session = AnalysisSession::new(context, config.min_interval());
        Self {
            host,
            router,
            analyzer,
            sink,
            config,
            session,
        }
    }

    /// The current session.
    #[must_use]
    pub fn session(&self) -> &AnalysisSession {
        &self.session
    }

    /// Scheduling state of the current session.
    #[must_use]
    pub fn state(&self) -> &ScheduleState {
        &self.session.state
    }

    /// Context of the current page.
    #[must_use]
    pub fn context(&self) -> PageContext {
        self.session.context
    }

    /// The host.
    #[must_use]
    pub fn host(&self) -> &H {
        &self.host
    }

    /// Reclassifies after a navigation and starts a fresh session.
    pub fn navigate(&mut self, location: &PageLocation) -> PageContext {
        let context = classify(location);
        self.session = self.session.renew(context);
        info!(
            session_id = %self.session.id,
            platform = %context.platform,
            mode = %context.mode,
            supported = context.supported,
            "Navigated"
        );
        context
    }

    /// Serves the page until the future is dropped.
    ///
    /// Unsupported pages are not watched, but commands are still acknowledged
    /// and navigation is followed. On such a page the run returns once the
    /// input channel closes. On a supported page a closed channel only stops
    /// command delivery.
    pub async fn run(&mut self, mut inputs: mpsc::Receiver<SchedulerInput>) {
        let mut inputs_open = true;

        'session: loop {
            let ctx = self.session.context;
            if !ctx.supported {
                info!(
                    platform = %ctx.platform,
                    mode = %ctx.mode,
                    "Page not analysed"
                );
                while inputs_open {
                    match inputs.recv().await {
                        Some(input) => {
                            if self.dispatch(input).await {
                                continue 'session;
                            }
                        }
                        None => inputs_open = false,
                    }
                }
                debug!("Input channel closed on an unsupported page");
                return;
            }
            let selector = container_selector(ctx.platform);

            let mut changes = loop {
                if let Some(stream) = self.host.observe(selector) {
                    break stream;
                }
                self.session.state.set_watcher_bound(false);
                debug!(
                    platform = %ctx.platform,
                    retry_secs = self.config.bind_retry().as_secs_f64(),
                    "Content container not ready"
                );

                let retry = sleep(self.config.bind_retry());
                tokio::pin!(retry);
                loop {
                    let event = tokio::select! {
                        () = &mut retry => UnboundEvent::Retry,
                        input = inputs.recv(), if inputs_open => UnboundEvent::Input(input),
                    };
                    match event {
                        UnboundEvent::Retry => break,
                        UnboundEvent::Input(None) => inputs_open = false,
                        UnboundEvent::Input(Some(input)) => {
                            if self.dispatch(input).await {
                                continue 'session;
                            }
                        }
                    }
                }
            };

            self.session.state.set_watcher_bound(true);
            info!(session_id = %self.session.id, platform = %ctx.platform, "Content observer active");

            let settle = sleep(self.config.settle_delay());
            tokio::pin!(settle);
            let mut settled = false;

            loop {
                let event = tokio::select! {
                    () = &mut settle, if !settled => BoundEvent::Settled,
                    batch = changes.next() => BoundEvent::Changes(batch),
                    input = inputs.recv(), if inputs_open => BoundEvent::Input(input),
                };
                match event {
                    BoundEvent::Settled => {
                        settled = true;
                        self.request_analysis(AnalysisTrigger::Settled).await;
                    }
                    BoundEvent::Changes(Some(batch)) => {
                        if batch.has_insertions() {
                            self.request_analysis(AnalysisTrigger::Mutation).await;
                        }
                    }
                    BoundEvent::Changes(None) => {
                        debug!("Content container went stale");
                        self.session.state.set_watcher_bound(false);
                        continue 'session;
                    }
                    BoundEvent::Input(None) => inputs_open = false,
                    BoundEvent::Input(Some(input)) => {
                        if self.dispatch(input).await {
                            continue 'session;
                        }
                    }
                }
            }
        }
    }

    /// Handles one input. Returns `true` when the session was replaced.
    async fn dispatch(&mut self, input: SchedulerInput) -> bool {
        match input {
            SchedulerInput::Command { command, reply } => {
                let ack = self.handle_command(command).await;
                if let Some(reply) = reply {
                    if reply.send(ack).is_err() {
                        debug!("Command sender went away before the acknowledgement");
                    }
                }
                false
            }
            SchedulerInput::Navigate(location) => {
                self.navigate(&location);
                true
            }
        }
    }

    /// Serves one command.
    pub async fn handle_command(&mut self, command: Command) -> Acknowledgement {
        debug!(command = command.kind(), "Command received");
        let status = match command {
            Command::ActivateLens { lens } => {
                info!(lens = %lens, "Lens activated");
                self.session.active_lens = Some(lens);
                AckStatus::LensActivated
            }
            Command::ActivatePersona { persona } => {
                info!(persona = %persona, "Persona activated");
                self.session.active_persona = Some(persona);
                AckStatus::PersonaActivated
            }
            Command::AnalyzeFeed => {
                let outcome = self.request_analysis(AnalysisTrigger::Command).await;
                debug!(?outcome, "Requested analysis handled");
                AckStatus::AnalysisComplete
            }
            Command::ExecuteActions { actions } => {
                self.execute_actions(&actions);
                AckStatus::ActionsExecuted
            }
            Command::TriggerBreach => {
                info!(lens = ?self.session.active_lens, "Breach requested");
                AckStatus::BreachInitiated
            }
            Command::Unknown => AckStatus::UnknownMessage,
        };
        status.into()
    }

    fn execute_actions(&mut self, actions: &[serde_json::Value]) {
        for action in SuggestedAction::decode_all(actions) {
            match action {
                SuggestedAction::SuggestBreach { lens } => {
                    info!(lens = %lens, "Suggesting a breach");
                }
                SuggestedAction::ActivateLens { lens, reason } => {
                    info!(lens = %lens, reason = %reason, "Auto-activating lens");
                    self.session.active_lens = Some(lens);
                }
                SuggestedAction::ShowNotification { message } => {
                    info!(message = %message, "Notification");
                }
                SuggestedAction::Unknown => {}
            }
        }
    }

    /// Requests an analysis now.
    ///
    /// Dropped when the throttle window is still open. An admitted request
    /// consumes the window even when nothing is extracted.
    pub async fn request_analysis(&mut self, trigger: AnalysisTrigger) -> AnalysisOutcome {
        let ctx = self.session.context;
        if !ctx.supported {
            return AnalysisOutcome::Inactive;
        }

        let now = Instant::now();
        if !self.session.state.try_begin_analysis(now) {
            debug!(
                %trigger,
                wait_secs = self.session.state.throttled_for(now).as_secs_f64(),
                "Throttled: too soon since last analysis"
            );
            return AnalysisOutcome::Throttled;
        }

        let span = AnalysisSpanAttributes::new()
            .with_session_id(self.session.id.to_string())
            .with_context(&ctx)
            .with_trigger(trigger.to_string())
            .span();

        let result = span.in_scope(|| self.extract_snapshot());
        if result.is_empty() {
            span.in_scope(|| {
                warn!(platform = %ctx.platform, "No results found, waiting for page to load");
            });
            return AnalysisOutcome::Empty;
        }

        let total_items = result.len();
        let metrics = self.analyzer.analyze(&result.items);
        let update = MetricsUpdate::new(&ctx, metrics);
        self.sink.publish(update).instrument(span).await;
        AnalysisOutcome::Published { total_items }
    }

    /// Extracts from a fresh snapshot. The snapshot is dropped before
    /// returning.
    fn extract_snapshot(&self) -> ExtractionResult {
        let doc = self.host.document();
        self.router.extract(&self.session.context, &doc)
    }
}

impl<H: PageHost> fmt::Debug for Scheduler<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Scheduler")
            .field("session", &self.session)
            .field("config", &self.config)
            .field("router", &self.router)
            .finish_non_exhaustive()
    }
}
