use monitor_core::{update, AppPhase, AppState, AppViewModel, Effect, JobId, MonitoringJob, Msg};
use monitor_engine::{EngineEvent, EngineHandle, InsightMode};
use monitor_logging::monitor_debug;
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::effects::{engine_event_to_msg, EffectRunner};
use crate::MonitorSettings;

/// What observers of the controller are told about.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ControllerEvent {
    /// The live job changed; `None` when it was cleared.
    JobChanged(Option<MonitoringJob>),
    PhaseChanged(AppPhase),
    PollingStarted(JobId),
    PollingStopped(JobId),
    NotificationSent {
        job_id: JobId,
        url: String,
        email: String,
    },
}

/// Owns the single job state and is its only mutator.
///
/// Messages go through the pure [`update`]; the resulting effects are run on
/// the engine, whose results come back as messages on the next
/// [`Controller::next_event`].
pub struct Controller {
    state: AppState,
    runner: EffectRunner,
    engine_events: UnboundedReceiver<EngineEvent>,
    observers: Vec<UnboundedSender<ControllerEvent>>,
}

impl Controller {
    /// Build the engine from `settings` on the current tokio runtime.
    pub fn new(settings: MonitorSettings) -> Self {
        let (engine, events) = EngineHandle::new(settings.engine);
        Self::with_engine(engine, events, settings.recovery_chance)
    }

    pub fn with_engine(
        engine: EngineHandle,
        engine_events: UnboundedReceiver<EngineEvent>,
        recovery_chance: f64,
    ) -> Self {
        let state = AppState::new()
            .with_recovery_chance(recovery_chance)
            .with_insights_limited(engine.insight_mode() != InsightMode::Real);
        Self {
            state,
            runner: EffectRunner::new(engine),
            engine_events,
            observers: Vec::new(),
        }
    }

    pub fn subscribe(&mut self) -> UnboundedReceiver<ControllerEvent> {
        let (tx, rx) = mpsc::unbounded_channel();
        self.observers.push(tx);
        rx
    }

    pub fn state(&self) -> &AppState {
        &self.state
    }

    pub fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub fn consume_dirty(&mut self) -> bool {
        self.state.consume_dirty()
    }

    pub fn polling_job(&self) -> Option<JobId> {
        self.runner.engine().polling_job()
    }

    /// Fill in the form, submit it, and wait until the initial check and its
    /// first insight have been applied.
    pub async fn submit(&mut self, url: &str, email: &str) {
        self.dispatch(Msg::UrlInputChanged(url.to_string()));
        self.dispatch(Msg::EmailInputChanged(email.to_string()));
        self.dispatch(Msg::SubmitClicked);
        self.settle().await;
    }

    /// Apply engine results until nothing is pending for the current job.
    pub async fn settle(&mut self) {
        while !self.state.is_settled() {
            if !self.next_event().await {
                break;
            }
        }
    }

    /// Apply the next engine result. Returns `false` once the engine is gone.
    pub async fn next_event(&mut self) -> bool {
        match self.engine_events.recv().await {
            Some(event) => {
                self.dispatch(engine_event_to_msg(event));
                true
            }
            None => false,
        }
    }

    pub fn dispatch(&mut self, msg: Msg) {
        let job_before = self.state.job().cloned();
        let phase_before = self.state.phase();

        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;

        // Timers are stopped before anyone sees the state that replaced them.
        let (cancels, rest): (Vec<_>, Vec<_>) = effects
            .into_iter()
            .partition(|effect| matches!(effect, Effect::CancelPolling));
        for event in self.runner.run(cancels) {
            self.emit(event);
        }

        if self.state.job() != job_before.as_ref() {
            self.emit(ControllerEvent::JobChanged(self.state.job().cloned()));
        }
        if self.state.phase() != phase_before {
            monitor_debug!("Phase {:?} -> {:?}", phase_before, self.state.phase());
            self.emit(ControllerEvent::PhaseChanged(self.state.phase()));
        }

        for event in self.runner.run(rest) {
            self.emit(event);
        }
    }

    /// Serve a front end: apply its messages and engine results as they
    /// arrive, calling `render` whenever the view changed. Returns when the
    /// inbox closes; any running timer is stopped.
    pub async fn run<F>(mut self, mut inbox: UnboundedReceiver<Msg>, mut render: F)
    where
        F: FnMut(&AppViewModel),
    {
        render(&self.state.view());
        loop {
            tokio::select! {
                msg = inbox.recv() => match msg {
                    Some(msg) => self.dispatch(msg),
                    None => break,
                },
                Some(event) = self.engine_events.recv() => {
                    self.dispatch(engine_event_to_msg(event));
                }
            }
            if self.state.consume_dirty() {
                render(&self.state.view());
            }
        }
        self.runner.engine().stop_polling();
    }

    fn emit(&mut self, event: ControllerEvent) {
        self.observers.retain(|tx| tx.send(event.clone()).is_ok());
    }
}
