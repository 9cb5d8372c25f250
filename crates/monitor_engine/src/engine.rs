use std::sync::Arc;

use monitor_logging::{monitor_info, monitor_warn};
use tokio::sync::mpsc::{self, UnboundedReceiver, UnboundedSender};

use crate::{
    Clock, EngineConfig, EngineEvent, InsightMode, InsightProvider, InsightTopic, JobId,
    PollTimer, ProbeError, SimulatedProbe, StatusProbe,
};

/// Runs probe, insight and polling work on the current tokio runtime and
/// reports every result as an [`EngineEvent`] tagged with its job.
///
/// Must be used from within a tokio runtime.
#[derive(Clone)]
pub struct EngineHandle {
    inner: Arc<EngineInner>,
}

struct EngineInner {
    probe: Arc<dyn StatusProbe>,
    insights: Option<InsightProvider>,
    timer: PollTimer,
    clock: Clock,
    event_tx: UnboundedSender<EngineEvent>,
}

pub struct EngineBuilder {
    config: EngineConfig,
    probe: Option<Arc<dyn StatusProbe>>,
    insights: Option<Option<InsightProvider>>,
}

impl EngineBuilder {
    /// Replace the simulated probe.
    pub fn probe(mut self, probe: Arc<dyn StatusProbe>) -> Self {
        self.probe = Some(probe);
        self
    }

    /// Replace the provider chosen from the insight settings.
    pub fn insights(mut self, provider: InsightProvider) -> Self {
        self.insights = Some(Some(provider));
        self
    }

    /// Build without any insight provider.
    pub fn without_insights(mut self) -> Self {
        self.insights = Some(None);
        self
    }

    pub fn build(self) -> (EngineHandle, UnboundedReceiver<EngineEvent>) {
        let EngineConfig {
            probe,
            poll,
            insight,
            clock,
        } = self.config;
        let probe = self
            .probe
            .unwrap_or_else(|| Arc::new(SimulatedProbe::new(probe)));
        let insights = self
            .insights
            .unwrap_or_else(|| Some(InsightProvider::from_settings(&insight)));
        let (event_tx, event_rx) = mpsc::unbounded_channel();

        let inner = EngineInner {
            probe,
            insights,
            timer: PollTimer::new(poll),
            clock,
            event_tx,
        };
        (
            EngineHandle {
                inner: Arc::new(inner),
            },
            event_rx,
        )
    }
}

impl EngineHandle {
    pub fn new(config: EngineConfig) -> (Self, UnboundedReceiver<EngineEvent>) {
        Self::builder(config).build()
    }

    pub fn builder(config: EngineConfig) -> EngineBuilder {
        EngineBuilder {
            config,
            probe: None,
            insights: None,
        }
    }

    pub fn insight_mode(&self) -> InsightMode {
        self.inner
            .insights
            .as_ref()
            .map_or(InsightMode::Disabled, InsightProvider::mode)
    }

    /// Run the status probe for `url` in the background.
    pub fn check(&self, job_id: JobId, url: impl Into<String>) {
        let url = url.into();
        let probe = self.inner.probe.clone();
        let event_tx = self.inner.event_tx.clone();
        monitor_info!("Checking job {} url={}", job_id, url);

        tokio::spawn(async move {
            // A panicking probe must still settle the job.
            let task = tokio::spawn(async move { probe.check(&url).await });
            let result = match task.await {
                Ok(result) => result,
                Err(err) => Err(ProbeError::Aborted(err.to_string())),
            };
            match &result {
                Ok(status) => monitor_info!("Job {} probe result: {}", job_id, status),
                Err(err) => monitor_warn!("Job {} probe failed: {}", job_id, err),
            }
            let _ = event_tx.send(EngineEvent::ProbeCompleted { job_id, result });
        });
    }

    /// Generate insight text in the background. With no provider configured
    /// the answer arrives immediately with `text: None`.
    pub fn request_insight(&self, job_id: JobId, topic: InsightTopic, prompt: impl Into<String>) {
        let prompt = prompt.into();
        let event_tx = self.inner.event_tx.clone();
        let Some(provider) = self.inner.insights.clone() else {
            let _ = event_tx.send(EngineEvent::InsightReady {
                job_id,
                topic,
                text: None,
            });
            return;
        };

        tokio::spawn(async move {
            let text = provider.generate(&prompt).await;
            let _ = event_tx.send(EngineEvent::InsightReady {
                job_id,
                topic,
                text: Some(text),
            });
        });
    }

    pub fn start_polling(&self, job_id: JobId) {
        self.inner.timer.start(
            job_id,
            self.inner.event_tx.clone(),
            self.inner.clock.clone(),
        );
    }

    /// Idempotent; safe to call with no timer running.
    pub fn stop_polling(&self) -> Option<JobId> {
        self.inner.timer.cancel()
    }

    pub fn polling_job(&self) -> Option<JobId> {
        self.inner.timer.active_job()
    }
}
