use std::fmt;

use crate::view_model::{AppViewModel, JobView, StatusTone};

pub type JobId = u64;

/// Chance that a down site is seen back up on any one polling tick.
pub const DEFAULT_RECOVERY_CHANCE: f64 = 0.25;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum JobStatus {
    InitialCheck,
    InitiallyUp,
    DownMonitoring,
    Recovered,
    ErrorState,
}

impl JobStatus {
    /// Edges of the per-job state machine.
    pub fn can_transition_to(self, next: JobStatus) -> bool {
        matches!(
            (self, next),
            (JobStatus::InitialCheck, JobStatus::InitiallyUp)
                | (JobStatus::InitialCheck, JobStatus::DownMonitoring)
                | (JobStatus::InitialCheck, JobStatus::ErrorState)
                | (JobStatus::DownMonitoring, JobStatus::Recovered)
        )
    }

    pub fn is_terminal(self) -> bool {
        matches!(
            self,
            JobStatus::InitiallyUp | JobStatus::Recovered | JobStatus::ErrorState
        )
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let label = match self {
            JobStatus::InitialCheck => "INITIAL_CHECK",
            JobStatus::InitiallyUp => "INITIALLY_UP",
            JobStatus::DownMonitoring => "DOWN_MONITORING",
            JobStatus::Recovered => "RECOVERED",
            JobStatus::ErrorState => "ERROR_STATE",
        };
        f.write_str(label)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum AppPhase {
    #[default]
    Idle,
    Processing,
    Monitoring,
    Error,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeOutcome {
    Up,
    Down,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MonitoringJob {
    pub id: JobId,
    pub url: String,
    pub email: String,
    pub status: JobStatus,
    pub message: String,
    pub insight: Option<String>,
}

impl MonitoringJob {
    fn new(id: JobId, url: String, email: String) -> Self {
        Self {
            id,
            url,
            email,
            status: JobStatus::InitialCheck,
            message: crate::CHECKING_MESSAGE.to_string(),
            insight: None,
        }
    }

    /// Move to `next`, replacing the message. Any insight belonged to the
    /// previous status and is dropped.
    fn advance(&mut self, next: JobStatus, message: String) {
        debug_assert!(
            self.status.can_transition_to(next),
            "illegal transition {} -> {}",
            self.status,
            next
        );
        self.status = next;
        self.message = message;
        self.insight = None;
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct AppState {
    next_job_id: JobId,
    job: Option<MonitoringJob>,
    phase: AppPhase,
    app_message: Option<String>,
    url_input: String,
    email_input: String,
    loading: bool,
    recovery_chance: f64,
    insights_limited: bool,
    dirty: bool,
}

impl Default for AppState {
    fn default() -> Self {
        Self {
            next_job_id: 1,
            job: None,
            phase: AppPhase::Idle,
            app_message: None,
            url_input: String::new(),
            email_input: String::new(),
            loading: false,
            recovery_chance: DEFAULT_RECOVERY_CHANCE,
            insights_limited: false,
            dirty: false,
        }
    }
}

impl AppState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Override the per-tick recovery probability, clamped to `[0, 1]`.
    pub fn with_recovery_chance(mut self, chance: f64) -> Self {
        self.recovery_chance = chance.clamp(0.0, 1.0);
        self
    }

    /// Mark that no insight credential is configured, so the view can say so.
    pub fn with_insights_limited(mut self, limited: bool) -> Self {
        self.insights_limited = limited;
        self
    }

    pub fn job(&self) -> Option<&MonitoringJob> {
        self.job.as_ref()
    }

    pub fn phase(&self) -> AppPhase {
        self.phase
    }

    pub fn app_message(&self) -> Option<&str> {
        self.app_message.as_deref()
    }

    pub fn recovery_chance(&self) -> f64 {
        self.recovery_chance
    }

    /// True once the current submission no longer waits on a probe or its
    /// first insight.
    pub fn is_settled(&self) -> bool {
        match &self.job {
            None => true,
            Some(job) => job.status != JobStatus::InitialCheck && job.insight.is_some(),
        }
    }

    pub fn view(&self) -> AppViewModel {
        let job_panel = match self.phase {
            AppPhase::Idle | AppPhase::Monitoring => self.job.as_ref().map(job_view),
            AppPhase::Processing | AppPhase::Error => None,
        };
        let error_banner = match self.phase {
            AppPhase::Error => self.app_message.clone(),
            _ => None,
        };
        let progress_text = if self.loading && self.phase == AppPhase::Processing {
            Some(
                self.app_message
                    .clone()
                    .unwrap_or_else(|| "Processing...".to_string()),
            )
        } else {
            None
        };

        AppViewModel {
            phase: self.phase,
            app_message: self.app_message.clone(),
            url_input: self.url_input.clone(),
            email_input: self.email_input.clone(),
            is_loading: self.loading,
            submit_enabled: !self.loading && self.phase != AppPhase::Processing,
            insights_limited: self.insights_limited,
            progress_text,
            error_banner,
            job_panel,
            dirty: self.dirty,
        }
    }

    /// Returns whether anything changed since the last call, and clears the flag.
    pub fn consume_dirty(&mut self) -> bool {
        std::mem::take(&mut self.dirty)
    }

    pub(crate) fn mark_dirty(&mut self) {
        self.dirty = true;
    }

    pub(crate) fn set_url_input(&mut self, text: String) {
        self.url_input = text;
        self.mark_dirty();
    }

    pub(crate) fn set_email_input(&mut self, text: String) {
        self.email_input = text;
        self.mark_dirty();
    }

    /// Inputs are cleared after every submission attempt, valid or not.
    pub(crate) fn take_inputs(&mut self) -> (String, String) {
        self.mark_dirty();
        (
            std::mem::take(&mut self.url_input),
            std::mem::take(&mut self.email_input),
        )
    }

    pub(crate) fn clear_job(&mut self) {
        self.job = None;
        self.mark_dirty();
    }

    pub(crate) fn set_phase(&mut self, phase: AppPhase) {
        self.phase = phase;
        self.mark_dirty();
    }

    pub(crate) fn set_app_message(&mut self, message: impl Into<String>) {
        self.app_message = Some(message.into());
        self.mark_dirty();
    }

    pub(crate) fn set_loading(&mut self, loading: bool) {
        self.loading = loading;
        self.mark_dirty();
    }

    pub(crate) fn start_job(&mut self, url: String, email: String) -> JobId {
        let id = self.next_job_id;
        self.next_job_id += 1;
        self.job = Some(MonitoringJob::new(id, url, email));
        self.mark_dirty();
        id
    }

    /// The live job, but only if it is `job_id`. Results for superseded jobs
    /// resolve to `None` and must be dropped.
    pub(crate) fn current_job_mut(&mut self, job_id: JobId) -> Option<&mut MonitoringJob> {
        self.job.as_mut().filter(|job| job.id == job_id)
    }

    pub(crate) fn transition(&mut self, job_id: JobId, next: JobStatus, message: String) -> bool {
        let Some(job) = self.current_job_mut(job_id) else {
            return false;
        };
        if !job.status.can_transition_to(next) {
            return false;
        }
        job.advance(next, message);
        self.mark_dirty();
        true
    }
}

fn job_view(job: &MonitoringJob) -> JobView {
    let tone = match job.status {
        JobStatus::InitialCheck => StatusTone::Checking,
        JobStatus::InitiallyUp => StatusTone::Online,
        JobStatus::DownMonitoring => StatusTone::Watching,
        JobStatus::Recovered => StatusTone::Notified,
        JobStatus::ErrorState => StatusTone::Failed,
    };
    let notify_line = if job.status.is_terminal() {
        None
    } else {
        Some(format!("Notifications will be sent to: {}", job.email))
    };
    let notice = (job.status == JobStatus::Recovered)
        .then(|| format!("Simulated email notification sent to {}.", job.email));

    JobView {
        job_id: job.id,
        url: job.url.clone(),
        status: job.status,
        tone,
        message: job.message.clone(),
        insight: job.insight.clone(),
        notify_line,
        notice,
    }
}
