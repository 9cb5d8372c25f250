use crate::{AppPhase, JobId, JobStatus};

/// Visual treatment for a job panel; the renderer picks icon and color.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StatusTone {
    Checking,
    Online,
    Watching,
    Notified,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct AppViewModel {
    pub phase: AppPhase,
    pub app_message: Option<String>,
    pub url_input: String,
    pub email_input: String,
    pub is_loading: bool,
    pub submit_enabled: bool,
    pub insights_limited: bool,
    /// Spinner text while the initial check is in flight.
    pub progress_text: Option<String>,
    pub error_banner: Option<String>,
    /// Only shown while idle or monitoring.
    pub job_panel: Option<JobView>,
    pub dirty: bool,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct JobView {
    pub job_id: JobId,
    pub url: String,
    pub status: JobStatus,
    pub tone: StatusTone,
    pub message: String,
    pub insight: Option<String>,
    pub notify_line: Option<String>,
    pub notice: Option<String>,
}
