//! Monitor core: pure job state machine and view-model helpers.
mod effect;
mod messages;
mod msg;
mod state;
mod update;
mod validate;
mod view_model;

pub use effect::Effect;
pub use messages::{
    insight_prompt, CHECKING_MESSAGE, ERROR_INSIGHT, INSIGHTS_LIMITED_NOTICE,
    INSIGHT_UNAVAILABLE, PROCESSING_MESSAGE, VALIDATION_MESSAGE,
};
pub use msg::Msg;
pub use state::{
    AppPhase, AppState, JobId, JobStatus, MonitoringJob, ProbeOutcome, DEFAULT_RECOVERY_CHANCE,
};
pub use update::update;
pub use validate::{validate_submission, ValidationError};
pub use view_model::{AppViewModel, JobView, StatusTone};
