use crate::{JobId, JobStatus};

/// Work requested by [`crate::update`] for the controller to carry out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// Stop the polling timer if one is running. Idempotent.
    CancelPolling,
    RunProbe {
        job_id: JobId,
        url: String,
    },
    /// Start the recovery-polling timer for a job that was found down.
    StartPolling { job_id: JobId },
    RequestInsight {
        job_id: JobId,
        status: JobStatus,
        prompt: String,
    },
    /// Simulated email to the job owner once the site is back up.
    NotifyRecovered {
        job_id: JobId,
        url: String,
        email: String,
    },
}
