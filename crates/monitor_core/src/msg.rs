#[derive(Debug, Clone, PartialEq)]
pub enum Msg {
    /// User edited the URL input box.
    UrlInputChanged(String),
    /// User edited the email input box.
    EmailInputChanged(String),
    /// User submitted the form with the current inputs.
    SubmitClicked,
    /// Result of the initial status check for a job.
    ProbeCompleted {
        job_id: crate::JobId,
        result: Result<crate::ProbeOutcome, String>,
    },
    /// Insight text (or a fallback string) requested for `status`.
    InsightReady {
        job_id: crate::JobId,
        status: crate::JobStatus,
        insight: String,
    },
    /// One polling interval elapsed. `roll` is a uniform sample in `[0, 1)`;
    /// the job recovers when it falls below the recovery chance.
    PollTick {
        job_id: crate::JobId,
        roll: f64,
        checked_at: String,
    },
    /// Fallback for placeholder wiring.
    NoOp,
}
