use std::fmt;

use thiserror::Error;

pub type JobId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ProbeStatus {
    Up,
    Down,
}

impl fmt::Display for ProbeStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ProbeStatus::Up => write!(f, "up"),
            ProbeStatus::Down => write!(f, "down"),
        }
    }
}

/// Which situation an insight was requested for. Echoed back with the answer
/// so the caller can tell stale answers apart.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightTopic {
    Online,
    Down,
    Recovered,
}

#[derive(Debug, Clone, PartialEq)]
pub enum EngineEvent {
    ProbeCompleted {
        job_id: JobId,
        result: Result<ProbeStatus, ProbeError>,
    },
    /// `text` is `None` when the engine was built without an insight provider.
    InsightReady {
        job_id: JobId,
        topic: InsightTopic,
        text: Option<String>,
    },
    PollTick {
        job_id: JobId,
        roll: f64,
        checked_at: String,
    },
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ProbeError {
    #[error("status check failed: {0}")]
    Failed(String),
    #[error("status check task aborted: {0}")]
    Aborted(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum InsightError {
    #[error("invalid credential: {0}")]
    InvalidCredential(String),
    #[error("network error: {0}")]
    Network(String),
    #[error("api error (status {status}): {message}")]
    Api { status: u16, message: String },
    #[error("malformed response: {0}")]
    MalformedResponse(String),
}
