//! Monitor engine: simulated probing, insight generation and the polling timer.
mod engine;
mod gemini;
mod insight;
mod poll;
mod probe;
mod settings;
mod types;

pub use engine::{EngineBuilder, EngineHandle};
pub use gemini::{GeminiClient, TextGenerator};
pub use insight::{
    InsightMode, InsightProvider, MockProvider, RealProvider, GENERIC_FALLBACK,
    INVALID_KEY_FALLBACK,
};
pub use poll::PollTimer;
pub use probe::{SimulatedProbe, StatusProbe};
pub use settings::{
    local_time_clock, Clock, EngineConfig, InsightSettings, PollSettings, ProbeSettings,
    DEFAULT_MODEL,
};
pub use types::{EngineEvent, InsightError, InsightTopic, JobId, ProbeError, ProbeStatus};
