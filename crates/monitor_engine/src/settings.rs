use std::sync::Arc;
use std::time::Duration;

pub const DEFAULT_MODEL: &str = "gemini-2.5-flash-preview-04-17";

/// Produces the timestamp shown in "still down" messages.
pub type Clock = Arc<dyn Fn() -> String + Send + Sync>;

/// Wall-clock time of day, e.g. `14:03:27`.
pub fn local_time_clock() -> Clock {
    Arc::new(|| chrono::Local::now().format("%H:%M:%S").to_string())
}

#[derive(Debug, Clone, PartialEq)]
pub struct ProbeSettings {
    pub latency: Duration,
    /// Chance that a host outside the allow-list is reported down.
    pub initial_down_chance: f64,
    /// Substrings that mark a URL as always up.
    pub allow_list: Vec<String>,
    pub seed: Option<u64>,
}

impl Default for ProbeSettings {
    fn default() -> Self {
        Self {
            latency: Duration::from_millis(1500),
            initial_down_chance: 0.4,
            allow_list: vec![
                "google.com".to_string(),
                "example.com".to_string(),
                "github.com".to_string(),
            ],
            seed: None,
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct PollSettings {
    pub interval: Duration,
    pub seed: Option<u64>,
}

impl Default for PollSettings {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(10_000),
            seed: None,
        }
    }
}

#[derive(Clone, PartialEq, Eq)]
pub struct InsightSettings {
    /// `None` or blank selects mock mode.
    pub api_key: Option<String>,
    pub model: String,
    pub base_url: String,
    pub request_timeout: Duration,
    pub mock_delay: Duration,
}

impl InsightSettings {
    pub fn has_credential(&self) -> bool {
        self.api_key
            .as_deref()
            .is_some_and(|key| !key.trim().is_empty())
    }
}

impl Default for InsightSettings {
    fn default() -> Self {
        Self {
            api_key: None,
            model: DEFAULT_MODEL.to_string(),
            base_url: "https://generativelanguage.googleapis.com".to_string(),
            request_timeout: Duration::from_secs(30),
            mock_delay: Duration::from_millis(750),
        }
    }
}

// Keeps the key out of logs.
impl std::fmt::Debug for InsightSettings {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("InsightSettings")
            .field("api_key", &self.api_key.as_ref().map(|_| "<redacted>"))
            .field("model", &self.model)
            .field("base_url", &self.base_url)
            .field("request_timeout", &self.request_timeout)
            .field("mock_delay", &self.mock_delay)
            .finish()
    }
}

#[derive(Clone)]
pub struct EngineConfig {
    pub probe: ProbeSettings,
    pub poll: PollSettings,
    pub insight: InsightSettings,
    pub clock: Clock,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            probe: ProbeSettings::default(),
            poll: PollSettings::default(),
            insight: InsightSettings::default(),
            clock: local_time_clock(),
        }
    }
}

impl std::fmt::Debug for EngineConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EngineConfig")
            .field("probe", &self.probe)
            .field("poll", &self.poll)
            .field("insight", &self.insight)
            .finish_non_exhaustive()
    }
}
