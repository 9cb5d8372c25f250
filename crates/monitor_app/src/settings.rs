//! Settings loading: defaults, then an optional `monitor.ron` file, then
//! environment variables.

use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use monitor_core::DEFAULT_RECOVERY_CHANCE;
use monitor_engine::EngineConfig;
use monitor_logging::{monitor_info, monitor_warn};
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const SETTINGS_FILENAME: &str = "monitor.ron";

const ENV_API_KEY: &str = "API_KEY";
const ENV_MODEL: &str = "GEMINI_MODEL";
const ENV_DOWN_CHANCE: &str = "MONITOR_DOWN_CHANCE";
const ENV_RECOVERY_CHANCE: &str = "MONITOR_RECOVERY_CHANCE";
const ENV_INTERVAL_MS: &str = "MONITOR_INTERVAL_MS";

#[derive(Debug, Error)]
pub enum SettingsError {
    #[error("failed to read settings from {path:?}: {source}")]
    Read {
        path: PathBuf,
        source: std::io::Error,
    },
    #[error("failed to parse settings from {path:?}: {message}")]
    Parse { path: PathBuf, message: String },
    #[error("{name}={value:?} is not a valid number")]
    InvalidNumber { name: &'static str, value: String },
    #[error("{name} must be between 0 and 1, got {value}")]
    OutOfRange { name: &'static str, value: f64 },
    #[error("polling interval must be greater than zero")]
    ZeroInterval,
}

#[derive(Debug, Clone)]
pub struct MonitorSettings {
    pub engine: EngineConfig,
    pub recovery_chance: f64,
}

impl Default for MonitorSettings {
    fn default() -> Self {
        Self {
            engine: EngineConfig::default(),
            recovery_chance: DEFAULT_RECOVERY_CHANCE,
        }
    }
}

/// On-disk shape of `monitor.ron`. Every field is optional.
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
#[serde(default)]
struct SettingsFile {
    initial_down_chance: Option<f64>,
    recovery_chance: Option<f64>,
    interval_ms: Option<u64>,
    probe_latency_ms: Option<u64>,
    mock_insight_delay_ms: Option<u64>,
    allow_list: Option<Vec<String>>,
    model: Option<String>,
    seed: Option<u64>,
}

/// Build settings from defaults, `settings_path` (skipped when missing) and
/// `lookup` for environment variables.
pub fn load_settings(
    settings_path: Option<&Path>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Result<MonitorSettings, SettingsError> {
    let mut settings = MonitorSettings::default();

    if let Some(path) = settings_path {
        if let Some(file) = read_settings_file(path)? {
            apply_file(&mut settings, file);
            monitor_info!("Loaded settings from {:?}", path);
        }
    }

    apply_env(&mut settings, &lookup)?;
    validate(&settings)?;
    Ok(settings)
}

fn read_settings_file(path: &Path) -> Result<Option<SettingsFile>, SettingsError> {
    let content = match fs::read_to_string(path) {
        Ok(text) => text,
        Err(err) if err.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(source) => {
            return Err(SettingsError::Read {
                path: path.to_path_buf(),
                source,
            })
        }
    };
    ron::from_str(&content)
        .map(Some)
        .map_err(|err| SettingsError::Parse {
            path: path.to_path_buf(),
            message: err.to_string(),
        })
}

fn apply_file(settings: &mut MonitorSettings, file: SettingsFile) {
    let engine = &mut settings.engine;
    if let Some(chance) = file.initial_down_chance {
        engine.probe.initial_down_chance = chance;
    }
    if let Some(chance) = file.recovery_chance {
        settings.recovery_chance = chance;
    }
    if let Some(ms) = file.interval_ms {
        engine.poll.interval = Duration::from_millis(ms);
    }
    if let Some(ms) = file.probe_latency_ms {
        engine.probe.latency = Duration::from_millis(ms);
    }
    if let Some(ms) = file.mock_insight_delay_ms {
        engine.insight.mock_delay = Duration::from_millis(ms);
    }
    if let Some(allow_list) = file.allow_list {
        engine.probe.allow_list = allow_list;
    }
    if let Some(model) = file.model {
        engine.insight.model = model;
    }
    if file.seed.is_some() {
        engine.probe.seed = file.seed;
        engine.poll.seed = file.seed;
    }
}

fn apply_env(
    settings: &mut MonitorSettings,
    lookup: &impl Fn(&str) -> Option<String>,
) -> Result<(), SettingsError> {
    let engine = &mut settings.engine;
    match lookup(ENV_API_KEY).filter(|key| !key.trim().is_empty()) {
        Some(key) => engine.insight.api_key = Some(key),
        None => monitor_warn!(
            "{} environment variable not found. Gemini features will be limited.",
            ENV_API_KEY
        ),
    }
    if let Some(model) = lookup(ENV_MODEL) {
        engine.insight.model = model;
    }
    if let Some(raw) = lookup(ENV_DOWN_CHANCE) {
        engine.probe.initial_down_chance = parse_number(ENV_DOWN_CHANCE, &raw)?;
    }
    if let Some(raw) = lookup(ENV_RECOVERY_CHANCE) {
        settings.recovery_chance = parse_number(ENV_RECOVERY_CHANCE, &raw)?;
    }
    if let Some(raw) = lookup(ENV_INTERVAL_MS) {
        let ms: u64 = parse_number(ENV_INTERVAL_MS, &raw)?;
        settings.engine.poll.interval = Duration::from_millis(ms);
    }
    Ok(())
}

fn parse_number<T: std::str::FromStr>(name: &'static str, raw: &str) -> Result<T, SettingsError> {
    raw.trim().parse().map_err(|_| SettingsError::InvalidNumber {
        name,
        value: raw.to_string(),
    })
}

fn validate(settings: &MonitorSettings) -> Result<(), SettingsError> {
    for (name, value) in [
        ("initial down chance", settings.engine.probe.initial_down_chance),
        ("recovery chance", settings.recovery_chance),
    ] {
        if !(0.0..=1.0).contains(&value) {
            return Err(SettingsError::OutOfRange { name, value });
        }
    }
    if settings.engine.poll.interval.is_zero() {
        return Err(SettingsError::ZeroInterval);
    }
    Ok(())
}
