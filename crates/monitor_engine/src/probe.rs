use std::sync::Mutex;

use monitor_logging::monitor_debug;

use crate::{ProbeError, ProbeSettings, ProbeStatus};

#[async_trait::async_trait]
pub trait StatusProbe: Send + Sync {
    async fn check(&self, url: &str) -> Result<ProbeStatus, ProbeError>;
}

/// Stand-in for a real monitoring backend: allow-listed hosts are always up,
/// anything else is down with a fixed probability after a fake delay.
#[derive(Debug)]
pub struct SimulatedProbe {
    settings: ProbeSettings,
    rng: Mutex<fastrand::Rng>,
}

impl SimulatedProbe {
    pub fn new(settings: ProbeSettings) -> Self {
        let rng = settings
            .seed
            .map(fastrand::Rng::with_seed)
            .unwrap_or_default();
        Self {
            settings,
            rng: Mutex::new(rng),
        }
    }

    fn is_allow_listed(&self, url: &str) -> bool {
        self.settings
            .allow_list
            .iter()
            .any(|host| url.contains(host.as_str()))
    }

    fn roll(&self) -> Result<f64, ProbeError> {
        let mut rng = self
            .rng
            .lock()
            .map_err(|_| ProbeError::Failed("random source poisoned".to_string()))?;
        Ok(rng.f64())
    }
}

#[async_trait::async_trait]
impl StatusProbe for SimulatedProbe {
    async fn check(&self, url: &str) -> Result<ProbeStatus, ProbeError> {
        monitor_debug!("Simulating status check for: {}", url);
        tokio::time::sleep(self.settings.latency).await;

        if self.is_allow_listed(url) {
            return Ok(ProbeStatus::Up);
        }
        if self.roll()? < self.settings.initial_down_chance {
            Ok(ProbeStatus::Down)
        } else {
            Ok(ProbeStatus::Up)
        }
    }
}
