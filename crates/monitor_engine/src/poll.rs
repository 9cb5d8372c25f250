use std::sync::Mutex;

use monitor_logging::{monitor_debug, monitor_info};
use tokio::sync::mpsc::UnboundedSender;
use tokio_util::sync::CancellationToken;

use crate::{Clock, EngineEvent, JobId, PollSettings};

struct ActivePoll {
    job_id: JobId,
    token: CancellationToken,
}

/// The single recovery-polling timer. Starting a new poll always cancels the
/// previous one, so at most one is ever running.
pub struct PollTimer {
    settings: PollSettings,
    active: Mutex<Option<ActivePoll>>,
}

impl PollTimer {
    pub fn new(settings: PollSettings) -> Self {
        Self {
            settings,
            active: Mutex::new(None),
        }
    }

    /// Spawn the interval task for `job_id` on the current tokio runtime.
    ///
    /// Each interval emits one [`EngineEvent::PollTick`] with a fresh uniform
    /// roll. The task stops when cancelled or when the receiver is gone.
    pub fn start(&self, job_id: JobId, events: UnboundedSender<EngineEvent>, clock: Clock) {
        let token = CancellationToken::new();
        let previous = self.lock().replace(ActivePoll {
            job_id,
            token: token.clone(),
        });
        if let Some(previous) = previous {
            previous.token.cancel();
            monitor_debug!("Replaced poll timer for job {}", previous.job_id);
        }

        let interval = self.settings.interval;
        let mut rng = self
            .settings
            .seed
            .map(|seed| fastrand::Rng::with_seed(seed.wrapping_add(job_id)))
            .unwrap_or_default();
        monitor_info!("Monitoring job {} every {:?}", job_id, interval);

        tokio::spawn(async move {
            loop {
                tokio::select! {
                    biased;
                    _ = token.cancelled() => break,
                    _ = tokio::time::sleep(interval) => {
                        let tick = EngineEvent::PollTick {
                            job_id,
                            roll: rng.f64(),
                            checked_at: clock(),
                        };
                        if events.send(tick).is_err() {
                            break;
                        }
                    }
                }
            }
            monitor_debug!("Poll timer for job {} stopped", job_id);
        });
    }

    /// Stop the running timer, if any. Returns the job it belonged to.
    pub fn cancel(&self) -> Option<JobId> {
        let active = self.lock().take()?;
        active.token.cancel();
        monitor_info!("Stopped monitoring job {}", active.job_id);
        Some(active.job_id)
    }

    pub fn active_job(&self) -> Option<JobId> {
        self.lock().as_ref().map(|active| active.job_id)
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Option<ActivePoll>> {
        // The guarded value is a plain handle; a poisoned lock still holds a
        // usable one.
        self.active
            .lock()
            .unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl Drop for PollTimer {
    fn drop(&mut self) {
        self.cancel();
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use tokio::sync::mpsc;

    use super::PollTimer;
    use crate::{EngineEvent, PollSettings};

    fn timer(interval_ms: u64) -> PollTimer {
        PollTimer::new(PollSettings {
            interval: Duration::from_millis(interval_ms),
            seed: Some(3),
        })
    }

    fn fixed_clock() -> crate::Clock {
        Arc::new(|| "12:00:00".to_string())
    }

    #[tokio::test(start_paused = true)]
    async fn emits_ticks_each_interval() {
        let timer = timer(10_000);
        let (tx, mut rx) = mpsc::unbounded_channel();
        timer.start(5, tx, fixed_clock());

        for _ in 0..3 {
            match rx.recv().await {
                Some(EngineEvent::PollTick {
                    job_id,
                    roll,
                    checked_at,
                }) => {
                    assert_eq!(job_id, 5);
                    assert!((0.0..1.0).contains(&roll));
                    assert_eq!(checked_at, "12:00:00");
                }
                other => panic!("unexpected event {other:?}"),
            }
        }
        assert_eq!(timer.active_job(), Some(5));
    }

    #[tokio::test(start_paused = true)]
    async fn cancel_is_idempotent_and_stops_ticks() {
        let timer = timer(1_000);
        let (tx, mut rx) = mpsc::unbounded_channel();
        timer.start(1, tx, fixed_clock());

        assert_eq!(timer.cancel(), Some(1));
        assert_eq!(timer.cancel(), None);
        assert_eq!(timer.active_job(), None);

        // The task exits and drops its sender, closing the channel.
        assert_eq!(rx.recv().await, None);
    }

    #[tokio::test(start_paused = true)]
    async fn starting_again_replaces_previous_timer() {
        let timer = timer(1_000);
        let (first_tx, mut first_rx) = mpsc::unbounded_channel();
        let (second_tx, mut second_rx) = mpsc::unbounded_channel();
        timer.start(1, first_tx, fixed_clock());
        timer.start(2, second_tx, fixed_clock());

        assert_eq!(timer.active_job(), Some(2));
        assert_eq!(first_rx.recv().await, None);
        assert!(matches!(
            second_rx.recv().await,
            Some(EngineEvent::PollTick { job_id: 2, .. })
        ));
        timer.cancel();
    }
}
