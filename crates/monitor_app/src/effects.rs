use monitor_core::{Effect, JobId, JobStatus, Msg, ProbeOutcome, INSIGHT_UNAVAILABLE};
use monitor_engine::{EngineEvent, EngineHandle, InsightTopic, ProbeStatus};
use monitor_logging::{monitor_info, monitor_warn};

use crate::ControllerEvent;

pub(crate) struct EffectRunner {
    engine: EngineHandle,
}

impl EffectRunner {
    pub(crate) fn new(engine: EngineHandle) -> Self {
        Self { engine }
    }

    pub(crate) fn engine(&self) -> &EngineHandle {
        &self.engine
    }

    /// Execute effects in order, returning what observers should hear about.
    pub(crate) fn run(&self, effects: Vec<Effect>) -> Vec<ControllerEvent> {
        let mut events = Vec::new();
        for effect in effects {
            match effect {
                Effect::CancelPolling => {
                    if let Some(job_id) = self.engine.stop_polling() {
                        events.push(ControllerEvent::PollingStopped(job_id));
                    }
                }
                Effect::RunProbe { job_id, url } => {
                    self.engine.check(job_id, url);
                }
                Effect::StartPolling { job_id } => {
                    self.engine.start_polling(job_id);
                    events.push(ControllerEvent::PollingStarted(job_id));
                }
                Effect::RequestInsight {
                    job_id,
                    status,
                    prompt,
                } => match topic_for(status) {
                    Some(topic) => self.engine.request_insight(job_id, topic, prompt),
                    None => monitor_warn!("No insight topic for job {} in {}", job_id, status),
                },
                Effect::NotifyRecovered { job_id, url, email } => {
                    monitor_info!(
                        "SIMULATED EMAIL: Notification sent to {} for {} being back up.",
                        email,
                        url
                    );
                    events.push(ControllerEvent::NotificationSent { job_id, url, email });
                }
            }
        }
        events
    }
}

pub(crate) fn engine_event_to_msg(event: EngineEvent) -> Msg {
    match event {
        EngineEvent::ProbeCompleted { job_id, result } => Msg::ProbeCompleted {
            job_id,
            result: result.map(map_probe_status).map_err(|err| err.to_string()),
        },
        EngineEvent::InsightReady {
            job_id,
            topic,
            text,
        } => Msg::InsightReady {
            job_id,
            status: status_for(topic),
            insight: text.unwrap_or_else(|| INSIGHT_UNAVAILABLE.to_string()),
        },
        EngineEvent::PollTick {
            job_id,
            roll,
            checked_at,
        } => {
            log_tick(job_id, roll);
            Msg::PollTick {
                job_id,
                roll,
                checked_at,
            }
        }
    }
}

fn log_tick(job_id: JobId, roll: f64) {
    monitor_info!("Simulating background check for job {} (roll {:.3})", job_id, roll);
}

fn map_probe_status(status: ProbeStatus) -> ProbeOutcome {
    match status {
        ProbeStatus::Up => ProbeOutcome::Up,
        ProbeStatus::Down => ProbeOutcome::Down,
    }
}

fn topic_for(status: JobStatus) -> Option<InsightTopic> {
    match status {
        JobStatus::InitiallyUp => Some(InsightTopic::Online),
        JobStatus::DownMonitoring => Some(InsightTopic::Down),
        JobStatus::Recovered => Some(InsightTopic::Recovered),
        JobStatus::InitialCheck | JobStatus::ErrorState => None,
    }
}

fn status_for(topic: InsightTopic) -> JobStatus {
    match topic {
        InsightTopic::Online => JobStatus::InitiallyUp,
        InsightTopic::Down => JobStatus::DownMonitoring,
        InsightTopic::Recovered => JobStatus::Recovered,
    }
}

#[cfg(test)]
mod tests {
    use monitor_core::{JobStatus, Msg, INSIGHT_UNAVAILABLE};
    use monitor_engine::{EngineEvent, InsightTopic, ProbeError};

    use super::{engine_event_to_msg, status_for, topic_for};

    #[test]
    fn topics_round_trip_for_insight_statuses() {
        for status in [
            JobStatus::InitiallyUp,
            JobStatus::DownMonitoring,
            JobStatus::Recovered,
        ] {
            assert_eq!(topic_for(status).map(status_for), Some(status));
        }
        assert_eq!(topic_for(JobStatus::ErrorState), None);
    }

    #[test]
    fn missing_insight_text_becomes_placeholder() {
        let msg = engine_event_to_msg(EngineEvent::InsightReady {
            job_id: 4,
            topic: InsightTopic::Online,
            text: None,
        });
        assert_eq!(
            msg,
            Msg::InsightReady {
                job_id: 4,
                status: JobStatus::InitiallyUp,
                insight: INSIGHT_UNAVAILABLE.to_string(),
            }
        );
    }

    #[test]
    fn probe_errors_become_messages() {
        let msg = engine_event_to_msg(EngineEvent::ProbeCompleted {
            job_id: 1,
            result: Err(ProbeError::Failed("refused".to_string())),
        });
        assert_eq!(
            msg,
            Msg::ProbeCompleted {
                job_id: 1,
                result: Err("status check failed: refused".to_string()),
            }
        );
    }
}
