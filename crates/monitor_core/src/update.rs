use crate::messages::{
    down_message, error_message, fetching_insights, monitoring_message, recovered_message,
    still_down_message, up_message,
};
use crate::{
    insight_prompt, validate_submission, AppPhase, AppState, Effect, JobId, JobStatus, Msg,
    ProbeOutcome, ERROR_INSIGHT, PROCESSING_MESSAGE, VALIDATION_MESSAGE,
};

/// Pure update function: applies a message to state and returns any effects.
pub fn update(mut state: AppState, msg: Msg) -> (AppState, Vec<Effect>) {
    let effects = match msg {
        Msg::UrlInputChanged(text) => {
            state.set_url_input(text);
            Vec::new()
        }
        Msg::EmailInputChanged(text) => {
            state.set_email_input(text);
            Vec::new()
        }
        Msg::SubmitClicked => submit(&mut state),
        Msg::ProbeCompleted { job_id, result } => probe_completed(&mut state, job_id, result),
        Msg::InsightReady {
            job_id,
            status,
            insight,
        } => {
            insight_ready(&mut state, job_id, status, insight);
            Vec::new()
        }
        Msg::PollTick {
            job_id,
            roll,
            checked_at,
        } => poll_tick(&mut state, job_id, roll, &checked_at),
        Msg::NoOp => Vec::new(),
    };

    (state, effects)
}

fn submit(state: &mut AppState) -> Vec<Effect> {
    let (url, email) = state.take_inputs();
    // Any timer belongs to the job being replaced; stop it before anything else.
    let mut effects = vec![Effect::CancelPolling];
    state.clear_job();

    if validate_submission(&url, &email).is_err() {
        state.set_phase(AppPhase::Error);
        state.set_app_message(VALIDATION_MESSAGE);
        state.set_loading(false);
        return effects;
    }

    let url = url.trim().to_string();
    let email = email.trim().to_string();
    state.set_phase(AppPhase::Processing);
    state.set_app_message(PROCESSING_MESSAGE);
    state.set_loading(true);
    let job_id = state.start_job(url.clone(), email);
    effects.push(Effect::RunProbe { job_id, url });
    effects
}

fn probe_completed(
    state: &mut AppState,
    job_id: JobId,
    result: Result<ProbeOutcome, String>,
) -> Vec<Effect> {
    let Some(job) = state.current_job_mut(job_id) else {
        return Vec::new();
    };
    if job.status != JobStatus::InitialCheck {
        return Vec::new();
    }
    let url = job.url.clone();

    match result {
        Ok(ProbeOutcome::Up) => {
            let message = up_message(&url);
            state.transition(job_id, JobStatus::InitiallyUp, message.clone());
            state.set_phase(AppPhase::Idle);
            state.set_app_message(fetching_insights(&message));
            insight_request(job_id, JobStatus::InitiallyUp, &url)
                .into_iter()
                .collect()
        }
        Ok(ProbeOutcome::Down) => {
            let message = down_message(&url);
            state.transition(job_id, JobStatus::DownMonitoring, message.clone());
            state.set_phase(AppPhase::Monitoring);
            state.set_app_message(fetching_insights(&message));
            let mut effects = vec![Effect::StartPolling { job_id }];
            effects.extend(insight_request(job_id, JobStatus::DownMonitoring, &url));
            effects
        }
        Err(_) => {
            let message = error_message(&url);
            state.transition(job_id, JobStatus::ErrorState, message.clone());
            if let Some(job) = state.current_job_mut(job_id) {
                job.insight = Some(ERROR_INSIGHT.to_string());
            }
            state.set_phase(AppPhase::Error);
            state.set_app_message(message);
            state.set_loading(false);
            vec![Effect::CancelPolling]
        }
    }
}

fn insight_ready(state: &mut AppState, job_id: JobId, status: JobStatus, insight: String) {
    let Some(job) = state.current_job_mut(job_id) else {
        return;
    };
    // Answers for a status the job has already left are stale.
    if job.status != status || job.insight.is_some() {
        return;
    }
    job.insight = Some(insight);
    let app_message = match status {
        JobStatus::InitiallyUp => Some(job.message.clone()),
        JobStatus::DownMonitoring => Some(monitoring_message(&job.url, &job.email)),
        _ => None,
    };

    state.mark_dirty();
    state.set_loading(false);
    if let Some(message) = app_message {
        state.set_app_message(message);
    }
}

fn poll_tick(state: &mut AppState, job_id: JobId, roll: f64, checked_at: &str) -> Vec<Effect> {
    let recovery_chance = state.recovery_chance();
    let monitoring = state.phase() == AppPhase::Monitoring;
    let Some(job) = state.current_job_mut(job_id) else {
        return Vec::new();
    };
    if !monitoring || job.status != JobStatus::DownMonitoring {
        return Vec::new();
    }
    let url = job.url.clone();
    let email = job.email.clone();

    if roll < recovery_chance {
        let message = recovered_message(&url, &email);
        state.transition(job_id, JobStatus::Recovered, message.clone());
        state.set_phase(AppPhase::Idle);
        state.set_app_message(message);
        let mut effects = vec![
            Effect::CancelPolling,
            Effect::NotifyRecovered {
                job_id,
                url: url.clone(),
                email,
            },
        ];
        effects.extend(insight_request(job_id, JobStatus::Recovered, &url));
        effects
    } else {
        job.message = still_down_message(&url, checked_at);
        state.mark_dirty();
        Vec::new()
    }
}

fn insight_request(job_id: JobId, status: JobStatus, url: &str) -> Option<Effect> {
    insight_prompt(status, url).map(|prompt| Effect::RequestInsight {
        job_id,
        status,
        prompt,
    })
}
