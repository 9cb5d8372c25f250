use monitor_core::{
    update, AppPhase, AppState, Effect, JobStatus, Msg, ProbeOutcome, CHECKING_MESSAGE,
    ERROR_INSIGHT, PROCESSING_MESSAGE, VALIDATION_MESSAGE,
};

fn init_logging() {
    monitor_logging::initialize_for_tests();
}

fn submit(state: AppState, url: &str, email: &str) -> (AppState, Vec<Effect>) {
    let (state, _) = update(state, Msg::UrlInputChanged(url.to_string()));
    let (state, _) = update(state, Msg::EmailInputChanged(email.to_string()));
    update(state, Msg::SubmitClicked)
}

#[test]
fn valid_submission_starts_initial_check() {
    init_logging();
    let (mut state, effects) = submit(AppState::new(), "https://example.com", "a@b.com");

    assert_eq!(
        effects,
        vec![
            Effect::CancelPolling,
            Effect::RunProbe {
                job_id: 1,
                url: "https://example.com".to_string(),
            },
        ]
    );
    let job = state.job().expect("job created");
    assert_eq!(job.status, JobStatus::InitialCheck);
    assert_eq!(job.message, CHECKING_MESSAGE);
    assert_eq!(job.insight, None);
    assert_eq!(state.phase(), AppPhase::Processing);
    assert_eq!(state.app_message(), Some(PROCESSING_MESSAGE));
    assert!(!state.is_settled());

    let view = state.view();
    assert!(view.is_loading);
    assert!(!view.submit_enabled);
    assert_eq!(view.progress_text.as_deref(), Some(PROCESSING_MESSAGE));
    assert!(view.job_panel.is_none());
    assert!(state.consume_dirty());
    assert!(!state.consume_dirty());
}

#[test]
fn invalid_submissions_create_no_job() {
    init_logging();
    for (url, email) in [
        ("", "a@b.com"),
        ("   ", "a@b.com"),
        ("https://example.com", ""),
        ("https://example.com", "  "),
        ("https://example.com", "nobody.example.com"),
    ] {
        let (state, effects) = submit(AppState::new(), url, email);
        assert!(state.job().is_none(), "job created for {url:?} {email:?}");
        assert_eq!(state.phase(), AppPhase::Error);
        assert_eq!(state.app_message(), Some(VALIDATION_MESSAGE));
        assert_eq!(effects, vec![Effect::CancelPolling]);
        assert_eq!(state.view().error_banner.as_deref(), Some(VALIDATION_MESSAGE));
    }
}

#[test]
fn inputs_are_cleared_after_every_attempt() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com", "broken");
    assert_eq!(state.view().url_input, "");
    assert_eq!(state.view().email_input, "");

    let (state, _) = submit(state, "https://example.com", "a@b.com");
    assert_eq!(state.view().url_input, "");
    assert_eq!(state.view().email_input, "");
}

#[test]
fn probe_up_settles_initially_up_after_insight() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://example.com", "a@b.com");
    let (state, effects) = update(
        state,
        Msg::ProbeCompleted {
            job_id: 1,
            result: Ok(ProbeOutcome::Up),
        },
    );

    let job = state.job().unwrap();
    assert_eq!(job.status, JobStatus::InitiallyUp);
    assert_eq!(job.message, "Good news! https://example.com is currently UP.");
    assert_eq!(state.phase(), AppPhase::Idle);
    assert_eq!(
        state.app_message(),
        Some("Good news! https://example.com is currently UP. Fetching insights...")
    );
    assert!(!effects
        .iter()
        .any(|effect| matches!(effect, Effect::StartPolling { .. })));
    let prompt = match &effects[..] {
        [Effect::RequestInsight {
            job_id: 1,
            status: JobStatus::InitiallyUp,
            prompt,
        }] => prompt.clone(),
        other => panic!("unexpected effects {other:?}"),
    };
    assert!(prompt.contains("it's online"));

    let (state, effects) = update(
        state,
        Msg::InsightReady {
            job_id: 1,
            status: JobStatus::InitiallyUp,
            insight: "A sample domain.".to_string(),
        },
    );
    assert!(effects.is_empty());
    assert!(state.is_settled());
    assert_eq!(state.job().unwrap().insight.as_deref(), Some("A sample domain."));
    assert_eq!(
        state.app_message(),
        Some("Good news! https://example.com is currently UP.")
    );
    let view = state.view();
    assert!(!view.is_loading);
    let panel = view.job_panel.expect("panel shown when idle");
    assert_eq!(panel.notify_line, None);
    assert_eq!(panel.notice, None);
}

#[test]
fn probe_down_starts_polling_and_requests_insight() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://down-site.test", "a@b.com");
    let (state, effects) = update(
        state,
        Msg::ProbeCompleted {
            job_id: 1,
            result: Ok(ProbeOutcome::Down),
        },
    );

    assert_eq!(state.job().unwrap().status, JobStatus::DownMonitoring);
    assert_eq!(state.phase(), AppPhase::Monitoring);
    assert_eq!(effects.len(), 2);
    assert_eq!(effects[0], Effect::StartPolling { job_id: 1 });
    assert!(matches!(
        &effects[1],
        Effect::RequestInsight { status: JobStatus::DownMonitoring, .. }
    ));

    let (state, _) = update(
        state,
        Msg::InsightReady {
            job_id: 1,
            status: JobStatus::DownMonitoring,
            insight: "Hang in there.".to_string(),
        },
    );
    assert_eq!(
        state.app_message(),
        Some("https://down-site.test is being monitored. We'll notify a@b.com when it's back up.")
    );
    let panel = state.view().job_panel.unwrap();
    assert_eq!(
        panel.notify_line.as_deref(),
        Some("Notifications will be sent to: a@b.com")
    );
}

#[test]
fn probe_failure_moves_to_error_without_insight_request() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://flaky.test", "a@b.com");
    let (state, effects) = update(
        state,
        Msg::ProbeCompleted {
            job_id: 1,
            result: Err("connection refused".to_string()),
        },
    );

    let job = state.job().unwrap();
    assert_eq!(job.status, JobStatus::ErrorState);
    assert_eq!(job.insight.as_deref(), Some(ERROR_INSIGHT));
    assert_eq!(job.message, "Error checking https://flaky.test. Please try again.");
    assert_eq!(state.phase(), AppPhase::Error);
    assert!(state.is_settled());
    assert_eq!(effects, vec![Effect::CancelPolling]);
    assert!(!state.view().is_loading);
}

#[test]
fn stale_probe_result_is_discarded() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://first.test", "a@b.com");
    let (state, effects) = submit(state, "https://second.test", "a@b.com");
    assert_eq!(
        effects[1],
        Effect::RunProbe {
            job_id: 2,
            url: "https://second.test".to_string(),
        }
    );

    let before = state.clone();
    let (mut state, effects) = update(
        state,
        Msg::ProbeCompleted {
            job_id: 1,
            result: Ok(ProbeOutcome::Down),
        },
    );
    assert!(effects.is_empty());
    assert_eq!(state.job(), before.job());
    assert_eq!(state.phase(), AppPhase::Processing);
    // Dirty flag is left over from the second submission only.
    assert!(state.consume_dirty());
    let (mut state, _) = update(
        state,
        Msg::ProbeCompleted {
            job_id: 1,
            result: Ok(ProbeOutcome::Up),
        },
    );
    assert!(!state.consume_dirty());
}

#[test]
fn duplicate_probe_result_does_not_rewind() {
    init_logging();
    let (state, _) = submit(AppState::new(), "https://a.test", "a@b.com");
    let done = Msg::ProbeCompleted {
        job_id: 1,
        result: Ok(ProbeOutcome::Up),
    };
    let (state, _) = update(state, done.clone());
    let (state, effects) = update(state, done);
    assert!(effects.is_empty());
    assert_eq!(state.job().unwrap().status, JobStatus::InitiallyUp);
}
