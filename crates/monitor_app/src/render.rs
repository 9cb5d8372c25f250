//! Plain-text rendering of the view model for the terminal front end.

use monitor_core::{AppPhase, AppViewModel, JobView, StatusTone, INSIGHTS_LIMITED_NOTICE};

pub fn render(view: &AppViewModel) -> Vec<String> {
    let mut lines = Vec::new();

    if view.insights_limited {
        lines.push(format!("[!] {INSIGHTS_LIMITED_NOTICE}"));
    }

    if let Some(progress) = &view.progress_text {
        lines.push(format!("[...] {progress}"));
    }

    if let Some(error) = &view.error_banner {
        lines.push(format!("[x] Error: {error}"));
    }

    if let Some(panel) = &view.job_panel {
        lines.extend(render_job(panel));
    }

    if view.phase == AppPhase::Monitoring {
        if let Some(message) = &view.app_message {
            lines.push(message.clone());
        }
    }

    lines.push(if view.submit_enabled {
        "Enter <url> <email> to check a website:".to_string()
    } else {
        "(busy, please wait)".to_string()
    });
    lines
}

fn render_job(panel: &JobView) -> Vec<String> {
    let mut lines = vec![format!(
        "{} Monitoring Status for: {}",
        tone_icon(panel.tone),
        panel.url
    )];
    if let Some(notify) = &panel.notify_line {
        lines.push(format!("    {notify}"));
    }
    lines.push(format!("    {}", panel.message));
    if let Some(insight) = &panel.insight {
        lines.push(format!("    Gemini Insights: {insight}"));
    }
    if let Some(notice) = &panel.notice {
        lines.push(format!("    {notice}"));
    }
    lines
}

fn tone_icon(tone: StatusTone) -> &'static str {
    match tone {
        StatusTone::Checking => "[~]",
        StatusTone::Online => "[ok]",
        StatusTone::Watching => "[..]",
        StatusTone::Notified => "[@]",
        StatusTone::Failed => "[x]",
    }
}

#[cfg(test)]
mod tests {
    use monitor_core::{AppPhase, AppViewModel, JobStatus, JobView, StatusTone};

    use super::render;

    fn recovered_panel() -> JobView {
        JobView {
            job_id: 1,
            url: "https://down.test".to_string(),
            status: JobStatus::Recovered,
            tone: StatusTone::Notified,
            message: "https://down.test is back UP!".to_string(),
            insight: Some("Welcome back.".to_string()),
            notify_line: None,
            notice: Some("Simulated email notification sent to a@b.com.".to_string()),
        }
    }

    #[test]
    fn idle_view_prompts_for_input() {
        let view = AppViewModel {
            submit_enabled: true,
            ..AppViewModel::default()
        };
        assert_eq!(render(&view), vec!["Enter <url> <email> to check a website:"]);
    }

    #[test]
    fn recovered_job_shows_insight_and_notice() {
        let view = AppViewModel {
            phase: AppPhase::Idle,
            submit_enabled: true,
            job_panel: Some(recovered_panel()),
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert_eq!(lines[0], "[@] Monitoring Status for: https://down.test");
        assert!(lines.contains(&"    Gemini Insights: Welcome back.".to_string()));
        assert!(lines.contains(&"    Simulated email notification sent to a@b.com.".to_string()));
    }

    #[test]
    fn error_and_limited_banners_come_first() {
        let view = AppViewModel {
            phase: AppPhase::Error,
            insights_limited: true,
            error_banner: Some("Invalid URL or Email. Please check your input.".to_string()),
            submit_enabled: true,
            ..AppViewModel::default()
        };
        let lines = render(&view);
        assert!(lines[0].contains("Insights will be limited"));
        assert_eq!(
            lines[1],
            "[x] Error: Invalid URL or Email. Please check your input."
        );
    }
}
