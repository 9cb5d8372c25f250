//! User-facing text and insight prompt templates.

use crate::JobStatus;

pub const PROCESSING_MESSAGE: &str = "Validating inputs and checking website status...";
pub const CHECKING_MESSAGE: &str = "Checking website status...";
pub const VALIDATION_MESSAGE: &str = "Invalid URL or Email. Please check your input.";
pub const ERROR_INSIGHT: &str = "Error occurred before insights could be fetched.";
pub const INSIGHT_UNAVAILABLE: &str = "Gemini insights are unavailable (API key might be missing).";
pub const INSIGHTS_LIMITED_NOTICE: &str = "Gemini API key not detected. Insights will be limited.";

pub(crate) fn up_message(url: &str) -> String {
    format!("Good news! {url} is currently UP.")
}

pub(crate) fn down_message(url: &str) -> String {
    format!("{url} appears to be DOWN. We will start monitoring it.")
}

pub(crate) fn error_message(url: &str) -> String {
    format!("Error checking {url}. Please try again.")
}

pub(crate) fn monitoring_message(url: &str, email: &str) -> String {
    format!("{url} is being monitored. We'll notify {email} when it's back up.")
}

pub(crate) fn recovered_message(url: &str, email: &str) -> String {
    format!("{url} is back UP! A notification would be sent to {email}.")
}

pub(crate) fn still_down_message(url: &str, checked_at: &str) -> String {
    format!("{url} is still down. Continuing to monitor... (Last check: {checked_at})")
}

pub(crate) fn fetching_insights(message: &str) -> String {
    format!("{message} Fetching insights...")
}

/// Prompt sent to the insight provider for a job in `status`.
///
/// Only `InitiallyUp`, `DownMonitoring` and `Recovered` have templates.
pub fn insight_prompt(status: JobStatus, url: &str) -> Option<String> {
    match status {
        JobStatus::InitiallyUp => Some(format!(
            "The website {url} was just checked and it's online. Briefly describe what type of website this might be based on its URL, in a friendly tone."
        )),
        JobStatus::DownMonitoring => Some(format!(
            "The website {url} was just checked and it seems to be down. Offer a brief, reassuring, and slightly empathetic comment about this situation."
        )),
        JobStatus::Recovered => Some(format!(
            "The website {url}, which was previously down, is now back online. Provide a brief, positive remark about its recovery."
        )),
        JobStatus::InitialCheck | JobStatus::ErrorState => None,
    }
}

#[cfg(test)]
mod tests {
    use super::{insight_prompt, still_down_message};
    use crate::JobStatus;

    #[test]
    fn prompts_embed_url() {
        let prompt = insight_prompt(JobStatus::Recovered, "https://a.test").unwrap();
        assert!(prompt.starts_with("The website https://a.test, which was previously down"));
    }

    #[test]
    fn no_prompt_for_non_insight_statuses() {
        assert_eq!(insight_prompt(JobStatus::InitialCheck, "x"), None);
        assert_eq!(insight_prompt(JobStatus::ErrorState, "x"), None);
    }

    #[test]
    fn still_down_carries_timestamp() {
        assert_eq!(
            still_down_message("https://a.test", "12:00:01"),
            "https://a.test is still down. Continuing to monitor... (Last check: 12:00:01)"
        );
    }
}
