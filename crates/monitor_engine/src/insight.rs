use std::sync::Arc;
use std::time::Duration;

use monitor_logging::{monitor_info, monitor_warn};

use crate::{GeminiClient, InsightError, InsightSettings, TextGenerator};

pub const INVALID_KEY_FALLBACK: &str =
    "Gemini API key is not valid. Please check your configuration.";
pub const GENERIC_FALLBACK: &str = "An error occurred while fetching insights from Gemini.";

const MOCK_PROMPT_PREFIX_CHARS: usize = 50;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InsightMode {
    Real,
    Mock,
    /// No provider at all; callers attach a placeholder instead.
    Disabled,
}

/// Text generation that never fails: real calls fall back to fixed strings,
/// and mock mode answers with a placeholder built from the prompt.
#[derive(Clone)]
pub enum InsightProvider {
    Real(RealProvider),
    Mock(MockProvider),
}

impl InsightProvider {
    /// Real provider when a credential is configured, mock otherwise.
    pub fn from_settings(settings: &InsightSettings) -> Self {
        let Some(key) = settings.api_key.as_deref().filter(|_| settings.has_credential()) else {
            monitor_warn!("No insight credential configured; using mock insights.");
            return Self::Mock(MockProvider::new(settings.mock_delay));
        };

        match GeminiClient::new(settings, key) {
            Ok(client) => Self::Real(RealProvider::new(Arc::new(client), settings.model.clone())),
            Err(err) => {
                monitor_warn!("Failed to initialize Gemini client: {}; using mock insights.", err);
                Self::Mock(MockProvider::new(settings.mock_delay))
            }
        }
    }

    pub fn mode(&self) -> InsightMode {
        match self {
            Self::Real(_) => InsightMode::Real,
            Self::Mock(_) => InsightMode::Mock,
        }
    }

    pub async fn generate(&self, prompt: &str) -> String {
        match self {
            Self::Real(provider) => provider.generate(prompt).await,
            Self::Mock(provider) => provider.generate(prompt).await,
        }
    }
}

#[derive(Clone)]
pub struct RealProvider {
    generator: Arc<dyn TextGenerator>,
    model: String,
}

impl RealProvider {
    pub fn new(generator: Arc<dyn TextGenerator>, model: impl Into<String>) -> Self {
        Self {
            generator,
            model: model.into(),
        }
    }

    pub async fn generate(&self, prompt: &str) -> String {
        match self.generator.generate_content(&self.model, prompt).await {
            Ok(text) => text,
            Err(err) => {
                monitor_warn!("Insight generation failed: {}", err);
                fallback_for(&err).to_string()
            }
        }
    }
}

fn fallback_for(err: &InsightError) -> &'static str {
    match err {
        InsightError::InvalidCredential(_) => INVALID_KEY_FALLBACK,
        InsightError::Network(_) | InsightError::Api { .. } | InsightError::MalformedResponse(_) => {
            GENERIC_FALLBACK
        }
    }
}

#[derive(Debug, Clone)]
pub struct MockProvider {
    delay: Duration,
}

impl MockProvider {
    pub fn new(delay: Duration) -> Self {
        Self { delay }
    }

    pub async fn generate(&self, prompt: &str) -> String {
        tokio::time::sleep(self.delay).await;
        monitor_info!("Returning mock insight");
        mock_insight(prompt)
    }
}

fn mock_insight(prompt: &str) -> String {
    let prefix: String = prompt.chars().take(MOCK_PROMPT_PREFIX_CHARS).collect();
    format!(
        "(Mock Insight) Considering \"{prefix}...\", this suggests an interesting scenario. Further analysis would provide deeper understanding."
    )
}

#[cfg(test)]
mod tests {
    use super::{fallback_for, mock_insight, GENERIC_FALLBACK, INVALID_KEY_FALLBACK};
    use crate::InsightError;

    #[test]
    fn mock_insight_echoes_first_fifty_chars() {
        let prompt = "The website https://down-site.test was just checked and it seems to be down.";
        let insight = mock_insight(prompt);
        assert!(insight.starts_with("(Mock Insight) Considering \""));
        assert!(insight.contains(&prompt[..50]));
        assert!(!insight.contains(&prompt[..51]));
    }

    #[test]
    fn mock_insight_counts_chars_not_bytes() {
        let prompt = "é".repeat(60);
        let insight = mock_insight(&prompt);
        assert!(insight.contains(&format!("\"{}...\"", "é".repeat(50))));
    }

    #[test]
    fn only_rejected_keys_get_the_credential_message() {
        assert_eq!(
            fallback_for(&InsightError::InvalidCredential("bad".into())),
            INVALID_KEY_FALLBACK
        );
        assert_eq!(
            fallback_for(&InsightError::Network("reset".into())),
            GENERIC_FALLBACK
        );
        assert_eq!(
            fallback_for(&InsightError::MalformedResponse("no text".into())),
            GENERIC_FALLBACK
        );
    }
}
