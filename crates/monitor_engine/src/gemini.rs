//! Minimal client for the Gemini `generateContent` REST endpoint.

use std::time::Instant;

use monitor_logging::{monitor_debug, monitor_warn};
use serde::{Deserialize, Serialize};

use crate::{InsightError, InsightSettings};

/// Marker the API puts in its error message when the key is rejected.
const INVALID_KEY_MARKER: &str = "API key not valid";

#[async_trait::async_trait]
pub trait TextGenerator: Send + Sync {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, InsightError>;
}

#[derive(Debug, Clone)]
pub struct GeminiClient {
    http_client: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl GeminiClient {
    pub fn new(settings: &InsightSettings, api_key: impl Into<String>) -> Result<Self, InsightError> {
        let http_client = reqwest::Client::builder()
            .timeout(settings.request_timeout)
            .build()
            .map_err(|err| InsightError::Network(err.to_string()))?;
        Ok(Self {
            http_client,
            api_key: api_key.into(),
            base_url: settings.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn endpoint(&self, model: &str) -> String {
        format!("{}/v1beta/models/{}:generateContent", self.base_url, model)
    }
}

#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    contents: Vec<Content<'a>>,
}

#[derive(Debug, Serialize)]
struct Content<'a> {
    parts: Vec<RequestPart<'a>>,
}

#[derive(Debug, Serialize)]
struct RequestPart<'a> {
    text: &'a str,
}

#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<CandidateContent>,
}

#[derive(Debug, Deserialize)]
struct CandidateContent {
    #[serde(default)]
    parts: Vec<ResponsePart>,
}

#[derive(Debug, Deserialize)]
struct ResponsePart {
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
struct ErrorEnvelope {
    error: ErrorBody,
}

#[derive(Debug, Deserialize)]
struct ErrorBody {
    #[serde(default)]
    message: String,
}

#[async_trait::async_trait]
impl TextGenerator for GeminiClient {
    async fn generate_content(&self, model: &str, prompt: &str) -> Result<String, InsightError> {
        let start = Instant::now();
        let request = GenerateRequest {
            contents: vec![Content {
                parts: vec![RequestPart { text: prompt }],
            }],
        };

        let response = self
            .http_client
            .post(self.endpoint(model))
            .header("x-goog-api-key", &self.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|err| {
                monitor_warn!("Gemini request failed: {}", err);
                InsightError::Network(err.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(map_error_body(status.as_u16(), &body));
        }

        let parsed: GenerateResponse = response
            .json()
            .await
            .map_err(|err| InsightError::MalformedResponse(err.to_string()))?;

        let text = extract_text(parsed)?;
        monitor_debug!(
            "Gemini generateContent model={} duration_ms={}",
            model,
            start.elapsed().as_millis()
        );
        Ok(text)
    }
}

fn extract_text(response: GenerateResponse) -> Result<String, InsightError> {
    let parts = response
        .candidates
        .into_iter()
        .next()
        .and_then(|candidate| candidate.content)
        .map(|content| content.parts)
        .ok_or_else(|| InsightError::MalformedResponse("no candidates".to_string()))?;

    let text: String = parts.into_iter().filter_map(|part| part.text).collect();
    if text.is_empty() {
        return Err(InsightError::MalformedResponse(
            "candidate has no text".to_string(),
        ));
    }
    Ok(text)
}

fn map_error_body(status: u16, body: &str) -> InsightError {
    let message = serde_json::from_str::<ErrorEnvelope>(body)
        .map(|envelope| envelope.error.message)
        .unwrap_or_else(|_| body.to_string());
    if message.contains(INVALID_KEY_MARKER) {
        InsightError::InvalidCredential(message)
    } else {
        InsightError::Api { status, message }
    }
}

#[cfg(test)]
mod tests {
    use super::{extract_text, map_error_body, GenerateResponse};
    use crate::InsightError;

    #[test]
    fn joins_text_parts_of_first_candidate() {
        let response: GenerateResponse = serde_json::from_str(
            r#"{"candidates":[{"content":{"parts":[{"text":"Hello, "},{"text":"world"}]}},
                {"content":{"parts":[{"text":"ignored"}]}}]}"#,
        )
        .unwrap();
        assert_eq!(extract_text(response).unwrap(), "Hello, world");
    }

    #[test]
    fn empty_candidates_are_malformed() {
        let response: GenerateResponse = serde_json::from_str("{}").unwrap();
        assert!(matches!(
            extract_text(response),
            Err(InsightError::MalformedResponse(_))
        ));
    }

    #[test]
    fn invalid_key_is_recognised_in_error_body() {
        let body = r#"{"error":{"code":400,"message":"API key not valid. Please pass a valid API key.","status":"INVALID_ARGUMENT"}}"#;
        assert!(matches!(
            map_error_body(400, body),
            InsightError::InvalidCredential(_)
        ));
        assert_eq!(
            map_error_body(503, "overloaded"),
            InsightError::Api {
                status: 503,
                message: "overloaded".to_string()
            }
        );
    }
}
