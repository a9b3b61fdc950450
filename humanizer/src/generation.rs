//! Client for the external text-generation service.
//!
//! Wraps a single Ollama-style `/api/generate` call. Every failure mode —
//! transport error, timeout, non-success status, payload without a result —
//! collapses into [`GenerationError`], so the caller sees one uniform failure
//! signal and decides retry policy itself. No retry happens here.

use std::time::Duration;

use reqwest::{Client, StatusCode};
use serde::{Deserialize, Serialize};
use thiserror::Error;
use tracing::{error, info};

/// Bounded wait for a single generation request.
const GENERATION_TIMEOUT: Duration = Duration::from_secs(120);

/// Uniform failure signal for a generation attempt.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// Network failure, connect error, or request timeout.
    #[error("generation request failed: {0}")]
    Transport(#[from] reqwest::Error),

    /// The service answered with a non-success status code.
    #[error("generation service returned status {0}")]
    Status(StatusCode),

    /// The service answered 2xx but the payload carried no result field.
    #[error("generation response missing the result field")]
    MissingResponse,
}

/// Request body for the generation endpoint.
#[derive(Debug, Serialize)]
struct GenerateRequest<'a> {
    model: &'a str,
    stream: bool,
    prompt: String,
}

/// Response body from the generation endpoint.
#[derive(Debug, Deserialize)]
struct GenerateResponse {
    #[serde(default)]
    response: Option<String>,
}

/// Client for the generation service, sharing one HTTP connection pool.
#[derive(Clone)]
pub struct GenerationClient {
    http: Client,
    url: String,
    model: String,
}

impl GenerationClient {
    /// Create a client targeting `http://{hostname}/api/generate`.
    pub fn new(http: Client, hostname: &str, model: &str) -> Self {
        Self {
            http,
            url: format!("http://{hostname}/api/generate"),
            model: model.to_string(),
        }
    }

    /// Rewrite `text` into a human-friendly notification using `prompt`.
    pub async fn generate(&self, text: &str, prompt: &str) -> Result<String, GenerationError> {
        let payload = GenerateRequest {
            model: &self.model,
            stream: false,
            prompt: build_prompt(prompt, text),
        };

        info!(
            model = %self.model,
            text_length = text.len(),
            timeout_seconds = GENERATION_TIMEOUT.as_secs(),
            "generation_request_starting"
        );

        let response = match self
            .http
            .post(&self.url)
            .timeout(GENERATION_TIMEOUT)
            .json(&payload)
            .send()
            .await
        {
            Ok(resp) => resp,
            Err(e) => {
                if e.is_timeout() {
                    error!(
                        timeout_seconds = GENERATION_TIMEOUT.as_secs(),
                        error = %e,
                        "generation_request_timeout"
                    );
                } else {
                    error!(error = %e, "generation_request_error");
                }
                return Err(GenerationError::Transport(e));
            }
        };

        let status = response.status();
        if !status.is_success() {
            error!(status_code = status.as_u16(), "generation_request_rejected");
            return Err(GenerationError::Status(status));
        }

        let body: GenerateResponse = response.json().await?;
        let humanized = body.response.ok_or(GenerationError::MissingResponse)?;

        info!(
            model = %self.model,
            humanized_length = humanized.len(),
            "generation_request_complete"
        );

        Ok(humanized)
    }
}

/// Concatenate the prompt template and alert text into one generation prompt.
fn build_prompt(prompt: &str, text: &str) -> String {
    format!("{prompt} {text}")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_prompt_concatenation() {
        assert_eq!(
            build_prompt("Rewrite this error:", "disk full on [prod-1]"),
            "Rewrite this error: disk full on [prod-1]"
        );
    }

    #[test]
    fn test_generate_request_serialization() {
        let request = GenerateRequest {
            model: "llama3.2:3b",
            stream: false,
            prompt: "prompt text".to_string(),
        };

        let json = serde_json::to_value(&request).unwrap();
        assert_eq!(json["model"], "llama3.2:3b");
        assert_eq!(json["stream"], false);
        assert_eq!(json["prompt"], "prompt text");
    }

    #[test]
    fn test_generate_response_parsing() {
        let body: GenerateResponse =
            serde_json::from_str(r#"{"response": "Alert: prod-1 unstable..."}"#).unwrap();
        assert_eq!(body.response.as_deref(), Some("Alert: prod-1 unstable..."));
    }

    #[test]
    fn test_generate_response_missing_field() {
        let body: GenerateResponse = serde_json::from_str(r#"{"done": true}"#).unwrap();
        assert!(body.response.is_none());
    }
}
