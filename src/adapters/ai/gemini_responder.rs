//! Gemini Responder - Implementation of AiResponder for Google's Gemini API.
//!
//! # Configuration
//!
//! ```ignore
//! let config = GeminiConfig::new(api_key)
//!     .with_model("gemini-2.5-flash")
//!     .with_max_retries(2);
//!
//! let responder = GeminiResponder::new(config)?;
//! ```
//!
//! # Prompt
//!
//! Each request is a single-turn prompt: the recruiter-assistant system
//! prompt, a short block of currently published jobs, then the user's text.

use async_trait::async_trait;
use reqwest::{Client, Response};
use secrecy::{ExposeSecret, Secret};
use serde::{Deserialize, Serialize};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::chat::JobPosting;
use crate::domain::foundation::UserId;
use crate::ports::{AIError, AiContext, AiReply, AiResponder};

/// Default model.
pub const DEFAULT_GEMINI_MODEL: &str = "gemini-2.5-flash";

/// Default API base URL.
pub const DEFAULT_GEMINI_BASE_URL: &str = "https://generativelanguage.googleapis.com/v1beta";

/// Jobs included in the prompt.
const PROMPT_JOB_LIMIT: usize = 3;

const SYSTEM_PROMPT: &str = "You are the virtual assistant of a recruitment platform. \
You help candidates find job offers, prepare for interviews, improve their CV and \
understand hiring processes. Answer in a friendly, professional tone. Keep replies \
short and practical, and suggest the /jobs command when the user is looking for \
openings. Never invent job offers that are not listed below.";

/// Configuration for the Gemini responder.
#[derive(Debug, Clone)]
pub struct GeminiConfig {
    /// API key for authentication.
    api_key: Secret<String>,
    /// Model to use (e.g., "gemini-2.5-flash").
    pub model: String,
    /// Base URL for the API.
    pub base_url: String,
    /// Request timeout.
    pub timeout: Duration,
    /// Maximum retries on transient failures.
    pub max_retries: u32,
}

impl GeminiConfig {
    /// Creates a new configuration with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            api_key: Secret::new(api_key.into()),
            model: DEFAULT_GEMINI_MODEL.to_string(),
            base_url: DEFAULT_GEMINI_BASE_URL.to_string(),
            timeout: Duration::from_secs(30),
            max_retries: 2,
        }
    }

    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    fn api_key(&self) -> &str {
        self.api_key.expose_secret()
    }
}

/// Gemini API responder.
pub struct GeminiResponder {
    config: GeminiConfig,
    client: Client,
}

impl GeminiResponder {
    /// Creates a responder; fails only if the HTTP client cannot be built.
    pub fn new(config: GeminiConfig) -> Result<Self, AIError> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| AIError::InvalidRequest(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn generate_url(&self) -> String {
        format!(
            "{}/models/{}:generateContent",
            self.config.base_url.trim_end_matches('/'),
            self.config.model
        )
    }

    async fn send_request(&self, prompt: &str) -> Result<Response, AIError> {
        let body = GenerateRequest {
            contents: vec![Content {
                role: Some("user".to_string()),
                parts: vec![Part {
                    text: Some(prompt.to_string()),
                }],
            }],
        };

        self.client
            .post(self.generate_url())
            .header("x-goog-api-key", self.config.api_key())
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await
            .map_err(|e| {
                if e.is_timeout() {
                    AIError::Timeout {
                        timeout_secs: self.config.timeout.as_secs() as u32,
                    }
                } else if e.is_connect() {
                    AIError::network(format!("Connection failed: {}", e))
                } else {
                    AIError::network(e.to_string())
                }
            })
    }

    async fn handle_response_status(&self, response: Response) -> Result<Response, AIError> {
        let status = response.status();
        if status.is_success() {
            return Ok(response);
        }

        let error_body = response.text().await.unwrap_or_default();

        match status.as_u16() {
            401 | 403 => Err(AIError::AuthenticationFailed),
            429 => Err(AIError::rate_limited(parse_retry_delay(&error_body))),
            400 => Err(AIError::InvalidRequest(error_body)),
            500..=599 => Err(AIError::unavailable(format!(
                "Server error {}: {}",
                status, error_body
            ))),
            _ => Err(AIError::network(format!(
                "Unexpected status {}: {}",
                status, error_body
            ))),
        }
    }

    async fn parse_response(&self, response: Response) -> Result<AiReply, AIError> {
        let response = self.handle_response_status(response).await?;

        let body: GenerateResponse = response
            .json()
            .await
            .map_err(|e| AIError::parse(format!("Failed to parse response: {}", e)))?;

        reply_from_response(body, &self.config.model)
    }

    async fn generate_once(&self, prompt: &str) -> Result<AiReply, AIError> {
        let response = self.send_request(prompt).await?;
        self.parse_response(response).await
    }
}

#[async_trait]
impl AiResponder for GeminiResponder {
    async fn respond(
        &self,
        text: &str,
        user_id: &UserId,
        context: &AiContext,
    ) -> Result<AiReply, AIError> {
        let prompt = build_prompt(text, &context.available_jobs);
        let mut retry_count = 0;

        loop {
            match self.generate_once(&prompt).await {
                Ok(reply) => return Ok(reply),
                Err(err) => {
                    if !err.is_retryable() || retry_count >= self.config.max_retries {
                        return Err(err);
                    }
                    tracing::warn!(
                        user_id = %user_id,
                        attempt = retry_count + 1,
                        error = %err,
                        "Gemini request failed, retrying"
                    );
                }
            }

            // Exponential backoff: 1s, 2s, 4s, ...
            sleep(Duration::from_secs(1 << retry_count)).await;
            retry_count += 1;
        }
    }

    fn model_name(&self) -> &str {
        &self.config.model
    }
}

/// Assembles the single-turn prompt sent to the model.
pub fn build_prompt(text: &str, jobs: &[JobPosting]) -> String {
    let mut prompt = String::from(SYSTEM_PROMPT);
    prompt.push_str("\n\n--- CONVERSATION ---\n");

    if !jobs.is_empty() {
        prompt.push_str("\n--- AVAILABLE JOBS ---\n");
        for job in jobs.iter().take(PROMPT_JOB_LIMIT) {
            prompt.push_str(&job.summary_line());
            prompt.push('\n');
        }
    }

    prompt.push_str("\nUser: ");
    prompt.push_str(text);
    prompt.push_str("\nAssistant:");
    prompt
}

/// Heuristic confidence for a generated reply.
pub fn confidence_for(text: &str, blocked: bool) -> f32 {
    if blocked {
        return 0.3;
    }
    let len = text.chars().count();
    if len > 50 {
        (len as f32 / 500.0).min(0.95)
    } else {
        0.7
    }
}

fn reply_from_response(body: GenerateResponse, model: &str) -> Result<AiReply, AIError> {
    let block_reason = body.prompt_feedback.and_then(|f| f.block_reason);

    let candidate = match body.candidates.into_iter().next() {
        Some(candidate) => candidate,
        None => {
            return Err(match block_reason {
                Some(reason) => AIError::content_filtered(reason),
                None => AIError::parse("No candidates in response"),
            })
        }
    };

    let text: String = candidate
        .content
        .map(|c| c.parts.into_iter().filter_map(|p| p.text).collect())
        .unwrap_or_default();

    let confidence = confidence_for(&text, block_reason.is_some());
    Ok(AiReply::new(text.trim(), confidence, model))
}

/// Reads `retryDelay` ("17s") from a Gemini 429 body. Defaults to 30 seconds.
fn parse_retry_delay(error_body: &str) -> u32 {
    let parsed: serde_json::Value = match serde_json::from_str(error_body) {
        Ok(value) => value,
        Err(_) => return 30,
    };

    parsed
        .get("error")
        .and_then(|e| e.get("details"))
        .and_then(|d| d.as_array())
        .and_then(|details| {
            details
                .iter()
                .filter_map(|d| d.get("retryDelay").and_then(|r| r.as_str()))
                .find_map(|r| r.trim_end_matches('s').parse::<f64>().ok())
        })
        .map(|secs| secs.ceil() as u32)
        .unwrap_or(30)
}

// ════════════════════════════════════════════════════════════════════════════════
// Gemini API Types
// ════════════════════════════════════════════════════════════════════════════════

#[derive(Debug, Serialize)]
struct GenerateRequest {
    contents: Vec<Content>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Content {
    #[serde(skip_serializing_if = "Option::is_none")]
    role: Option<String>,
    #[serde(default)]
    parts: Vec<Part>,
}

#[derive(Debug, Serialize, Deserialize)]
struct Part {
    #[serde(skip_serializing_if = "Option::is_none")]
    text: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct GenerateResponse {
    #[serde(default)]
    candidates: Vec<Candidate>,
    prompt_feedback: Option<PromptFeedback>,
}

#[derive(Debug, Deserialize)]
struct Candidate {
    content: Option<Content>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PromptFeedback {
    block_reason: Option<String>,
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{JobStatus, SalaryRange};
    use crate::domain::foundation::{JobId, Timestamp};

    fn job(title: &str) -> JobPosting {
        JobPosting {
            id: JobId::new(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            salary: SalaryRange {
                min: None,
                max: None,
                currency: "USD".to_string(),
            },
            status: JobStatus::Published,
            views_count: 0,
            created_at: Timestamp::now(),
        }
    }

    mod config {
        use super::*;

        #[test]
        fn defaults_target_flash_model() {
            let config = GeminiConfig::new("key");
            assert_eq!(config.model, DEFAULT_GEMINI_MODEL);
            assert_eq!(config.base_url, DEFAULT_GEMINI_BASE_URL);
            assert_eq!(config.max_retries, 2);
        }

        #[test]
        fn builder_overrides_fields() {
            let config = GeminiConfig::new("key")
                .with_model("gemini-pro")
                .with_base_url("http://localhost:9000")
                .with_timeout(Duration::from_secs(5))
                .with_max_retries(0);

            assert_eq!(config.model, "gemini-pro");
            assert_eq!(config.base_url, "http://localhost:9000");
            assert_eq!(config.timeout, Duration::from_secs(5));
            assert_eq!(config.max_retries, 0);
            assert_eq!(config.api_key(), "key");
        }

        #[test]
        fn debug_output_hides_api_key() {
            let rendered = format!("{:?}", GeminiConfig::new("super-secret"));
            assert!(!rendered.contains("super-secret"));
        }

        #[test]
        fn url_includes_model() {
            let responder =
                GeminiResponder::new(GeminiConfig::new("k").with_base_url("http://x/v1beta/"))
                    .unwrap();
            assert_eq!(
                responder.generate_url(),
                "http://x/v1beta/models/gemini-2.5-flash:generateContent"
            );
            assert_eq!(responder.model_name(), "gemini-2.5-flash");
        }
    }

    mod prompt {
        use super::*;

        #[test]
        fn ends_with_user_turn() {
            let prompt = build_prompt("Any remote jobs?", &[]);
            assert!(prompt.starts_with(SYSTEM_PROMPT));
            assert!(prompt.ends_with("\nUser: Any remote jobs?\nAssistant:"));
            assert!(!prompt.contains("AVAILABLE JOBS"));
        }

        #[test]
        fn lists_at_most_three_jobs() {
            let jobs = vec![job("A"), job("B"), job("C"), job("D")];
            let prompt = build_prompt("hi", &jobs);

            assert!(prompt.contains("--- AVAILABLE JOBS ---\n• A at Acme - Remote\n"));
            assert!(prompt.contains("• C at Acme - Remote"));
            assert!(!prompt.contains("• D at"));
        }
    }

    mod confidence {
        use super::*;

        #[test]
        fn blocked_is_low() {
            assert_eq!(confidence_for(&"x".repeat(400), true), 0.3);
        }

        #[test]
        fn short_text_is_fixed() {
            assert_eq!(confidence_for("Sure!", false), 0.7);
        }

        #[test]
        fn long_text_scales_and_caps() {
            assert!((confidence_for(&"x".repeat(250), false) - 0.5).abs() < f32::EPSILON);
            assert_eq!(confidence_for(&"x".repeat(2000), false), 0.95);
        }
    }

    mod response_parsing {
        use super::*;

        fn parse(json: &str) -> Result<AiReply, AIError> {
            let body: GenerateResponse = serde_json::from_str(json).unwrap();
            reply_from_response(body, "gemini-2.5-flash")
        }

        #[test]
        fn joins_candidate_parts() {
            let reply = parse(
                r#"{"candidates":[{"content":{"role":"model","parts":[{"text":"Hello "},{"text":"there"}]}}]}"#,
            )
            .unwrap();

            assert_eq!(reply.text, "Hello there");
            assert_eq!(reply.confidence_score, 0.7);
            assert_eq!(reply.model, "gemini-2.5-flash");
            assert!(!reply.is_error);
        }

        #[test]
        fn missing_candidates_is_parse_error() {
            assert!(matches!(parse(r#"{}"#), Err(AIError::Parse(_))));
        }

        #[test]
        fn blocked_prompt_without_candidates_is_filtered() {
            let result = parse(r#"{"promptFeedback":{"blockReason":"SAFETY"}}"#);
            assert!(matches!(result, Err(AIError::ContentFiltered { .. })));
        }

        #[test]
        fn blocked_prompt_with_text_gets_low_confidence() {
            let reply = parse(
                r#"{"candidates":[{"content":{"parts":[{"text":"Let's keep it professional."}]}}],
                    "promptFeedback":{"blockReason":"OTHER"}}"#,
            )
            .unwrap();
            assert_eq!(reply.confidence_score, 0.3);
        }

        #[test]
        fn candidate_without_content_yields_empty_text() {
            let reply = parse(r#"{"candidates":[{"finishReason":"MAX_TOKENS"}]}"#).unwrap();
            assert!(reply.text.is_empty());
        }
    }

    mod retry_delay {
        use super::*;

        #[test]
        fn reads_retry_info() {
            let body = r#"{"error":{"code":429,"details":[
                {"@type":"type.googleapis.com/google.rpc.QuotaFailure"},
                {"@type":"type.googleapis.com/google.rpc.RetryInfo","retryDelay":"17s"}]}}"#;
            assert_eq!(parse_retry_delay(body), 17);
        }

        #[test]
        fn defaults_when_unparseable() {
            assert_eq!(parse_retry_delay("quota exceeded"), 30);
            assert_eq!(parse_retry_delay(r#"{"error":{}}"#), 30);
        }
    }
}
