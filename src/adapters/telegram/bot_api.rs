//! Telegram Bot API client over plain HTTPS.
//!
//! Every Bot API method answers with the same envelope:
//! `{"ok": bool, "result": ..., "description": "...", "error_code": 429,
//! "parameters": {"retry_after": 5}}`. `call` unwraps it into a typed result
//! or a `TransportError`.

use async_trait::async_trait;
use reqwest::Client;
use secrecy::{ExposeSecret, Secret};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tokio::time::sleep;

use super::updates::Update;
use crate::domain::foundation::UserId;
use crate::ports::{MessageTransport, TextFormat, TransportError};

/// Default Bot API base URL.
pub const DEFAULT_API_BASE_URL: &str = "https://api.telegram.org";

/// Longest rate-limit pause honoured before giving up on a send.
const MAX_RETRY_AFTER_SECS: u32 = 60;

/// Configuration for the Bot API client.
#[derive(Debug, Clone)]
pub struct BotApiConfig {
    token: Secret<String>,
    pub api_base_url: String,
    pub request_timeout: Duration,
    /// Retries after a 429 on sends.
    pub max_send_retries: u32,
}

impl BotApiConfig {
    pub fn new(token: impl Into<String>) -> Self {
        Self {
            token: Secret::new(token.into()),
            api_base_url: DEFAULT_API_BASE_URL.to_string(),
            request_timeout: Duration::from_secs(15),
            max_send_retries: 1,
        }
    }

    pub fn with_api_base_url(mut self, url: impl Into<String>) -> Self {
        self.api_base_url = url.into();
        self
    }

    pub fn with_request_timeout(mut self, timeout: Duration) -> Self {
        self.request_timeout = timeout;
        self
    }

    pub fn with_max_send_retries(mut self, retries: u32) -> Self {
        self.max_send_retries = retries;
        self
    }
}

/// Bot API client; also the outbound `MessageTransport`.
#[derive(Clone)]
pub struct BotApiClient {
    config: BotApiConfig,
    client: Client,
}

impl BotApiClient {
    pub fn new(config: BotApiConfig) -> Result<Self, TransportError> {
        let client = Client::builder()
            .timeout(config.request_timeout)
            .build()
            .map_err(|e| TransportError::Network(format!("Failed to create HTTP client: {}", e)))?;

        Ok(Self { config, client })
    }

    fn method_url(&self, method: &str) -> String {
        format!(
            "{}/bot{}/{}",
            self.config.api_base_url.trim_end_matches('/'),
            self.config.token.expose_secret(),
            method
        )
    }

    async fn call<T: DeserializeOwned>(
        &self,
        method: &str,
        body: &serde_json::Value,
        timeout: Duration,
    ) -> Result<T, TransportError> {
        let response = self
            .client
            .post(self.method_url(method))
            .timeout(timeout)
            .json(body)
            .send()
            .await
            // reqwest errors carry the URL, and the URL carries the token
            .map_err(|e| TransportError::Network(e.without_url().to_string()))?;

        let envelope: ApiEnvelope<T> = response
            .json()
            .await
            .map_err(|e| TransportError::Parse(e.without_url().to_string()))?;

        envelope.into_result(body.get("chat_id"))
    }

    /// Long-polls `getUpdates`. The HTTP timeout is extended past the poll
    /// timeout so an empty poll is not reported as a failure.
    pub async fn get_updates(
        &self,
        offset: Option<i64>,
        poll_timeout_secs: u64,
    ) -> Result<Vec<Update>, TransportError> {
        let mut body = json!({
            "timeout": poll_timeout_secs,
            "allowed_updates": ["message"],
        });
        if let Some(offset) = offset {
            body["offset"] = json!(offset);
        }

        let timeout = self.config.request_timeout + Duration::from_secs(poll_timeout_secs);
        self.call("getUpdates", &body, timeout).await
    }

    async fn send_once(&self, body: &serde_json::Value) -> Result<(), TransportError> {
        let _: serde_json::Value = self
            .call("sendMessage", body, self.config.request_timeout)
            .await?;
        Ok(())
    }
}

impl std::fmt::Debug for BotApiClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("BotApiClient")
            .field("api_base_url", &self.config.api_base_url)
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl MessageTransport for BotApiClient {
    async fn send_text(
        &self,
        user_id: &UserId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        let body = send_message_body(user_id, text, format);
        let mut attempt = 0;

        loop {
            match self.send_once(&body).await {
                Err(TransportError::RateLimited { retry_after_secs })
                    if attempt < self.config.max_send_retries
                        && retry_after_secs <= MAX_RETRY_AFTER_SECS =>
                {
                    tracing::warn!(
                        user_id = %user_id,
                        retry_after_secs,
                        "Telegram rate limit hit, waiting before resend"
                    );
                    sleep(Duration::from_secs(u64::from(retry_after_secs))).await;
                    attempt += 1;
                }
                other => return other,
            }
        }
    }

    async fn send_typing(&self, user_id: &UserId) -> Result<(), TransportError> {
        let body = json!({ "chat_id": user_id.as_str(), "action": "typing" });
        let _: bool = self
            .call("sendChatAction", &body, self.config.request_timeout)
            .await?;
        Ok(())
    }
}

fn send_message_body(user_id: &UserId, text: &str, format: TextFormat) -> serde_json::Value {
    let mut body = json!({
        "chat_id": user_id.as_str(),
        "text": text,
    });
    if format == TextFormat::Html {
        body["parse_mode"] = json!("HTML");
    }
    body
}

#[derive(Debug, Deserialize)]
struct ApiEnvelope<T> {
    ok: bool,
    result: Option<T>,
    description: Option<String>,
    error_code: Option<u16>,
    parameters: Option<ResponseParameters>,
}

#[derive(Debug, Deserialize)]
struct ResponseParameters {
    retry_after: Option<u32>,
}

impl<T> ApiEnvelope<T> {
    fn into_result(self, chat_id: Option<&serde_json::Value>) -> Result<T, TransportError> {
        if self.ok {
            return self
                .result
                .ok_or_else(|| TransportError::Parse("ok response without result".to_string()));
        }

        let description = self.description.unwrap_or_default();
        match self.error_code {
            Some(401) => Err(TransportError::Unauthorized),
            Some(429) => Err(TransportError::RateLimited {
                retry_after_secs: self
                    .parameters
                    .and_then(|p| p.retry_after)
                    .unwrap_or(1),
            }),
            Some(400) | Some(403) if description.contains("chat not found") || description.contains("blocked") => {
                Err(TransportError::ChatNotFound(
                    chat_id.map(|c| c.to_string()).unwrap_or_default(),
                ))
            }
            Some(code) if code >= 500 => Err(TransportError::Network(format!(
                "Telegram error {}: {}",
                code, description
            ))),
            _ => Err(TransportError::Rejected(description)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn envelope(json: &str) -> ApiEnvelope<serde_json::Value> {
        serde_json::from_str(json).unwrap()
    }

    mod config {
        use super::*;

        #[test]
        fn method_url_embeds_token() {
            let client = BotApiClient::new(
                BotApiConfig::new("123:abc").with_api_base_url("http://localhost:8081/"),
            )
            .unwrap();
            assert_eq!(
                client.method_url("getUpdates"),
                "http://localhost:8081/bot123:abc/getUpdates"
            );
        }

        #[test]
        fn debug_output_hides_token() {
            let config = BotApiConfig::new("123:secret-token");
            assert!(!format!("{:?}", config).contains("secret-token"));
            let client = BotApiClient::new(config).unwrap();
            assert!(!format!("{:?}", client).contains("secret-token"));
        }
    }

    mod envelope {
        use super::*;

        #[test]
        fn ok_unwraps_result() {
            let result = envelope(r#"{"ok":true,"result":{"message_id":5}}"#)
                .into_result(None)
                .unwrap();
            assert_eq!(result["message_id"], 5);
        }

        #[test]
        fn rate_limit_reads_retry_after() {
            let err = envelope(
                r#"{"ok":false,"error_code":429,"description":"Too Many Requests: retry after 7","parameters":{"retry_after":7}}"#,
            )
            .into_result(None)
            .unwrap_err();
            assert!(matches!(err, TransportError::RateLimited { retry_after_secs: 7 }));
            assert!(err.is_retryable());
        }

        #[test]
        fn unauthorized_token() {
            let err = envelope(r#"{"ok":false,"error_code":401,"description":"Unauthorized"}"#)
                .into_result(None)
                .unwrap_err();
            assert!(matches!(err, TransportError::Unauthorized));
        }

        #[test]
        fn blocked_bot_is_chat_not_found() {
            let chat = json!("42");
            let err = envelope(
                r#"{"ok":false,"error_code":403,"description":"Forbidden: bot was blocked by the user"}"#,
            )
            .into_result(Some(&chat))
            .unwrap_err();
            assert!(matches!(err, TransportError::ChatNotFound(_)));
        }

        #[test]
        fn bad_markup_is_rejected() {
            let err = envelope(
                r#"{"ok":false,"error_code":400,"description":"Bad Request: can't parse entities"}"#,
            )
            .into_result(None)
            .unwrap_err();
            assert!(matches!(err, TransportError::Rejected(_)));
            assert!(!err.is_retryable());
        }
    }

    #[test]
    fn html_sets_parse_mode() {
        let user = UserId::from(42);
        let html = send_message_body(&user, "<b>hi</b>", TextFormat::Html);
        assert_eq!(html["parse_mode"], "HTML");
        assert_eq!(html["chat_id"], "42");

        let plain = send_message_body(&user, "hi", TextFormat::Plain);
        assert!(plain.get("parse_mode").is_none());
    }
}
