//! Telegram Bot API configuration

use secrecy::{ExposeSecret, Secret};
use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Telegram Bot API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TelegramConfig {
    /// Bot token issued by BotFather
    pub bot_token: Secret<String>,

    /// Bot API base URL
    #[serde(default = "default_api_base_url")]
    pub api_base_url: String,

    /// Long-poll wait for `getUpdates` in seconds
    #[serde(default = "default_poll_timeout")]
    pub poll_timeout_secs: u64,

    /// Timeout for regular API calls in seconds
    #[serde(default = "default_request_timeout")]
    pub request_timeout_secs: u64,

    /// Retries of a send after a rate limit
    #[serde(default = "default_max_send_retries")]
    pub max_send_retries: u32,
}

impl TelegramConfig {
    /// Get request timeout as Duration
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }

    /// Validate Telegram configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.bot_token.expose_secret().trim().is_empty() {
            return Err(ValidationError::MissingRequired("TELEGRAM__BOT_TOKEN"));
        }
        if !self.api_base_url.starts_with("https://") && !self.api_base_url.starts_with("http://")
        {
            return Err(ValidationError::InvalidApiBaseUrl("telegram"));
        }
        if self.poll_timeout_secs == 0 || self.poll_timeout_secs > 50 {
            return Err(ValidationError::InvalidPollTimeout);
        }
        if self.request_timeout_secs == 0 || self.request_timeout_secs > 300 {
            return Err(ValidationError::InvalidTimeout);
        }
        Ok(())
    }
}

impl Default for TelegramConfig {
    fn default() -> Self {
        Self {
            bot_token: Secret::new(String::new()),
            api_base_url: default_api_base_url(),
            poll_timeout_secs: default_poll_timeout(),
            request_timeout_secs: default_request_timeout(),
            max_send_retries: default_max_send_retries(),
        }
    }
}

fn default_api_base_url() -> String {
    "https://api.telegram.org".to_string()
}

fn default_poll_timeout() -> u64 {
    30
}

fn default_request_timeout() -> u64 {
    15
}

fn default_max_send_retries() -> u32 {
    1
}
