//! AI Responder Port - Interface for the generative-AI free-chat responder.
//!
//! The responder is a black box: it receives the user's text plus a small
//! context bundle and returns reply text with a confidence score. Callers
//! treat every failure as recoverable and substitute a fallback reply.
//!
//! # Example
//!
//! ```ignore
//! use async_trait::async_trait;
//!
//! struct EchoResponder;
//!
//! #[async_trait]
//! impl AiResponder for EchoResponder {
//!     async fn respond(&self, text: &str, _user: &UserId, _ctx: &AiContext) -> Result<AiReply, AIError> {
//!         Ok(AiReply::new(text, 0.7, "echo"))
//!     }
//!
//!     fn model_name(&self) -> &str {
//!         "echo"
//!     }
//! }
//! ```

use async_trait::async_trait;

use crate::domain::chat::JobPosting;
use crate::domain::foundation::UserId;

/// Port for generating free-chat replies.
#[async_trait]
pub trait AiResponder: Send + Sync {
    /// Generate a reply to `text` for `user_id`.
    async fn respond(
        &self,
        text: &str,
        user_id: &UserId,
        context: &AiContext,
    ) -> Result<AiReply, AIError>;

    /// Model identifier recorded alongside replies, including failed ones.
    fn model_name(&self) -> &str;
}

/// Context bundle passed with each request.
#[derive(Debug, Clone, Default)]
pub struct AiContext {
    /// Recently published jobs, newest first.
    pub available_jobs: Vec<JobPosting>,
}

impl AiContext {
    pub fn with_jobs(available_jobs: Vec<JobPosting>) -> Self {
        Self { available_jobs }
    }
}

/// A generated reply.
#[derive(Debug, Clone, PartialEq)]
pub struct AiReply {
    pub text: String,
    /// 0.0 to 1.0.
    pub confidence_score: f32,
    pub model: String,
    /// Set when the text is a provider-side apology rather than an answer.
    pub is_error: bool,
}

impl AiReply {
    pub fn new(text: impl Into<String>, confidence_score: f32, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence_score,
            model: model.into(),
            is_error: false,
        }
    }

    /// A reply standing in for a failed generation.
    pub fn failed(text: impl Into<String>, model: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            confidence_score: 0.0,
            model: model.into(),
            is_error: true,
        }
    }
}

/// AI responder errors.
#[derive(Debug, thiserror::Error)]
pub enum AIError {
    /// Rate limited by provider.
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds until retry is allowed.
        retry_after_secs: u32,
    },

    /// Prompt or output was blocked by the provider's safety filter.
    #[error("content filtered: {reason}")]
    ContentFiltered {
        /// Reason for filtering.
        reason: String,
    },

    /// Provider is unavailable.
    #[error("provider unavailable: {message}")]
    Unavailable {
        /// Error details.
        message: String,
    },

    /// API key missing or rejected.
    #[error("authentication failed")]
    AuthenticationFailed,

    /// Network error during request.
    #[error("network error: {0}")]
    Network(String),

    /// Failed to parse provider response.
    #[error("parse error: {0}")]
    Parse(String),

    /// Invalid request configuration.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// Request timed out.
    #[error("request timed out after {timeout_secs}s")]
    Timeout {
        /// Configured timeout.
        timeout_secs: u32,
    },
}

impl AIError {
    pub fn rate_limited(retry_after_secs: u32) -> Self {
        Self::RateLimited { retry_after_secs }
    }

    pub fn content_filtered(reason: impl Into<String>) -> Self {
        Self::ContentFiltered {
            reason: reason.into(),
        }
    }

    pub fn unavailable(message: impl Into<String>) -> Self {
        Self::Unavailable {
            message: message.into(),
        }
    }

    pub fn network(message: impl Into<String>) -> Self {
        Self::Network(message.into())
    }

    pub fn parse(message: impl Into<String>) -> Self {
        Self::Parse(message.into())
    }

    /// Returns true if this error is retryable.
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            AIError::RateLimited { .. }
                | AIError::Unavailable { .. }
                | AIError::Network(_)
                | AIError::Timeout { .. }
        )
    }
}
