//! Message Transport Port - Outbound delivery to chat users.

use async_trait::async_trait;

use crate::domain::foundation::UserId;

/// How the transport should interpret outbound text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum TextFormat {
    #[default]
    Plain,
    Html,
}

/// Port for sending messages back to a user.
///
/// Delivery is at-least-once at the transport's discretion. Callers split
/// text longer than the transport limit before calling `send_text`.
#[async_trait]
pub trait MessageTransport: Send + Sync {
    /// Send one text message.
    async fn send_text(
        &self,
        user_id: &UserId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError>;

    /// Show a "typing" indicator.
    async fn send_typing(&self, user_id: &UserId) -> Result<(), TransportError>;
}

/// Transport errors.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    #[error("rate limited: retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u32 },

    #[error("chat {0} not reachable")]
    ChatNotFound(String),

    #[error("bot token rejected")]
    Unauthorized,

    #[error("network error: {0}")]
    Network(String),

    #[error("transport rejected request: {0}")]
    Rejected(String),

    #[error("parse error: {0}")]
    Parse(String),
}

impl TransportError {
    pub fn is_retryable(&self) -> bool {
        matches!(
            self,
            TransportError::RateLimited { .. } | TransportError::Network(_)
        )
    }
}
