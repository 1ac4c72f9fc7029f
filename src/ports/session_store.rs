//! Session Store Port - Per-user transient conversation state.
//!
//! Sessions are cheap and ephemeral. Losing them on restart is acceptable:
//! the user re-enters the survey and the existing response is resumed.

use async_trait::async_trait;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::UserId;

/// Errors from session storage.
#[derive(Debug, thiserror::Error)]
pub enum SessionStoreError {
    #[error("Failed to serialize session: {0}")]
    SerializationFailed(String),

    #[error("Failed to deserialize session: {0}")]
    DeserializationFailed(String),

    #[error("Session backend error: {0}")]
    Backend(String),
}

/// Port for loading and saving conversation sessions.
#[async_trait]
pub trait SessionStore: Send + Sync {
    /// Load the session. An absent session is `Idle`.
    async fn get(&self, user_id: &UserId) -> Result<ConversationSession, SessionStoreError>;

    /// Replace the session.
    async fn put(
        &self,
        user_id: &UserId,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError>;

    /// Drop the session, returning the user to `Idle`.
    async fn clear(&self, user_id: &UserId) -> Result<(), SessionStoreError>;
}
