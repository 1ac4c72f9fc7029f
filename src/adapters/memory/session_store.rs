//! In-memory session store.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::conversation::ConversationSession;
use crate::domain::foundation::UserId;
use crate::ports::{SessionStore, SessionStoreError};

/// Concurrent map of sessions keyed by user. Idle sessions are not stored.
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionStore {
    sessions: Arc<RwLock<HashMap<UserId, ConversationSession>>>,
}

impl InMemorySessionStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Number of users with a non-idle session.
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionStore for InMemorySessionStore {
    async fn get(&self, user_id: &UserId) -> Result<ConversationSession, SessionStoreError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(user_id).cloned().unwrap_or_default())
    }

    async fn put(
        &self,
        user_id: &UserId,
        session: &ConversationSession,
    ) -> Result<(), SessionStoreError> {
        let mut sessions = self.sessions.write().await;
        if session.is_idle() {
            sessions.remove(user_id);
        } else {
            sessions.insert(user_id.clone(), session.clone());
        }
        Ok(())
    }

    async fn clear(&self, user_id: &UserId) -> Result<(), SessionStoreError> {
        self.sessions.write().await.remove(user_id);
        Ok(())
    }
}
