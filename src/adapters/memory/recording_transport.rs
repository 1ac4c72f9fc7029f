//! Transport that records outbound messages instead of delivering them.

use async_trait::async_trait;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::UserId;
use crate::ports::{MessageTransport, TextFormat, TransportError};

/// One recorded outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentMessage {
    pub user_id: UserId,
    pub text: String,
    pub format: TextFormat,
}

#[derive(Debug, Clone, Default)]
pub struct RecordingTransport {
    sent: Arc<RwLock<Vec<SentMessage>>>,
    typing: Arc<AtomicUsize>,
    fail_sends: Arc<AtomicBool>,
}

impl RecordingTransport {
    pub fn new() -> Self {
        Self::default()
    }

    /// Makes every following `send_text` fail with a network error.
    pub fn set_fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    pub async fn sent(&self) -> Vec<SentMessage> {
        self.sent.read().await.clone()
    }

    /// Texts sent to one user, in order.
    pub async fn texts_for(&self, user_id: &UserId) -> Vec<String> {
        self.sent
            .read()
            .await
            .iter()
            .filter(|m| &m.user_id == user_id)
            .map(|m| m.text.clone())
            .collect()
    }

    pub async fn last_text(&self) -> Option<String> {
        self.sent.read().await.last().map(|m| m.text.clone())
    }

    pub fn typing_count(&self) -> usize {
        self.typing.load(Ordering::SeqCst)
    }

    pub async fn clear(&self) {
        self.sent.write().await.clear();
    }
}

#[async_trait]
impl MessageTransport for RecordingTransport {
    async fn send_text(
        &self,
        user_id: &UserId,
        text: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(TransportError::Network("simulated send failure".to_string()));
        }
        self.sent.write().await.push(SentMessage {
            user_id: user_id.clone(),
            text: text.to_string(),
            format,
        });
        Ok(())
    }

    async fn send_typing(&self, _user_id: &UserId) -> Result<(), TransportError> {
        self.typing.fetch_add(1, Ordering::SeqCst);
        Ok(())
    }
}
