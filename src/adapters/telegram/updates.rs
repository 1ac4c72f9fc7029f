//! `getUpdates` payloads and the long-polling update stream.

use futures::stream::{self, Stream};
use serde::Deserialize;
use std::time::Duration;
use tokio::time::sleep;

use super::bot_api::BotApiClient;
use crate::domain::chat::{InboundText, UserProfile};
use crate::domain::foundation::UserId;

/// Pause after a failed poll before trying again.
const POLL_ERROR_BACKOFF: Duration = Duration::from_secs(3);

/// One entry of a `getUpdates` result.
#[derive(Debug, Clone, Deserialize)]
pub struct Update {
    pub update_id: i64,
    pub message: Option<TelegramMessage>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramMessage {
    pub message_id: i64,
    pub from: Option<TelegramUser>,
    pub text: Option<String>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct TelegramUser {
    pub id: i64,
    #[serde(default)]
    pub is_bot: bool,
    pub username: Option<String>,
    pub first_name: Option<String>,
    pub last_name: Option<String>,
}

impl Update {
    /// Text messages from humans become inbound texts; everything else is
    /// skipped.
    pub fn into_inbound(self) -> Option<InboundText> {
        let message = self.message?;
        let from = message.from.filter(|user| !user.is_bot)?;
        let text = message.text?;

        Some(InboundText {
            profile: UserProfile {
                user_id: UserId::from(from.id),
                username: from.username,
                first_name: from.first_name,
                last_name: from.last_name,
            },
            text,
            transport_message_id: Some(message.message_id),
        })
    }
}

/// Offset acknowledging every update in `batch`.
pub fn next_offset(current: Option<i64>, batch: &[Update]) -> Option<i64> {
    batch
        .iter()
        .map(|u| u.update_id + 1)
        .max()
        .max(current)
}

/// Long-polling consumer of `getUpdates`.
pub struct UpdatePoller {
    client: BotApiClient,
    poll_timeout_secs: u64,
    offset: Option<i64>,
}

impl UpdatePoller {
    pub fn new(client: BotApiClient, poll_timeout_secs: u64) -> Self {
        Self {
            client,
            poll_timeout_secs,
            offset: None,
        }
    }

    /// Fetches the next batch and advances the offset. Errors are logged and
    /// yield an empty batch after a short pause.
    pub async fn poll(&mut self) -> Vec<InboundText> {
        match self
            .client
            .get_updates(self.offset, self.poll_timeout_secs)
            .await
        {
            Ok(batch) => {
                self.offset = next_offset(self.offset, &batch);
                if !batch.is_empty() {
                    tracing::debug!(count = batch.len(), offset = ?self.offset, "Received updates");
                }
                batch.into_iter().filter_map(Update::into_inbound).collect()
            }
            Err(e) => {
                tracing::warn!(error = %e, "getUpdates failed");
                sleep(POLL_ERROR_BACKOFF).await;
                Vec::new()
            }
        }
    }

    /// Endless stream of inbound texts.
    pub fn into_stream(self) -> impl Stream<Item = InboundText> {
        use futures::StreamExt;

        stream::unfold(self, |mut poller| async move {
            let batch = poller.poll().await;
            Some((stream::iter(batch), poller))
        })
        .flatten()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn updates(json: &str) -> Vec<Update> {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn text_message_becomes_inbound() {
        let batch = updates(
            r#"[{"update_id":100,"message":{"message_id":7,"date":0,
                "chat":{"id":42,"type":"private"},
                "from":{"id":42,"is_bot":false,"first_name":"Ana","username":"ana_r"},
                "text":"hello"}}]"#,
        );

        let inbound = batch.into_iter().next().unwrap().into_inbound().unwrap();
        assert_eq!(inbound.user_id().as_str(), "42");
        assert_eq!(inbound.text, "hello");
        assert_eq!(inbound.transport_message_id, Some(7));
        assert_eq!(inbound.profile.username.as_deref(), Some("ana_r"));
        assert_eq!(inbound.profile.last_name, None);
    }

    #[test]
    fn non_text_and_bot_messages_are_skipped() {
        let batch = updates(
            r#"[
                {"update_id":1,"message":{"message_id":1,"from":{"id":5,"is_bot":false},"photo":[]}},
                {"update_id":2,"message":{"message_id":2,"from":{"id":6,"is_bot":true},"text":"beep"}},
                {"update_id":3,"edited_message":{"message_id":3,"text":"edit"}}
            ]"#,
        );

        assert!(batch.into_iter().filter_map(Update::into_inbound).next().is_none());
    }

    #[test]
    fn offset_advances_past_highest_update() {
        let batch = updates(r#"[{"update_id":10},{"update_id":12},{"update_id":11}]"#);
        assert_eq!(next_offset(None, &batch), Some(13));
    }

    #[test]
    fn empty_batch_keeps_offset() {
        assert_eq!(next_offset(Some(13), &[]), Some(13));
        assert_eq!(next_offset(None, &[]), None);
    }
}
