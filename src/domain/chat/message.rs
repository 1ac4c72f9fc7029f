//! Message audit records and inbound text.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::UserProfile;
use crate::domain::foundation::{MessageId, Timestamp, UserId};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageDirection {
    Incoming,
    Outgoing,
}

impl MessageDirection {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageDirection::Incoming => "incoming",
            MessageDirection::Outgoing => "outgoing",
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum MessageKind {
    Text,
    Command,
}

impl MessageKind {
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageKind::Text => "text",
            MessageKind::Command => "command",
        }
    }
}

/// A message about to be stored in the audit log.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct NewMessage {
    pub user_id: UserId,
    pub direction: MessageDirection,
    pub kind: MessageKind,
    pub content: String,
    pub transport_message_id: Option<i64>,
}

impl NewMessage {
    /// An incoming free-text message.
    pub fn incoming_text(
        user_id: UserId,
        content: impl Into<String>,
        transport_message_id: Option<i64>,
    ) -> Self {
        Self {
            user_id,
            direction: MessageDirection::Incoming,
            kind: MessageKind::Text,
            content: content.into(),
            transport_message_id,
        }
    }

    /// An incoming `/command`.
    pub fn incoming_command(
        user_id: UserId,
        content: impl Into<String>,
        transport_message_id: Option<i64>,
    ) -> Self {
        Self {
            kind: MessageKind::Command,
            ..Self::incoming_text(user_id, content, transport_message_id)
        }
    }
}

/// A stored audit-log message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct MessageRecord {
    pub id: MessageId,
    pub user_id: UserId,
    pub direction: MessageDirection,
    pub kind: MessageKind,
    pub content: String,
    pub transport_message_id: Option<i64>,
    pub created_at: Timestamp,
}

impl MessageRecord {
    pub fn from_new(message: NewMessage) -> Self {
        Self {
            id: MessageId::new(),
            user_id: message.user_id,
            direction: message.direction,
            kind: message.kind,
            content: message.content,
            transport_message_id: message.transport_message_id,
            created_at: Timestamp::now(),
        }
    }
}

/// Outcome of an AI reply, as stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AiReplyStatus {
    Sent,
    Failed,
}

impl AiReplyStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            AiReplyStatus::Sent => "sent",
            AiReplyStatus::Failed => "failed",
        }
    }
}

impl fmt::Display for AiReplyStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The AI reply generated for an incoming message.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AiReplyRecord {
    pub message_id: MessageId,
    pub reply_text: String,
    pub confidence_score: f32,
    pub model: String,
    pub status: AiReplyStatus,
    pub created_at: Timestamp,
}

/// One inbound text update, already decoded from the transport payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct InboundText {
    pub profile: UserProfile,
    pub text: String,
    pub transport_message_id: Option<i64>,
}

impl InboundText {
    pub fn new(profile: UserProfile, text: impl Into<String>) -> Self {
        Self {
            profile,
            text: text.into(),
            transport_message_id: None,
        }
    }

    pub fn user_id(&self) -> &UserId {
        &self.profile.user_id
    }
}
