//! AiChatHandler - Free-chat turn with the AI responder.
//!
//! The inbound message is stored first, then the responder is asked with a
//! few published jobs as context. Responder failures never reach the user:
//! they are logged, stored as `Failed`, and replaced by a fallback text.

use std::sync::Arc;

use crate::application::replies;
use crate::domain::chat::{AiReplyRecord, AiReplyStatus, InboundText, NewMessage};
use crate::domain::foundation::{DomainError, MessageId, Timestamp};
use crate::ports::{AiContext, AiResponder, ChatRepository, MessageTransport};

/// Jobs passed to the responder as context.
pub const AI_CONTEXT_JOBS: usize = 5;

/// Result of one free-chat turn.
#[derive(Debug, Clone, PartialEq)]
pub struct AiChatOutcome {
    pub message_id: MessageId,
    /// Text to deliver to the user.
    pub reply_text: String,
    pub status: AiReplyStatus,
}

#[derive(Clone)]
pub struct AiChatHandler {
    chat: Arc<dyn ChatRepository>,
    responder: Arc<dyn AiResponder>,
    transport: Arc<dyn MessageTransport>,
}

impl AiChatHandler {
    pub fn new(
        chat: Arc<dyn ChatRepository>,
        responder: Arc<dyn AiResponder>,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        Self {
            chat,
            responder,
            transport,
        }
    }

    pub async fn handle(&self, inbound: &InboundText) -> Result<AiChatOutcome, DomainError> {
        let user_id = inbound.user_id();

        let message = self
            .chat
            .record_message(NewMessage::incoming_text(
                user_id.clone(),
                inbound.text.clone(),
                inbound.transport_message_id,
            ))
            .await?;

        let context = AiContext::with_jobs(self.chat.published_jobs(AI_CONTEXT_JOBS).await?);

        if let Err(e) = self.transport.send_typing(user_id).await {
            tracing::debug!(user_id = %user_id, error = %e, "Typing indicator not sent");
        }

        let record = match self.responder.respond(&inbound.text, user_id, &context).await {
            Ok(reply) if !reply.is_error => {
                let reply_text = if reply.text.trim().is_empty() {
                    replies::AI_EMPTY_FALLBACK.to_string()
                } else {
                    reply.text
                };
                AiReplyRecord {
                    message_id: message.id,
                    reply_text,
                    confidence_score: reply.confidence_score,
                    model: reply.model,
                    status: AiReplyStatus::Sent,
                    created_at: Timestamp::now(),
                }
            }
            Ok(reply) => {
                tracing::warn!(user_id = %user_id, model = %reply.model, "AI responder returned an error reply");
                self.failed_record(message.id, reply.model)
            }
            Err(e) => {
                tracing::error!(
                    user_id = %user_id,
                    model = %self.responder.model_name(),
                    error = %e,
                    "AI responder failed"
                );
                self.failed_record(message.id, self.responder.model_name().to_string())
            }
        };

        self.chat.record_ai_reply(&record).await?;

        Ok(AiChatOutcome {
            message_id: message.id,
            reply_text: record.reply_text,
            status: record.status,
        })
    }

    fn failed_record(&self, message_id: MessageId, model: String) -> AiReplyRecord {
        AiReplyRecord {
            message_id,
            reply_text: replies::AI_FAILURE.to_string(),
            confidence_score: 0.0,
            model,
            status: AiReplyStatus::Failed,
            created_at: Timestamp::now(),
        }
    }
}
