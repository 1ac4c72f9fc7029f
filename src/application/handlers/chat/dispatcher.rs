//! MessageDispatcher - Top-level router for inbound text.
//!
//! One call handles one user turn:
//!
//! 1. Wait for the user's previous turn to finish
//! 2. Upsert the chat user and load the session
//! 3. Route: command, survey menu, survey answer, or AI free chat
//! 4. Commit the new session, then deliver the replies
//!
//! Storage failures abort the turn before the session is written, so the
//! stored session never points past data that was not saved.

use std::sync::Arc;
use thiserror::Error;

use super::{AiChatHandler, Command, CommandHandler, UserLocks};
use crate::application::handlers::survey::{FlowError, FlowStep, SurveyFlowController};
use crate::application::replies;
use crate::domain::chat::{ChatUser, InboundText, NewMessage};
use crate::domain::conversation::{split_message, ConversationSession, SessionMode, MAX_MESSAGE_CHARS};
use crate::domain::foundation::{DomainError, UserId};
use crate::ports::{
    ChatRepository, MessageTransport, SessionStore, SessionStoreError, TextFormat, TransportError,
};

/// Errors that abort a turn.
#[derive(Debug, Error)]
pub enum DispatchError {
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    #[error("survey flow error: {0}")]
    Flow(#[from] FlowError),

    #[error("session store error: {0}")]
    Session(#[from] SessionStoreError),

    #[error("transport error: {0}")]
    Transport(#[from] TransportError),
}

/// Which handler took the turn.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Route {
    Command,
    Cancel,
    SurveyEntry,
    SurveySelection,
    SurveyAnswer,
    AiChat,
}

/// Summary of a completed turn.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub route: Route,
    pub mode_before: SessionMode,
    pub mode_after: SessionMode,
    /// Messages delivered, counting every chunk.
    pub messages_sent: usize,
}

/// Replies of one turn and how to format them.
struct TurnReplies {
    texts: Vec<String>,
    format: TextFormat,
}

pub struct MessageDispatcher {
    locks: UserLocks,
    chat: Arc<dyn ChatRepository>,
    sessions: Arc<dyn SessionStore>,
    flow: SurveyFlowController,
    commands: CommandHandler,
    ai_chat: AiChatHandler,
    transport: Arc<dyn MessageTransport>,
}

impl MessageDispatcher {
    pub fn new(
        chat: Arc<dyn ChatRepository>,
        sessions: Arc<dyn SessionStore>,
        flow: SurveyFlowController,
        ai_chat: AiChatHandler,
        transport: Arc<dyn MessageTransport>,
    ) -> Self {
        Self {
            locks: UserLocks::new(),
            commands: CommandHandler::new(chat.clone()),
            chat,
            sessions,
            flow,
            ai_chat,
            transport,
        }
    }

    /// Handles one inbound text. Errors are logged and answered with a short
    /// message before being returned.
    pub async fn handle_incoming_text(
        &self,
        inbound: &InboundText,
    ) -> Result<DispatchOutcome, DispatchError> {
        let user_id = inbound.user_id().clone();

        let result = {
            let _turn = self.locks.acquire(&user_id).await;
            self.run_turn(inbound).await
        };
        self.locks.prune().await;

        match result {
            Ok(outcome) => {
                tracing::debug!(
                    user_id = %user_id,
                    route = ?outcome.route,
                    mode_before = %outcome.mode_before,
                    mode_after = %outcome.mode_after,
                    "Turn handled"
                );
                Ok(outcome)
            }
            Err(e) => {
                tracing::error!(user_id = %user_id, error = %e, "Failed to handle message");
                if let Err(send_err) = self
                    .transport
                    .send_text(&user_id, replies::PROCESSING_ERROR, TextFormat::Plain)
                    .await
                {
                    tracing::warn!(user_id = %user_id, error = %send_err, "Error notice not delivered");
                }
                Err(e)
            }
        }
    }

    async fn run_turn(&self, inbound: &InboundText) -> Result<DispatchOutcome, DispatchError> {
        let user = self.chat.get_or_create_user(&inbound.profile).await?;
        let session = self.load_session(&user.user_id).await?;
        let mode_before = session.mode();

        let (route, step, format) = match Command::parse(&inbound.text) {
            Some(command) => {
                self.chat
                    .record_message(NewMessage::incoming_command(
                        user.user_id.clone(),
                        inbound.text.clone(),
                        inbound.transport_message_id,
                    ))
                    .await?;
                let (route, step) = self.command_step(&user, &session, &command).await?;
                (route, step, TextFormat::Plain)
            }
            None => self.text_step(&user, &session, inbound).await?,
        };

        let mode_after = match &step.session {
            Some(next) => {
                self.sessions.put(&user.user_id, next).await?;
                next.mode()
            }
            None => mode_before,
        };

        let messages_sent = self
            .deliver(
                &user.user_id,
                TurnReplies {
                    texts: step.replies,
                    format,
                },
            )
            .await?;

        Ok(DispatchOutcome {
            route,
            mode_before,
            mode_after,
            messages_sent,
        })
    }

    /// Loads the session. A stored session that no longer decodes is
    /// dropped and the turn continues as `Idle`.
    async fn load_session(&self, user_id: &UserId) -> Result<ConversationSession, DispatchError> {
        match self.sessions.get(user_id).await {
            Err(SessionStoreError::DeserializationFailed(reason)) => {
                tracing::warn!(user_id = %user_id, %reason, "Discarding unreadable session");
                self.sessions.clear(user_id).await?;
                Ok(ConversationSession::Idle)
            }
            other => Ok(other?),
        }
    }

    async fn command_step(
        &self,
        user: &ChatUser,
        session: &ConversationSession,
        command: &Command,
    ) -> Result<(Route, FlowStep), DispatchError> {
        match command {
            Command::Cancel => {
                let reply = if session.is_idle() {
                    replies::NOTHING_TO_CANCEL
                } else {
                    tracing::info!(user_id = %user.user_id, mode = %session.mode(), "Session cancelled");
                    replies::CANCELLED
                };
                Ok((
                    Route::Cancel,
                    FlowStep {
                        session: Some(ConversationSession::Idle),
                        replies: vec![reply.to_string()],
                    },
                ))
            }
            Command::Survey => Ok((Route::SurveyEntry, self.flow.list_entry(&user.user_id).await?)),
            other => {
                let texts = self.commands.handle(user, other).await?;
                Ok((
                    Route::Command,
                    FlowStep {
                        session: None,
                        replies: texts,
                    },
                ))
            }
        }
    }

    async fn text_step(
        &self,
        user: &ChatUser,
        session: &ConversationSession,
        inbound: &InboundText,
    ) -> Result<(Route, FlowStep, TextFormat), DispatchError> {
        match session {
            ConversationSession::ChoosingSurvey { .. } => {
                let step = self.flow.select(&user.user_id, session, &inbound.text).await?;
                Ok((Route::SurveySelection, step, TextFormat::Plain))
            }
            ConversationSession::InSurvey(progress) => {
                let step = self
                    .flow
                    .process_answer(&user.user_id, progress, &inbound.text)
                    .await?;
                Ok((Route::SurveyAnswer, step, TextFormat::Plain))
            }
            ConversationSession::Idle => {
                let outcome = self.ai_chat.handle(inbound).await?;
                let step = FlowStep {
                    session: None,
                    replies: vec![outcome.reply_text],
                };
                Ok((Route::AiChat, step, TextFormat::Html))
            }
        }
    }

    /// Sends every reply in order, split into transport-sized chunks.
    async fn deliver(&self, user_id: &UserId, replies: TurnReplies) -> Result<usize, DispatchError> {
        let mut sent = 0;
        for text in &replies.texts {
            for chunk in split_message(text, MAX_MESSAGE_CHARS) {
                self.send_chunk(user_id, &chunk, replies.format).await?;
                sent += 1;
            }
        }
        Ok(sent)
    }

    async fn send_chunk(
        &self,
        user_id: &UserId,
        chunk: &str,
        format: TextFormat,
    ) -> Result<(), TransportError> {
        match self.transport.send_text(user_id, chunk, format).await {
            // Generated text may not be valid markup.
            Err(TransportError::Rejected(reason)) if format == TextFormat::Html => {
                tracing::warn!(user_id = %user_id, %reason, "HTML reply rejected, resending as plain text");
                self.transport
                    .send_text(user_id, chunk, TextFormat::Plain)
                    .await
            }
            other => other,
        }
    }
}
