//! Application layer - Handlers and user-facing texts.
//!
//! This layer orchestrates domain operations and coordinates between ports.

pub mod handlers;
pub mod replies;

pub use handlers::{
    AiChatHandler, AnswerRecorder, CommandHandler, DispatchError, DispatchOutcome,
    MessageDispatcher, QuestionPresenter, SurveyCatalog, SurveyFlowController,
};
