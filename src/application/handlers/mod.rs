//! Application handlers.
//!
//! Handlers orchestrate domain operations through the ports. The survey
//! handlers return the next session instead of storing it; the chat
//! dispatcher decides when to commit.

pub mod chat;
pub mod survey;

pub use chat::{
    AiChatHandler, Command, CommandHandler, DispatchError, DispatchOutcome, MessageDispatcher,
    Route,
};
pub use survey::{
    AnswerRecorder, FlowError, FlowStep, QuestionPresenter, SurveyCatalog, SurveyFlowController,
};
