//! Chat handlers: commands, AI free chat, and the top-level dispatcher.

mod ai_chat;
mod commands;
mod dispatcher;
mod user_locks;

pub use ai_chat::{AiChatHandler, AiChatOutcome, AI_CONTEXT_JOBS};
pub use commands::{Command, CommandHandler, JOBS_LIMIT};
pub use dispatcher::{DispatchError, DispatchOutcome, MessageDispatcher, Route};
pub use user_locks::{UserLocks, UserTurn};
