//! Conversation domain module.
//!
//! Per-user session state and outbound message shaping.

mod chunking;
mod session;

pub use chunking::{split_message, MAX_MESSAGE_CHARS};
pub use session::{ConversationSession, SessionMode, SurveyProgress};
