//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (IDs, timestamps, ratings, errors)
//! - `survey` - Surveys, questions, responses, and answer validation
//! - `chat` - Chat users, message audit log, job postings
//! - `conversation` - Per-user session state machine and message chunking

pub mod chat;
pub mod conversation;
pub mod foundation;
pub mod survey;
