//! Foundation module - Shared domain primitives.
//!
//! Contains value objects, identifiers and error types
//! that form the vocabulary of the recruitment bot domain.

mod errors;
mod ids;
mod rating;
mod timestamp;

pub use errors::{DomainError, ErrorCode, ValidationError};
pub use ids::{AnswerId, JobId, MessageId, OptionId, QuestionId, ResponseId, SurveyId, UserId};
pub use rating::Rating;
pub use timestamp::Timestamp;
