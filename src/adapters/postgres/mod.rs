//! PostgreSQL adapters - Database implementations for repository ports.
//!
//! - `PostgresSurveyRepository` - Survey catalog, responses, and answers
//! - `PostgresChatRepository` - Users, message audit log, job postings
//!
//! The schema lives in `migrations/` and is applied with `sqlx::migrate!`.

mod chat_repository;
mod survey_repository;

pub use chat_repository::PostgresChatRepository;
pub use survey_repository::PostgresSurveyRepository;
