//! SurveyResponseRepository port for responses and their answers.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, ResponseId, SurveyId, Timestamp, UserId};
use crate::domain::survey::{Answer, SurveyResponse};

/// Result of inserting an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnswerInsert {
    /// A new row was written.
    Created(Answer),
    /// The question was already answered in this response; the stored
    /// answer is returned unchanged.
    AlreadyAnswered(Answer),
}

impl AnswerInsert {
    pub fn answer(&self) -> &Answer {
        match self {
            AnswerInsert::Created(answer) | AnswerInsert::AlreadyAnswered(answer) => answer,
        }
    }

    pub fn is_created(&self) -> bool {
        matches!(self, AnswerInsert::Created(_))
    }
}

/// Repository for survey responses.
///
/// Implementations enforce one response per (survey, user) and one answer
/// per (response, question).
#[async_trait]
pub trait SurveyResponseRepository: Send + Sync {
    async fn find_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<Option<SurveyResponse>, DomainError>;

    /// Returns the existing response for (survey, user) or creates one.
    async fn get_or_create_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<SurveyResponse, DomainError>;

    async fn insert_answer(&self, answer: &Answer) -> Result<AnswerInsert, DomainError>;

    /// Sets `completed_at`. Fails with `ResponseAlreadyCompleted` when the
    /// response was completed before.
    async fn complete_response(
        &self,
        response_id: ResponseId,
        completed_at: Timestamp,
    ) -> Result<SurveyResponse, DomainError>;

    /// Answers of a response in insertion order.
    async fn answers_for(&self, response_id: ResponseId) -> Result<Vec<Answer>, DomainError>;
}
