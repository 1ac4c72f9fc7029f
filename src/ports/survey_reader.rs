//! SurveyReader port for read-only survey catalog queries.

use async_trait::async_trait;

use crate::domain::foundation::{DomainError, QuestionId, SurveyId};
use crate::domain::survey::{Question, Survey, SurveyOption};

/// Read-only access to surveys, questions, and options.
#[async_trait]
pub trait SurveyReader: Send + Sync {
    /// Active surveys, newest first, at most `limit`.
    async fn active_surveys(&self, limit: usize) -> Result<Vec<Survey>, DomainError>;

    async fn find_survey(&self, survey_id: SurveyId) -> Result<Option<Survey>, DomainError>;

    async fn find_question(&self, question_id: QuestionId)
        -> Result<Option<Question>, DomainError>;

    /// First sequenced question whose order is strictly greater than
    /// `after_order`, or the very first one when `after_order` is `None`.
    async fn first_question_after(
        &self,
        survey_id: SurveyId,
        after_order: Option<i32>,
    ) -> Result<Option<Question>, DomainError>;

    /// Options of a question in display order.
    async fn options_for(&self, question_id: QuestionId)
        -> Result<Vec<SurveyOption>, DomainError>;

    /// Number of questions with a non-null order.
    async fn count_sequenced_questions(&self, survey_id: SurveyId) -> Result<u32, DomainError>;
}
