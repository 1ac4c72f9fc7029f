//! AnswerRecorder - Persists validated answers.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, QuestionId, ResponseId};
use crate::domain::survey::{Answer, AnswerFields, AnswerValue};
use crate::ports::{AnswerInsert, SurveyResponseRepository};

/// Outcome of recording an answer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RecordedAnswer {
    pub answer: Answer,
    /// False when the question had already been answered in this response;
    /// `answer` is then the earlier one.
    pub created: bool,
}

/// Maps validated values onto storage fields and writes them.
#[derive(Clone)]
pub struct AnswerRecorder {
    responses: Arc<dyn SurveyResponseRepository>,
}

impl AnswerRecorder {
    pub fn new(responses: Arc<dyn SurveyResponseRepository>) -> Self {
        Self { responses }
    }

    pub async fn record(
        &self,
        response_id: ResponseId,
        question_id: QuestionId,
        value: AnswerValue,
    ) -> Result<RecordedAnswer, DomainError> {
        let answer = Answer::new(response_id, question_id, AnswerFields::from(value));

        let recorded = match self.responses.insert_answer(&answer).await? {
            AnswerInsert::Created(answer) => RecordedAnswer {
                answer,
                created: true,
            },
            AnswerInsert::AlreadyAnswered(answer) => {
                tracing::debug!(
                    response_id = %response_id,
                    question_id = %question_id,
                    "Duplicate answer ignored"
                );
                RecordedAnswer {
                    answer,
                    created: false,
                }
            }
        };

        Ok(recorded)
    }
}
