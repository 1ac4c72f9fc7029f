//! SurveyCatalog - Read-only view of surveys ordered for presentation.

use std::sync::Arc;

use crate::domain::foundation::{DomainError, QuestionId, SurveyId};
use crate::domain::survey::{Question, Survey, SurveyOption};
use crate::ports::SurveyReader;

/// Surveys offered in one menu.
pub const MENU_LIMIT: usize = 5;

/// Catalog queries used by the survey flow.
#[derive(Clone)]
pub struct SurveyCatalog {
    reader: Arc<dyn SurveyReader>,
}

impl SurveyCatalog {
    pub fn new(reader: Arc<dyn SurveyReader>) -> Self {
        Self { reader }
    }

    /// Active surveys, newest first, capped at [`MENU_LIMIT`].
    pub async fn active_surveys(&self) -> Result<Vec<Survey>, DomainError> {
        self.reader.active_surveys(MENU_LIMIT).await
    }

    pub async fn survey(&self, survey_id: SurveyId) -> Result<Option<Survey>, DomainError> {
        self.reader.find_survey(survey_id).await
    }

    pub async fn question(&self, question_id: QuestionId) -> Result<Option<Question>, DomainError> {
        self.reader.find_question(question_id).await
    }

    /// First sequenced question of a survey.
    pub async fn first_question(&self, survey_id: SurveyId) -> Result<Option<Question>, DomainError> {
        self.reader.first_question_after(survey_id, None).await
    }

    /// Question following `answered`, looked up by its stored order.
    pub async fn question_after(&self, answered: &Question) -> Result<Option<Question>, DomainError> {
        match answered.order {
            Some(order) => {
                self.reader
                    .first_question_after(answered.survey_id, Some(order))
                    .await
            }
            None => Ok(None),
        }
    }

    pub async fn options(&self, question_id: QuestionId) -> Result<Vec<SurveyOption>, DomainError> {
        self.reader.options_for(question_id).await
    }

    /// Number of questions a user will be shown.
    pub async fn total_questions(&self, survey_id: SurveyId) -> Result<u32, DomainError> {
        self.reader.count_sequenced_questions(survey_id).await
    }
}
