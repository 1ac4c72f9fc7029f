//! A user's attempt at a survey.

use serde::{Deserialize, Serialize};

use crate::domain::foundation::{DomainError, ErrorCode, ResponseId, SurveyId, Timestamp, UserId};

/// One user's response to one survey. At most one exists per (survey, user).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SurveyResponse {
    pub id: ResponseId,
    pub survey_id: SurveyId,
    pub user_id: UserId,
    pub started_at: Timestamp,
    pub completed_at: Option<Timestamp>,
}

impl SurveyResponse {
    /// Starts a new, incomplete response.
    pub fn start(survey_id: SurveyId, user_id: UserId) -> Self {
        Self {
            id: ResponseId::new(),
            survey_id,
            user_id,
            started_at: Timestamp::now(),
            completed_at: None,
        }
    }

    /// Returns true once the last question has been answered.
    pub fn is_completed(&self) -> bool {
        self.completed_at.is_some()
    }

    /// Marks the response completed. A response completes exactly once.
    pub fn complete(&mut self, at: Timestamp) -> Result<(), DomainError> {
        if self.is_completed() {
            return Err(DomainError::new(
                ErrorCode::ResponseAlreadyCompleted,
                format!("Response {} is already completed", self.id),
            ));
        }
        self.completed_at = Some(at);
        Ok(())
    }
}
