//! SurveyFlowController - The survey state machine.
//!
//! Modes move `Idle → ChoosingSurvey → InSurvey → Idle`, skipping the menu
//! when exactly one survey is active. Every operation returns a [`FlowStep`]
//! instead of writing the session itself, so the dispatcher can commit the
//! new session only once all storage writes of the turn have succeeded.

use std::sync::Arc;
use thiserror::Error;

use super::{AnswerRecorder, QuestionPresenter, SurveyCatalog};
use crate::application::replies;
use crate::domain::conversation::{ConversationSession, SurveyProgress};
use crate::domain::foundation::{DomainError, ErrorCode, QuestionId, ResponseId, Timestamp, UserId};
use crate::domain::survey::{Question, Survey};
use crate::ports::SurveyResponseRepository;

/// What a flow operation decided.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FlowStep {
    /// Session to store. `None` keeps the current one.
    pub session: Option<ConversationSession>,
    /// Plain-text replies, in order.
    pub replies: Vec<String>,
}

impl FlowStep {
    fn set(session: ConversationSession, reply: impl Into<String>) -> Self {
        Self {
            session: Some(session),
            replies: vec![reply.into()],
        }
    }

    fn keep(reply: impl Into<String>) -> Self {
        Self {
            session: None,
            replies: vec![reply.into()],
        }
    }

    /// Drops the session without telling the user.
    fn discard() -> Self {
        Self {
            session: Some(ConversationSession::Idle),
            replies: Vec::new(),
        }
    }
}

/// Errors from the survey flow.
#[derive(Debug, Error)]
pub enum FlowError {
    #[error("storage error: {0}")]
    Storage(#[from] DomainError),

    #[error("question {0} has no order and cannot be presented")]
    Unsequenced(QuestionId),
}

/// Drives survey entry, answering and completion.
#[derive(Clone)]
pub struct SurveyFlowController {
    catalog: SurveyCatalog,
    presenter: QuestionPresenter,
    recorder: AnswerRecorder,
    responses: Arc<dyn SurveyResponseRepository>,
}

impl SurveyFlowController {
    pub fn new(
        catalog: SurveyCatalog,
        presenter: QuestionPresenter,
        recorder: AnswerRecorder,
        responses: Arc<dyn SurveyResponseRepository>,
    ) -> Self {
        Self {
            catalog,
            presenter,
            recorder,
            responses,
        }
    }

    /// Entry point for `/survey`: no surveys, straight into the only one, or
    /// a numbered menu.
    pub async fn list_entry(&self, user_id: &UserId) -> Result<FlowStep, FlowError> {
        let surveys = self.catalog.active_surveys().await?;

        match surveys.as_slice() {
            [] => Ok(FlowStep::set(ConversationSession::Idle, replies::NO_SURVEYS)),
            [only] => self.start(user_id, only).await,
            many => Ok(FlowStep::set(
                ConversationSession::choosing(many.iter().map(|s| s.id)),
                replies::survey_menu(many),
            )),
        }
    }

    /// Handles text sent while the survey menu is showing.
    pub async fn select(
        &self,
        user_id: &UserId,
        session: &ConversationSession,
        raw: &str,
    ) -> Result<FlowStep, FlowError> {
        let Some(survey_id) = session.selected_survey(raw) else {
            return Ok(FlowStep::keep(replies::INVALID_SELECTION));
        };

        match self.catalog.survey(survey_id).await? {
            Some(survey) if survey.is_offered() => self.start(user_id, &survey).await,
            // Closed or deleted since the menu was shown.
            _ => self.list_entry(user_id).await,
        }
    }

    /// Starts or resumes `survey` for `user_id`.
    pub async fn start(&self, user_id: &UserId, survey: &Survey) -> Result<FlowStep, FlowError> {
        if let Some(existing) = self.responses.find_response(survey.id, user_id).await? {
            if let Some(completed_at) = existing.completed_at {
                return Ok(FlowStep::set(
                    ConversationSession::Idle,
                    replies::already_answered(survey, completed_at),
                ));
            }
        }

        let response = self
            .responses
            .get_or_create_response(survey.id, user_id)
            .await?;

        let Some(first) = self.catalog.first_question(survey.id).await? else {
            return Ok(FlowStep::set(ConversationSession::Idle, replies::NO_QUESTIONS));
        };

        tracing::info!(
            user_id = %user_id,
            survey_id = %survey.id,
            response_id = %response.id,
            "Survey started"
        );

        self.present(survey, response.id, &first, 0).await
    }

    /// Validates and records an answer, then moves on or completes.
    pub async fn process_answer(
        &self,
        user_id: &UserId,
        progress: &SurveyProgress,
        raw: &str,
    ) -> Result<FlowStep, FlowError> {
        let Some((survey, question)) = self.load_progress(progress).await? else {
            tracing::warn!(
                user_id = %user_id,
                survey_id = %progress.survey_id,
                question_id = %progress.question_id,
                "Stale survey session discarded"
            );
            return Ok(FlowStep::discard());
        };

        let value = match progress.expected.parse(raw) {
            Ok(value) => value,
            Err(rejection) => {
                tracing::debug!(user_id = %user_id, %rejection, "Answer rejected");
                return Ok(FlowStep::keep(replies::rejection(rejection)));
            }
        };

        self.recorder
            .record(progress.response_id, question.id, value)
            .await?;

        match self.catalog.question_after(&question).await? {
            Some(next) => {
                self.present(&survey, progress.response_id, &next, progress.position + 1)
                    .await
            }
            None => self.complete(user_id, &survey, progress.response_id).await,
        }
    }

    async fn load_progress(
        &self,
        progress: &SurveyProgress,
    ) -> Result<Option<(Survey, Question)>, FlowError> {
        let Some(survey) = self.catalog.survey(progress.survey_id).await? else {
            return Ok(None);
        };
        let Some(question) = self.catalog.question(progress.question_id).await? else {
            return Ok(None);
        };
        if question.survey_id != survey.id {
            return Ok(None);
        }
        Ok(Some((survey, question)))
    }

    async fn present(
        &self,
        survey: &Survey,
        response_id: ResponseId,
        question: &Question,
        position: u32,
    ) -> Result<FlowStep, FlowError> {
        let question_order = question.order.ok_or(FlowError::Unsequenced(question.id))?;
        let rendered = self.presenter.render(survey, question, position).await?;

        let session = ConversationSession::InSurvey(SurveyProgress {
            survey_id: survey.id,
            response_id,
            question_id: question.id,
            question_order,
            position,
            expected: rendered.expected,
        });

        Ok(FlowStep::set(session, rendered.text))
    }

    async fn complete(
        &self,
        user_id: &UserId,
        survey: &Survey,
        response_id: ResponseId,
    ) -> Result<FlowStep, FlowError> {
        match self
            .responses
            .complete_response(response_id, Timestamp::now())
            .await
        {
            Ok(_) => {}
            Err(e) if e.code == ErrorCode::ResponseAlreadyCompleted => {
                tracing::debug!(response_id = %response_id, "Response was already completed");
            }
            Err(e) => return Err(e.into()),
        }

        tracing::info!(
            user_id = %user_id,
            survey_id = %survey.id,
            response_id = %response_id,
            "Survey completed"
        );

        Ok(FlowStep::set(
            ConversationSession::Idle,
            replies::survey_completed(survey),
        ))
    }
}
