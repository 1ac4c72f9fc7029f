//! In-memory survey catalog and response storage.
//!
//! Enforces the same uniqueness rules as the PostgreSQL schema: one
//! response per (survey, user) and one answer per (response, question).

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::foundation::{
    DomainError, ErrorCode, QuestionId, ResponseId, SurveyId, Timestamp, UserId,
};
use crate::domain::survey::{Answer, Question, Survey, SurveyOption, SurveyResponse};
use crate::ports::{AnswerInsert, SurveyReader, SurveyResponseRepository};

#[derive(Debug, Default)]
struct SurveyTables {
    /// Insertion order breaks ties between equal `created_at`.
    surveys: Vec<Survey>,
    questions: HashMap<QuestionId, Question>,
    options: HashMap<QuestionId, Vec<SurveyOption>>,
    responses: HashMap<ResponseId, SurveyResponse>,
    answers: Vec<Answer>,
}

/// In-memory storage for surveys and responses.
#[derive(Debug, Clone, Default)]
pub struct InMemorySurveyStore {
    tables: Arc<RwLock<SurveyTables>>,
    fail_writes: Arc<AtomicBool>,
}

impl InMemorySurveyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_survey(&self, survey: Survey) {
        self.tables.write().await.surveys.push(survey);
    }

    pub async fn insert_question(&self, question: Question) {
        self.tables
            .write()
            .await
            .questions
            .insert(question.id, question);
    }

    pub async fn insert_option(&self, option: SurveyOption) {
        let mut tables = self.tables.write().await;
        let options = tables.options.entry(option.question_id).or_default();
        options.push(option);
        options.sort_by_key(|o| o.order);
    }

    /// Makes every subsequent write fail with a database error (for tests).
    pub fn set_fail_writes(&self, fail: bool) {
        self.fail_writes.store(fail, Ordering::SeqCst);
    }

    /// Number of stored responses.
    pub async fn response_count(&self) -> usize {
        self.tables.read().await.responses.len()
    }

    fn check_writable(&self) -> Result<(), DomainError> {
        if self.fail_writes.load(Ordering::SeqCst) {
            return Err(DomainError::database("Simulated write failure"));
        }
        Ok(())
    }
}

#[async_trait]
impl SurveyReader for InMemorySurveyStore {
    async fn active_surveys(&self, limit: usize) -> Result<Vec<Survey>, DomainError> {
        let tables = self.tables.read().await;
        let mut active: Vec<Survey> = tables
            .surveys
            .iter()
            .rev()
            .filter(|s| s.is_offered())
            .cloned()
            .collect();
        active.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        active.truncate(limit);
        Ok(active)
    }

    async fn find_survey(&self, survey_id: SurveyId) -> Result<Option<Survey>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.surveys.iter().find(|s| s.id == survey_id).cloned())
    }

    async fn find_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<Question>, DomainError> {
        Ok(self.tables.read().await.questions.get(&question_id).cloned())
    }

    async fn first_question_after(
        &self,
        survey_id: SurveyId,
        after_order: Option<i32>,
    ) -> Result<Option<Question>, DomainError> {
        let tables = self.tables.read().await;
        let next = tables
            .questions
            .values()
            .filter(|q| q.survey_id == survey_id)
            .filter_map(|q| q.order.map(|order| (order, q)))
            .filter(|(order, _)| after_order.map_or(true, |after| *order > after))
            .min_by_key(|(order, _)| *order)
            .map(|(_, q)| q.clone());
        Ok(next)
    }

    async fn options_for(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<SurveyOption>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables.options.get(&question_id).cloned().unwrap_or_default())
    }

    async fn count_sequenced_questions(&self, survey_id: SurveyId) -> Result<u32, DomainError> {
        let tables = self.tables.read().await;
        let count = tables
            .questions
            .values()
            .filter(|q| q.survey_id == survey_id && q.is_sequenced())
            .count();
        Ok(count as u32)
    }
}

#[async_trait]
impl SurveyResponseRepository for InMemorySurveyStore {
    async fn find_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<Option<SurveyResponse>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .responses
            .values()
            .find(|r| r.survey_id == survey_id && &r.user_id == user_id)
            .cloned())
    }

    async fn get_or_create_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<SurveyResponse, DomainError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        if let Some(existing) = tables
            .responses
            .values()
            .find(|r| r.survey_id == survey_id && &r.user_id == user_id)
        {
            return Ok(existing.clone());
        }
        let response = SurveyResponse::start(survey_id, user_id.clone());
        tables.responses.insert(response.id, response.clone());
        Ok(response)
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<AnswerInsert, DomainError> {
        self.check_writable()?;
        if !answer.fields.is_well_formed() {
            return Err(DomainError::validation(
                "answer",
                "exactly one answer field must be populated",
            ));
        }
        let mut tables = self.tables.write().await;
        if !tables.responses.contains_key(&answer.response_id) {
            return Err(DomainError::new(
                ErrorCode::ResponseNotFound,
                format!("Response {} not found", answer.response_id),
            ));
        }
        if let Some(existing) = tables
            .answers
            .iter()
            .find(|a| a.response_id == answer.response_id && a.question_id == answer.question_id)
        {
            return Ok(AnswerInsert::AlreadyAnswered(existing.clone()));
        }
        tables.answers.push(answer.clone());
        Ok(AnswerInsert::Created(answer.clone()))
    }

    async fn complete_response(
        &self,
        response_id: ResponseId,
        completed_at: Timestamp,
    ) -> Result<SurveyResponse, DomainError> {
        self.check_writable()?;
        let mut tables = self.tables.write().await;
        let response = tables.responses.get_mut(&response_id).ok_or_else(|| {
            DomainError::new(
                ErrorCode::ResponseNotFound,
                format!("Response {} not found", response_id),
            )
        })?;
        response.complete(completed_at)?;
        Ok(response.clone())
    }

    async fn answers_for(&self, response_id: ResponseId) -> Result<Vec<Answer>, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .answers
            .iter()
            .filter(|a| a.response_id == response_id)
            .cloned()
            .collect())
    }
}
