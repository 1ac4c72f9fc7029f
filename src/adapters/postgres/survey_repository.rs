//! PostgreSQL implementation of SurveyReader and SurveyResponseRepository.
//!
//! Uniqueness of (survey, user) responses and (response, question) answers
//! is enforced by the schema; get-or-create paths use `ON CONFLICT`.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::foundation::{
    AnswerId, DomainError, ErrorCode, OptionId, QuestionId, Rating, ResponseId, SurveyId,
    Timestamp, UserId,
};
use crate::domain::survey::{
    Answer, AnswerFields, Question, Survey, SurveyOption, SurveyResponse,
};
use crate::ports::{AnswerInsert, SurveyReader, SurveyResponseRepository};

/// PostgreSQL-backed survey catalog and response storage.
pub struct PostgresSurveyRepository {
    pool: PgPool,
}

impl PostgresSurveyRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct SurveyRow {
    id: Uuid,
    title: String,
    description: String,
    survey_type: String,
    status: String,
    created_at: DateTime<Utc>,
    expires_at: Option<DateTime<Utc>>,
}

impl TryFrom<SurveyRow> for Survey {
    type Error = DomainError;

    fn try_from(row: SurveyRow) -> Result<Self, Self::Error> {
        Ok(Survey {
            id: SurveyId::from_uuid(row.id),
            title: row.title,
            description: row.description,
            survey_type: row.survey_type.parse().map_err(corrupt_row)?,
            status: row.status.parse().map_err(corrupt_row)?,
            created_at: Timestamp::from_datetime(row.created_at),
            expires_at: row.expires_at.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct QuestionRow {
    id: Uuid,
    survey_id: Uuid,
    question_text: String,
    question_type: String,
    question_order: Option<i32>,
    is_required: bool,
}

impl TryFrom<QuestionRow> for Question {
    type Error = DomainError;

    fn try_from(row: QuestionRow) -> Result<Self, Self::Error> {
        Ok(Question {
            id: QuestionId::from_uuid(row.id),
            survey_id: SurveyId::from_uuid(row.survey_id),
            text: row.question_text,
            question_type: row.question_type.parse().map_err(corrupt_row)?,
            order: row.question_order,
            is_required: row.is_required,
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct OptionRow {
    id: Uuid,
    question_id: Uuid,
    option_text: String,
    option_order: i32,
}

impl From<OptionRow> for SurveyOption {
    fn from(row: OptionRow) -> Self {
        SurveyOption {
            id: OptionId::from_uuid(row.id),
            question_id: QuestionId::from_uuid(row.question_id),
            text: row.option_text,
            order: row.option_order,
        }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct ResponseRow {
    id: Uuid,
    survey_id: Uuid,
    user_id: String,
    started_at: DateTime<Utc>,
    completed_at: Option<DateTime<Utc>>,
}

impl TryFrom<ResponseRow> for SurveyResponse {
    type Error = DomainError;

    fn try_from(row: ResponseRow) -> Result<Self, Self::Error> {
        Ok(SurveyResponse {
            id: ResponseId::from_uuid(row.id),
            survey_id: SurveyId::from_uuid(row.survey_id),
            user_id: UserId::new(row.user_id).map_err(corrupt_row)?,
            started_at: Timestamp::from_datetime(row.started_at),
            completed_at: row.completed_at.map(Timestamp::from_datetime),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct AnswerRow {
    id: Uuid,
    response_id: Uuid,
    question_id: Uuid,
    selected_option_id: Option<Uuid>,
    rating: Option<i16>,
    answer_text: Option<String>,
    answered_at: DateTime<Utc>,
}

impl TryFrom<AnswerRow> for Answer {
    type Error = DomainError;

    fn try_from(row: AnswerRow) -> Result<Self, Self::Error> {
        let rating = row
            .rating
            .map(Rating::try_new)
            .transpose()
            .map_err(corrupt_row)?;
        Ok(Answer {
            id: AnswerId::from_uuid(row.id),
            response_id: ResponseId::from_uuid(row.response_id),
            question_id: QuestionId::from_uuid(row.question_id),
            fields: AnswerFields {
                selected_option_id: row.selected_option_id.map(OptionId::from_uuid),
                rating,
                answer_text: row.answer_text,
            },
            answered_at: Timestamp::from_datetime(row.answered_at),
        })
    }
}

fn corrupt_row(err: impl std::fmt::Display) -> DomainError {
    DomainError::database(format!("Invalid stored value: {}", err))
}

fn db_error(context: &str) -> impl Fn(sqlx::Error) -> DomainError + '_ {
    move |e| DomainError::database(format!("{}: {}", context, e))
}

const RESPONSE_COLUMNS: &str = "id, survey_id, user_id, started_at, completed_at";
const ANSWER_COLUMNS: &str =
    "id, response_id, question_id, selected_option_id, rating, answer_text, answered_at";

impl PostgresSurveyRepository {
    async fn fetch_response(&self, response_id: ResponseId) -> Result<Option<SurveyResponse>, DomainError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM survey_responses WHERE id = $1",
            RESPONSE_COLUMNS
        ))
        .bind(response_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to load response"))?;

        row.map(SurveyResponse::try_from).transpose()
    }
}

#[async_trait]
impl SurveyReader for PostgresSurveyRepository {
    async fn active_surveys(&self, limit: usize) -> Result<Vec<Survey>, DomainError> {
        let rows: Vec<SurveyRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, survey_type, status, created_at, expires_at
            FROM surveys
            WHERE status = 'active'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to list surveys"))?;

        rows.into_iter().map(Survey::try_from).collect()
    }

    async fn find_survey(&self, survey_id: SurveyId) -> Result<Option<Survey>, DomainError> {
        let row: Option<SurveyRow> = sqlx::query_as(
            r#"
            SELECT id, title, description, survey_type, status, created_at, expires_at
            FROM surveys
            WHERE id = $1
            "#,
        )
        .bind(survey_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find survey"))?;

        row.map(Survey::try_from).transpose()
    }

    async fn find_question(
        &self,
        question_id: QuestionId,
    ) -> Result<Option<Question>, DomainError> {
        let row: Option<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, survey_id, question_text, question_type, question_order, is_required
            FROM survey_questions
            WHERE id = $1
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find question"))?;

        row.map(Question::try_from).transpose()
    }

    async fn first_question_after(
        &self,
        survey_id: SurveyId,
        after_order: Option<i32>,
    ) -> Result<Option<Question>, DomainError> {
        let row: Option<QuestionRow> = sqlx::query_as(
            r#"
            SELECT id, survey_id, question_text, question_type, question_order, is_required
            FROM survey_questions
            WHERE survey_id = $1
              AND question_order IS NOT NULL
              AND ($2::INTEGER IS NULL OR question_order > $2)
            ORDER BY question_order ASC
            LIMIT 1
            "#,
        )
        .bind(survey_id.as_uuid())
        .bind(after_order)
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find next question"))?;

        row.map(Question::try_from).transpose()
    }

    async fn options_for(
        &self,
        question_id: QuestionId,
    ) -> Result<Vec<SurveyOption>, DomainError> {
        let rows: Vec<OptionRow> = sqlx::query_as(
            r#"
            SELECT id, question_id, option_text, option_order
            FROM survey_options
            WHERE question_id = $1
            ORDER BY option_order ASC, id ASC
            "#,
        )
        .bind(question_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load options"))?;

        Ok(rows.into_iter().map(SurveyOption::from).collect())
    }

    async fn count_sequenced_questions(&self, survey_id: SurveyId) -> Result<u32, DomainError> {
        let count: i64 = sqlx::query_scalar(
            r#"
            SELECT COUNT(*)
            FROM survey_questions
            WHERE survey_id = $1 AND question_order IS NOT NULL
            "#,
        )
        .bind(survey_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to count questions"))?;

        Ok(count as u32)
    }
}

#[async_trait]
impl SurveyResponseRepository for PostgresSurveyRepository {
    async fn find_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<Option<SurveyResponse>, DomainError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            "SELECT {} FROM survey_responses WHERE survey_id = $1 AND user_id = $2",
            RESPONSE_COLUMNS
        ))
        .bind(survey_id.as_uuid())
        .bind(user_id.as_str())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to find response"))?;

        row.map(SurveyResponse::try_from).transpose()
    }

    async fn get_or_create_response(
        &self,
        survey_id: SurveyId,
        user_id: &UserId,
    ) -> Result<SurveyResponse, DomainError> {
        let fresh = SurveyResponse::start(survey_id, user_id.clone());

        sqlx::query(
            r#"
            INSERT INTO survey_responses (id, survey_id, user_id, started_at)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (survey_id, user_id) DO NOTHING
            "#,
        )
        .bind(fresh.id.as_uuid())
        .bind(survey_id.as_uuid())
        .bind(user_id.as_str())
        .bind(fresh.started_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to create response"))?;

        self.find_response(survey_id, user_id).await?.ok_or_else(|| {
            DomainError::new(
                ErrorCode::ResponseNotFound,
                "Response vanished after upsert",
            )
        })
    }

    async fn insert_answer(&self, answer: &Answer) -> Result<AnswerInsert, DomainError> {
        if !answer.fields.is_well_formed() {
            return Err(DomainError::validation(
                "answer",
                "exactly one answer field must be populated",
            ));
        }

        let inserted = sqlx::query(
            r#"
            INSERT INTO survey_answers (
                id, response_id, question_id, selected_option_id, rating, answer_text, answered_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            ON CONFLICT (response_id, question_id) DO NOTHING
            "#,
        )
        .bind(answer.id.as_uuid())
        .bind(answer.response_id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .bind(answer.fields.selected_option_id.map(|id| *id.as_uuid()))
        .bind(answer.fields.rating.map(|r| r.value()))
        .bind(&answer.fields.answer_text)
        .bind(answer.answered_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(db_error("Failed to save answer"))?;

        if inserted.rows_affected() == 1 {
            return Ok(AnswerInsert::Created(answer.clone()));
        }

        let row: AnswerRow = sqlx::query_as(&format!(
            "SELECT {} FROM survey_answers WHERE response_id = $1 AND question_id = $2",
            ANSWER_COLUMNS
        ))
        .bind(answer.response_id.as_uuid())
        .bind(answer.question_id.as_uuid())
        .fetch_one(&self.pool)
        .await
        .map_err(db_error("Failed to load existing answer"))?;

        Ok(AnswerInsert::AlreadyAnswered(Answer::try_from(row)?))
    }

    async fn complete_response(
        &self,
        response_id: ResponseId,
        completed_at: Timestamp,
    ) -> Result<SurveyResponse, DomainError> {
        let row: Option<ResponseRow> = sqlx::query_as(&format!(
            r#"
            UPDATE survey_responses
            SET completed_at = $2
            WHERE id = $1 AND completed_at IS NULL
            RETURNING {}
            "#,
            RESPONSE_COLUMNS
        ))
        .bind(response_id.as_uuid())
        .bind(completed_at.as_datetime())
        .fetch_optional(&self.pool)
        .await
        .map_err(db_error("Failed to complete response"))?;

        if let Some(row) = row {
            return SurveyResponse::try_from(row);
        }

        match self.fetch_response(response_id).await? {
            Some(_) => Err(DomainError::new(
                ErrorCode::ResponseAlreadyCompleted,
                format!("Response {} is already completed", response_id),
            )),
            None => Err(DomainError::new(
                ErrorCode::ResponseNotFound,
                format!("Response {} not found", response_id),
            )),
        }
    }

    async fn answers_for(&self, response_id: ResponseId) -> Result<Vec<Answer>, DomainError> {
        let rows: Vec<AnswerRow> = sqlx::query_as(&format!(
            "SELECT {} FROM survey_answers WHERE response_id = $1 ORDER BY answered_at ASC",
            ANSWER_COLUMNS
        ))
        .bind(response_id.as_uuid())
        .fetch_all(&self.pool)
        .await
        .map_err(db_error("Failed to load answers"))?;

        rows.into_iter().map(Answer::try_from).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::survey::{QuestionType, SurveyStatus};

    #[test]
    fn survey_row_maps_storage_strings() {
        let row = SurveyRow {
            id: Uuid::new_v4(),
            title: "Satisfaction".into(),
            description: String::new(),
            survey_type: "wellness".into(),
            status: "active".into(),
            created_at: Utc::now(),
            expires_at: None,
        };

        let survey = Survey::try_from(row).unwrap();
        assert_eq!(survey.status, SurveyStatus::Active);
    }

    #[test]
    fn unknown_question_type_is_a_database_error() {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            survey_id: Uuid::new_v4(),
            question_text: "?".into(),
            question_type: "slider".into(),
            question_order: Some(1),
            is_required: true,
        };

        let err = Question::try_from(row).unwrap_err();
        assert_eq!(err.code, ErrorCode::DatabaseError);
    }

    #[test]
    fn question_row_keeps_null_order() {
        let row = QuestionRow {
            id: Uuid::new_v4(),
            survey_id: Uuid::new_v4(),
            question_text: "Why?".into(),
            question_type: "text".into(),
            question_order: None,
            is_required: false,
        };

        let question = Question::try_from(row).unwrap();
        assert_eq!(question.question_type, QuestionType::FreeText);
        assert!(!question.is_sequenced());
    }

    #[test]
    fn out_of_range_rating_is_rejected() {
        let row = AnswerRow {
            id: Uuid::new_v4(),
            response_id: Uuid::new_v4(),
            question_id: Uuid::new_v4(),
            selected_option_id: None,
            rating: Some(9),
            answer_text: None,
            answered_at: Utc::now(),
        };

        assert!(Answer::try_from(row).is_err());
    }
}
