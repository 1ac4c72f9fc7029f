//! PostgreSQL implementation of ChatRepository.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;
use uuid::Uuid;

use crate::domain::chat::{
    AiReplyRecord, ChatUser, JobPosting, JobStatus, MessageRecord, NewMessage, SalaryRange,
    UserProfile,
};
use crate::domain::foundation::{DomainError, ErrorCode, JobId, Timestamp, UserId};
use crate::ports::ChatRepository;

pub struct PostgresChatRepository {
    pool: PgPool,
}

impl PostgresChatRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[derive(Debug, sqlx::FromRow)]
struct UserRow {
    user_id: String,
    username: String,
    first_name: String,
    last_name: String,
    is_active: bool,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for ChatUser {
    type Error = DomainError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        Ok(ChatUser {
            user_id: UserId::new(row.user_id).map_err(|e| {
                DomainError::new(ErrorCode::DatabaseError, format!("Invalid user_id: {}", e))
            })?,
            username: row.username,
            first_name: row.first_name,
            last_name: row.last_name,
            is_active: row.is_active,
            created_at: Timestamp::from_datetime(row.created_at),
        })
    }
}

#[derive(Debug, sqlx::FromRow)]
struct JobRow {
    id: Uuid,
    title: String,
    company: String,
    location: String,
    description: String,
    salary_min: Option<i64>,
    salary_max: Option<i64>,
    currency: String,
    views_count: i64,
    created_at: DateTime<Utc>,
}

impl From<JobRow> for JobPosting {
    fn from(row: JobRow) -> Self {
        JobPosting {
            id: JobId::from_uuid(row.id),
            title: row.title,
            company: row.company,
            location: row.location,
            description: row.description,
            salary: SalaryRange {
                min: row.salary_min,
                max: row.salary_max,
                currency: row.currency,
            },
            status: JobStatus::Published,
            views_count: row.views_count,
            created_at: Timestamp::from_datetime(row.created_at),
        }
    }
}

#[async_trait]
impl ChatRepository for PostgresChatRepository {
    async fn get_or_create_user(&self, profile: &UserProfile) -> Result<ChatUser, DomainError> {
        // Names are only rewritten when username or first name changed.
        sqlx::query(
            r#"
            INSERT INTO chat_users (user_id, username, first_name, last_name)
            VALUES ($1, $2, $3, $4)
            ON CONFLICT (user_id) DO UPDATE SET
                username = EXCLUDED.username,
                first_name = EXCLUDED.first_name,
                last_name = EXCLUDED.last_name,
                updated_at = NOW()
            WHERE chat_users.username IS DISTINCT FROM EXCLUDED.username
               OR chat_users.first_name IS DISTINCT FROM EXCLUDED.first_name
            "#,
        )
        .bind(profile.user_id.as_str())
        .bind(profile.username_or_default())
        .bind(profile.first_name_or_default())
        .bind(profile.last_name_or_default())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to upsert user: {}", e)))?;

        let row: UserRow = sqlx::query_as(
            r#"
            SELECT user_id, username, first_name, last_name, is_active, created_at
            FROM chat_users
            WHERE user_id = $1
            "#,
        )
        .bind(profile.user_id.as_str())
        .fetch_one(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to load user: {}", e)))?;

        ChatUser::try_from(row)
    }

    async fn record_message(&self, message: NewMessage) -> Result<MessageRecord, DomainError> {
        let record = MessageRecord::from_new(message);

        sqlx::query(
            r#"
            INSERT INTO chat_messages (
                id, user_id, direction, kind, content, transport_message_id, created_at
            ) VALUES ($1, $2, $3, $4, $5, $6, $7)
            "#,
        )
        .bind(record.id.as_uuid())
        .bind(record.user_id.as_str())
        .bind(record.direction.as_str())
        .bind(record.kind.as_str())
        .bind(&record.content)
        .bind(record.transport_message_id)
        .bind(record.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to save message: {}", e)))?;

        Ok(record)
    }

    async fn record_ai_reply(&self, reply: &AiReplyRecord) -> Result<(), DomainError> {
        sqlx::query(
            r#"
            INSERT INTO ai_replies (message_id, reply_text, confidence_score, model, status, created_at)
            VALUES ($1, $2, $3, $4, $5, $6)
            "#,
        )
        .bind(reply.message_id.as_uuid())
        .bind(&reply.reply_text)
        .bind(reply.confidence_score)
        .bind(&reply.model)
        .bind(reply.status.as_str())
        .bind(reply.created_at.as_datetime())
        .execute(&self.pool)
        .await
        .map_err(|e| {
            if let sqlx::Error::Database(db_err) = &e {
                if db_err.is_foreign_key_violation() {
                    return DomainError::new(
                        ErrorCode::MessageNotFound,
                        format!("Message {} not found", reply.message_id),
                    );
                }
            }
            DomainError::database(format!("Failed to save AI reply: {}", e))
        })?;

        Ok(())
    }

    async fn count_messages(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM chat_messages WHERE user_id = $1")
            .bind(user_id.as_str())
            .fetch_one(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to count messages: {}", e)))?;

        Ok(count as u64)
    }

    async fn published_jobs(&self, limit: usize) -> Result<Vec<JobPosting>, DomainError> {
        let rows: Vec<JobRow> = sqlx::query_as(
            r#"
            SELECT id, title, company, location, description, salary_min, salary_max,
                   currency, views_count, created_at
            FROM job_postings
            WHERE status = 'published'
            ORDER BY created_at DESC
            LIMIT $1
            "#,
        )
        .bind(limit as i64)
        .fetch_all(&self.pool)
        .await
        .map_err(|e| DomainError::database(format!("Failed to list jobs: {}", e)))?;

        Ok(rows.into_iter().map(JobPosting::from).collect())
    }

    async fn record_job_view(&self, job_id: JobId) -> Result<(), DomainError> {
        let result = sqlx::query("UPDATE job_postings SET views_count = views_count + 1 WHERE id = $1")
            .bind(job_id.as_uuid())
            .execute(&self.pool)
            .await
            .map_err(|e| DomainError::database(format!("Failed to record job view: {}", e)))?;

        if result.rows_affected() == 0 {
            return Err(DomainError::new(
                ErrorCode::JobNotFound,
                format!("Job {} not found", job_id),
            ));
        }
        Ok(())
    }
}
