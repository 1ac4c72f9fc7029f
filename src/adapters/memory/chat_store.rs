//! In-memory chat storage: users, message audit log, job postings.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::chat::{
    AiReplyRecord, ChatUser, JobPosting, MessageRecord, NewMessage, UserProfile,
};
use crate::domain::foundation::{DomainError, ErrorCode, JobId, UserId};
use crate::ports::ChatRepository;

#[derive(Debug, Default)]
struct ChatTables {
    users: HashMap<UserId, ChatUser>,
    messages: Vec<MessageRecord>,
    ai_replies: Vec<AiReplyRecord>,
    jobs: Vec<JobPosting>,
}

/// In-memory implementation of [`ChatRepository`].
#[derive(Debug, Clone, Default)]
pub struct InMemoryChatStore {
    tables: Arc<RwLock<ChatTables>>,
}

impl InMemoryChatStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn insert_job(&self, job: JobPosting) {
        self.tables.write().await.jobs.push(job);
    }

    pub async fn find_user(&self, user_id: &UserId) -> Option<ChatUser> {
        self.tables.read().await.users.get(user_id).cloned()
    }

    pub async fn messages(&self) -> Vec<MessageRecord> {
        self.tables.read().await.messages.clone()
    }

    pub async fn ai_replies(&self) -> Vec<AiReplyRecord> {
        self.tables.read().await.ai_replies.clone()
    }

    pub async fn job_views(&self, job_id: JobId) -> Option<i64> {
        let tables = self.tables.read().await;
        tables
            .jobs
            .iter()
            .find(|j| j.id == job_id)
            .map(|j| j.views_count)
    }
}

#[async_trait]
impl ChatRepository for InMemoryChatStore {
    async fn get_or_create_user(&self, profile: &UserProfile) -> Result<ChatUser, DomainError> {
        let mut tables = self.tables.write().await;
        let user = tables
            .users
            .entry(profile.user_id.clone())
            .or_insert_with(|| ChatUser::from_profile(profile));
        user.refresh_from(profile);
        Ok(user.clone())
    }

    async fn record_message(&self, message: NewMessage) -> Result<MessageRecord, DomainError> {
        let record = MessageRecord::from_new(message);
        self.tables.write().await.messages.push(record.clone());
        Ok(record)
    }

    async fn record_ai_reply(&self, reply: &AiReplyRecord) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        if !tables.messages.iter().any(|m| m.id == reply.message_id) {
            return Err(DomainError::new(
                ErrorCode::MessageNotFound,
                format!("Message {} not found", reply.message_id),
            ));
        }
        tables.ai_replies.push(reply.clone());
        Ok(())
    }

    async fn count_messages(&self, user_id: &UserId) -> Result<u64, DomainError> {
        let tables = self.tables.read().await;
        Ok(tables
            .messages
            .iter()
            .filter(|m| &m.user_id == user_id)
            .count() as u64)
    }

    async fn published_jobs(&self, limit: usize) -> Result<Vec<JobPosting>, DomainError> {
        let tables = self.tables.read().await;
        let mut jobs: Vec<JobPosting> = tables
            .jobs
            .iter()
            .rev()
            .filter(|j| j.is_published())
            .cloned()
            .collect();
        jobs.sort_by(|a, b| b.created_at.cmp(&a.created_at));
        jobs.truncate(limit);
        Ok(jobs)
    }

    async fn record_job_view(&self, job_id: JobId) -> Result<(), DomainError> {
        let mut tables = self.tables.write().await;
        let job = tables
            .jobs
            .iter_mut()
            .find(|j| j.id == job_id)
            .ok_or_else(|| {
                DomainError::new(ErrorCode::JobNotFound, format!("Job {} not found", job_id))
            })?;
        job.views_count += 1;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::chat::{AiReplyStatus, JobStatus, SalaryRange};
    use crate::domain::foundation::Timestamp;

    fn profile() -> UserProfile {
        UserProfile::new(UserId::new("55").unwrap()).with_first_name("Lu")
    }

    fn job(title: &str, status: JobStatus) -> JobPosting {
        JobPosting {
            id: JobId::new(),
            title: title.to_string(),
            company: "Acme".to_string(),
            location: "Remote".to_string(),
            description: String::new(),
            salary: SalaryRange {
                min: None,
                max: None,
                currency: "USD".to_string(),
            },
            status,
            views_count: 0,
            created_at: Timestamp::now(),
        }
    }

    #[tokio::test]
    async fn user_is_created_once_and_refreshed() {
        let store = InMemoryChatStore::new();
        let created = store.get_or_create_user(&profile()).await.unwrap();
        assert_eq!(created.username, "no_username");

        let renamed = profile().with_username("lu_dev");
        let refreshed = store.get_or_create_user(&renamed).await.unwrap();

        assert_eq!(refreshed.username, "lu_dev");
        assert_eq!(refreshed.created_at, created.created_at);
    }

    #[tokio::test]
    async fn messages_are_counted_per_user() {
        let store = InMemoryChatStore::new();
        let uid = profile().user_id;
        store
            .record_message(NewMessage::incoming_text(uid.clone(), "hi", Some(1)))
            .await
            .unwrap();
        store
            .record_message(NewMessage::incoming_text(UserId::from(9), "yo", None))
            .await
            .unwrap();

        assert_eq!(store.count_messages(&uid).await.unwrap(), 1);
    }

    #[tokio::test]
    async fn ai_reply_requires_existing_message() {
        let store = InMemoryChatStore::new();
        let reply = AiReplyRecord {
            message_id: crate::domain::foundation::MessageId::new(),
            reply_text: "hello".into(),
            confidence_score: 0.7,
            model: "mock".into(),
            status: AiReplyStatus::Sent,
            created_at: Timestamp::now(),
        };

        let err = store.record_ai_reply(&reply).await.unwrap_err();
        assert_eq!(err.code, ErrorCode::MessageNotFound);
    }

    #[tokio::test]
    async fn only_published_jobs_are_listed() {
        let store = InMemoryChatStore::new();
        store.insert_job(job("Draft", JobStatus::Draft)).await;
        store.insert_job(job("Live", JobStatus::Published)).await;

        let jobs = store.published_jobs(5).await.unwrap();
        assert_eq!(jobs.len(), 1);
        assert_eq!(jobs[0].title, "Live");
    }

    #[tokio::test]
    async fn job_views_increment() {
        let store = InMemoryChatStore::new();
        let posting = job("Live", JobStatus::Published);
        let id = posting.id;
        store.insert_job(posting).await;

        store.record_job_view(id).await.unwrap();
        store.record_job_view(id).await.unwrap();

        assert_eq!(store.job_views(id).await, Some(2));
    }
}
