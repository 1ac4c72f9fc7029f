//! ChatRepository port for users, the message audit log, and job postings.

use async_trait::async_trait;

use crate::domain::chat::{AiReplyRecord, ChatUser, JobPosting, MessageRecord, NewMessage, UserProfile};
use crate::domain::foundation::{DomainError, JobId, UserId};

/// Repository backing the free-chat side of the bot.
#[async_trait]
pub trait ChatRepository: Send + Sync {
    /// Upserts the user: creates it with profile defaults, or refreshes the
    /// stored names when the profile changed.
    async fn get_or_create_user(&self, profile: &UserProfile) -> Result<ChatUser, DomainError>;

    async fn record_message(&self, message: NewMessage) -> Result<MessageRecord, DomainError>;

    async fn record_ai_reply(&self, reply: &AiReplyRecord) -> Result<(), DomainError>;

    /// Number of audit-log messages stored for a user.
    async fn count_messages(&self, user_id: &UserId) -> Result<u64, DomainError>;

    /// Published jobs, newest first, at most `limit`.
    async fn published_jobs(&self, limit: usize) -> Result<Vec<JobPosting>, DomainError>;

    /// Increments the view counter of a job.
    async fn record_job_view(&self, job_id: JobId) -> Result<(), DomainError>;
}
