//! Mock AI Responder - Configurable mock for testing and offline runs.
//!
//! Replies are served from a FIFO queue; once it is exhausted the default
//! reply is returned.
//!
//! # Example
//!
//! ```ignore
//! let responder = MockAiResponder::new()
//!     .with_reply("Hello from mock!")
//!     .with_error(MockError::Unavailable { message: "down".into() });
//! ```

use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex, MutexGuard};
use std::time::Duration;
use tokio::time::sleep;

use crate::domain::foundation::UserId;
use crate::ports::{AIError, AiContext, AiReply, AiResponder};

/// Model name reported by the mock.
pub const MOCK_MODEL: &str = "mock-model";

const DEFAULT_REPLY: &str = "Mock reply";

/// Errors the mock can be told to return.
#[derive(Debug, Clone)]
pub enum MockError {
    RateLimited { retry_after_secs: u32 },
    ContentFiltered { reason: String },
    Unavailable { message: String },
    AuthenticationFailed,
    Timeout { timeout_secs: u32 },
}

impl From<MockError> for AIError {
    fn from(err: MockError) -> Self {
        match err {
            MockError::RateLimited { retry_after_secs } => AIError::RateLimited { retry_after_secs },
            MockError::ContentFiltered { reason } => AIError::ContentFiltered { reason },
            MockError::Unavailable { message } => AIError::Unavailable { message },
            MockError::AuthenticationFailed => AIError::AuthenticationFailed,
            MockError::Timeout { timeout_secs } => AIError::Timeout { timeout_secs },
        }
    }
}

/// A queued mock outcome.
#[derive(Debug, Clone)]
pub enum MockReply {
    Success { text: String, confidence_score: f32 },
    Error(MockError),
}

/// A recorded call.
#[derive(Debug, Clone, PartialEq)]
pub struct MockCall {
    pub text: String,
    pub user_id: UserId,
    pub job_titles: Vec<String>,
}

/// Queue-driven AiResponder.
#[derive(Clone)]
pub struct MockAiResponder {
    replies: Arc<Mutex<VecDeque<MockReply>>>,
    calls: Arc<Mutex<Vec<MockCall>>>,
    delay: Duration,
}

impl Default for MockAiResponder {
    fn default() -> Self {
        Self::new()
    }
}

impl MockAiResponder {
    pub fn new() -> Self {
        Self {
            replies: Arc::new(Mutex::new(VecDeque::new())),
            calls: Arc::new(Mutex::new(Vec::new())),
            delay: Duration::ZERO,
        }
    }

    /// Queues a successful reply with the default confidence.
    pub fn with_reply(self, text: impl Into<String>) -> Self {
        self.push(MockReply::Success {
            text: text.into(),
            confidence_score: 0.7,
        });
        self
    }

    pub fn with_error(self, error: MockError) -> Self {
        self.push(MockReply::Error(error));
        self
    }

    /// Adds latency to every call.
    pub fn with_delay(mut self, delay: Duration) -> Self {
        self.delay = delay;
        self
    }

    /// Queues a reply on a shared handle.
    pub fn push(&self, reply: MockReply) {
        lock(&self.replies).push_back(reply);
    }

    pub fn call_count(&self) -> usize {
        lock(&self.calls).len()
    }

    pub fn calls(&self) -> Vec<MockCall> {
        lock(&self.calls).clone()
    }

    fn next_reply(&self) -> MockReply {
        lock(&self.replies)
            .pop_front()
            .unwrap_or_else(|| MockReply::Success {
                text: DEFAULT_REPLY.to_string(),
                confidence_score: 0.7,
            })
    }
}

fn lock<T>(mutex: &Mutex<T>) -> MutexGuard<'_, T> {
    mutex.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
}

#[async_trait]
impl AiResponder for MockAiResponder {
    async fn respond(
        &self,
        text: &str,
        user_id: &UserId,
        context: &AiContext,
    ) -> Result<AiReply, AIError> {
        lock(&self.calls).push(MockCall {
            text: text.to_string(),
            user_id: user_id.clone(),
            job_titles: context
                .available_jobs
                .iter()
                .map(|job| job.title.clone())
                .collect(),
        });

        if !self.delay.is_zero() {
            sleep(self.delay).await;
        }

        match self.next_reply() {
            MockReply::Success {
                text,
                confidence_score,
            } => Ok(AiReply::new(text, confidence_score, MOCK_MODEL)),
            MockReply::Error(err) => Err(err.into()),
        }
    }

    fn model_name(&self) -> &str {
        MOCK_MODEL
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn user() -> UserId {
        UserId::from(7)
    }

    #[tokio::test]
    async fn returns_replies_in_order_then_default() {
        let responder = MockAiResponder::new().with_reply("First").with_reply("Second");
        let ctx = AiContext::default();

        let r1 = responder.respond("a", &user(), &ctx).await.unwrap();
        let r2 = responder.respond("b", &user(), &ctx).await.unwrap();
        let r3 = responder.respond("c", &user(), &ctx).await.unwrap();

        assert_eq!(r1.text, "First");
        assert_eq!(r2.text, "Second");
        assert_eq!(r3.text, DEFAULT_REPLY);
        assert_eq!(r1.model, MOCK_MODEL);
    }

    #[tokio::test]
    async fn returns_configured_error() {
        let responder =
            MockAiResponder::new().with_error(MockError::RateLimited { retry_after_secs: 30 });

        let err = responder
            .respond("hi", &user(), &AiContext::default())
            .await
            .unwrap_err();

        assert!(matches!(err, AIError::RateLimited { retry_after_secs: 30 }));
    }

    #[tokio::test]
    async fn tracks_calls_with_context() {
        use crate::domain::chat::{JobPosting, JobStatus, SalaryRange};
        use crate::domain::foundation::{JobId, Timestamp};

        let responder = MockAiResponder::new();
        let ctx = AiContext::with_jobs(vec![JobPosting {
            id: JobId::new(),
            title: "Data Engineer".into(),
            company: "Acme".into(),
            location: "Lima".into(),
            description: String::new(),
            salary: SalaryRange {
                min: None,
                max: None,
                currency: "USD".into(),
            },
            status: JobStatus::Published,
            views_count: 0,
            created_at: Timestamp::now(),
        }]);

        responder.respond("jobs?", &user(), &ctx).await.unwrap();

        assert_eq!(responder.call_count(), 1);
        let call = &responder.calls()[0];
        assert_eq!(call.text, "jobs?");
        assert_eq!(call.job_titles, vec!["Data Engineer".to_string()]);
    }

    #[tokio::test]
    async fn clones_share_the_queue() {
        let responder = MockAiResponder::new();
        let handle = responder.clone();
        handle.push(MockReply::Success {
            text: "shared".into(),
            confidence_score: 0.9,
        });

        let reply = responder
            .respond("x", &user(), &AiContext::default())
            .await
            .unwrap();
        assert_eq!(reply.text, "shared");
        assert_eq!(reply.confidence_score, 0.9);
    }

    #[tokio::test]
    async fn respects_delay() {
        let responder = MockAiResponder::new().with_delay(Duration::from_millis(30));

        let start = std::time::Instant::now();
        responder
            .respond("x", &user(), &AiContext::default())
            .await
            .unwrap();

        assert!(start.elapsed() >= Duration::from_millis(30));
    }

    #[test]
    fn mock_error_converts_to_ai_error() {
        let err: AIError = MockError::AuthenticationFailed.into();
        assert!(matches!(err, AIError::AuthenticationFailed));

        let err: AIError = MockError::Timeout { timeout_secs: 5 }.into();
        assert!(matches!(err, AIError::Timeout { timeout_secs: 5 }));
    }
}
