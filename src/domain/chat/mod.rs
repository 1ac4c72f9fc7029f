//! Chat domain module.
//!
//! Users, the message audit log, and job postings surfaced to users.

mod job;
mod message;
mod user;

pub use job::{JobPosting, JobStatus, SalaryRange, DESCRIPTION_PREVIEW_CHARS};
pub use message::{
    AiReplyRecord, AiReplyStatus, InboundText, MessageDirection, MessageKind, MessageRecord,
    NewMessage,
};
pub use user::{ChatUser, UserProfile, DEFAULT_FIRST_NAME, DEFAULT_USERNAME};
