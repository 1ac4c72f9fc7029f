//! In-memory adapters for tests and memory-backed runs.

mod chat_store;
mod recording_transport;
mod seed;
mod session_store;
mod survey_store;

pub use chat_store::InMemoryChatStore;
pub use recording_transport::{RecordingTransport, SentMessage};
pub use seed::{SeedData, SeedError, SeedSummary};
pub use session_store::InMemorySessionStore;
pub use survey_store::InMemorySurveyStore;
