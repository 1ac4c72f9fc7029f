//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the domain and the outside world. Adapters implement these ports.
//!
//! ## Storage Ports
//!
//! - `SurveyReader` - Read-only survey catalog
//! - `SurveyResponseRepository` - Responses and answers
//! - `ChatRepository` - Users, message audit log, job postings
//! - `SessionStore` - Per-user transient conversation state
//!
//! ## External Service Ports
//!
//! - `AiResponder` - Generative-AI free-chat replies
//! - `MessageTransport` - Outbound chat delivery

mod ai_responder;
mod chat_repository;
mod message_transport;
mod session_store;
mod survey_reader;
mod survey_response_repository;

pub use ai_responder::{AIError, AiContext, AiReply, AiResponder};
pub use chat_repository::ChatRepository;
pub use message_transport::{MessageTransport, TextFormat, TransportError};
pub use session_store::{SessionStore, SessionStoreError};
pub use survey_reader::SurveyReader;
pub use survey_response_repository::{AnswerInsert, SurveyResponseRepository};
