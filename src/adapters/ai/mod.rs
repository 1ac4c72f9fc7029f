//! AI Responder Adapters.
//!
//! Implementations of the AiResponder port.
//!
//! ## Available Adapters
//!
//! - `GeminiResponder` - Google Gemini `generateContent` API
//! - `MockAiResponder` - Configurable queue-driven mock for tests and offline runs

mod gemini_responder;
mod mock_responder;

pub use gemini_responder::{
    build_prompt, confidence_for, GeminiConfig, GeminiResponder, DEFAULT_GEMINI_BASE_URL,
    DEFAULT_GEMINI_MODEL,
};
pub use mock_responder::{MockAiResponder, MockCall, MockError, MockReply, MOCK_MODEL};
