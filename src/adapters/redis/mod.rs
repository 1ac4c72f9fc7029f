//! Redis adapters.

mod session_store;

pub use session_store::{RedisSessionStore, DEFAULT_KEY_PREFIX};
