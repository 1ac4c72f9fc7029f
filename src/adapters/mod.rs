//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the domain to external systems:
//! - `ai` - Generative-AI responders (Gemini, mock)
//! - `memory` - In-memory storage, session store and recording transport
//! - `postgres` - PostgreSQL repositories
//! - `redis` - Redis session store
//! - `telegram` - Telegram Bot API transport and update polling

pub mod ai;
pub mod memory;
pub mod postgres;
pub mod redis;
pub mod telegram;
