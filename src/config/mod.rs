//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `RECRUITMENT_BOT` prefix and nested values use double underscores as separators.
//!
//! # Example
//!
//! ```no_run
//! use recruitment_bot::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Polling {}", config.telegram.api_base_url);
//! ```

mod ai;
mod database;
mod error;
mod redis;
mod runtime;
mod storage;
mod telegram;

pub use ai::{AiConfig, AiProvider};
pub use database::DatabaseConfig;
pub use error::{ConfigError, ValidationError};
pub use redis::RedisConfig;
pub use runtime::{Environment, RuntimeConfig};
pub use storage::{SessionBackend, SessionConfig, StorageBackend, StorageConfig};
pub use telegram::TelegramConfig;

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
/// `database` and `redis` are only required by the backends that use them.
#[derive(Debug, Clone, Deserialize)]
pub struct AppConfig {
    /// Runtime configuration (environment, logging, concurrency)
    #[serde(default)]
    pub runtime: RuntimeConfig,

    /// Telegram Bot API configuration
    pub telegram: TelegramConfig,

    /// AI responder configuration (Gemini or mock)
    #[serde(default)]
    pub ai: AiConfig,

    /// Storage backend selection
    #[serde(default)]
    pub storage: StorageConfig,

    /// Database configuration (PostgreSQL connection)
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Session backend selection
    #[serde(default)]
    pub session: SessionConfig,

    /// Redis configuration (session cache)
    #[serde(default)]
    pub redis: RedisConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `RECRUITMENT_BOT` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `RECRUITMENT_BOT__TELEGRAM__BOT_TOKEN=...` -> `telegram.bot_token = ...`
    /// - `RECRUITMENT_BOT__STORAGE__BACKEND=memory` -> `storage.backend = memory`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if:
    /// - Required environment variables are missing
    /// - Values cannot be parsed into expected types
    pub fn load() -> Result<Self, ConfigError> {
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("RECRUITMENT_BOT")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// Sections are checked on their own, then `database` and `redis` are
    /// checked only when the selected backends need them.
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.runtime.validate()?;
        self.telegram.validate()?;
        self.ai.validate(&self.runtime.environment)?;
        self.storage.validate()?;
        self.session.validate()?;

        if self.storage.backend == StorageBackend::Postgres {
            self.database.validate()?;
        }
        if self.session.backend == SessionBackend::Redis {
            self.redis.validate()?;
        }
        Ok(())
    }

    /// Check if running in production environment
    pub fn is_production(&self) -> bool {
        self.runtime.is_production()
    }
}
