//! Configuration error types

use thiserror::Error;

/// Errors that can occur during configuration loading
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Configuration loading failed: {0}")]
    LoadError(#[from] config::ConfigError),

    #[error("Validation failed: {0}")]
    ValidationFailed(#[from] ValidationError),
}

/// Errors that can occur during configuration validation
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("Invalid request timeout")]
    InvalidTimeout,

    #[error("Long-poll timeout must be between 1 and 50 seconds")]
    InvalidPollTimeout,

    #[error("max_concurrent_updates must be between 1 and 1024")]
    InvalidConcurrency,

    #[error("Invalid API base URL: {0}")]
    InvalidApiBaseUrl(&'static str),

    #[error("Invalid database URL format")]
    InvalidDatabaseUrl,

    #[error("Invalid Redis URL format")]
    InvalidRedisUrl,

    #[error("Redis key prefix must be non-empty and not end with ':'")]
    InvalidKeyPrefix,

    #[error("Pool min_connections exceeds max_connections")]
    InvalidPoolSize,

    #[error("Pool size exceeds maximum allowed (100)")]
    PoolSizeTooLarge,

    #[error("Session TTL must be positive")]
    InvalidSessionTtl,

    #[error("Mock AI provider is not allowed in production")]
    MockProviderInProduction,

    #[error("Seed file is only supported with the memory storage backend")]
    SeedFileWithoutMemoryStorage,
}
