//! Storage backend selection

use serde::Deserialize;
use std::path::PathBuf;

use super::error::ValidationError;

/// Where surveys, responses, users and jobs are stored
#[derive(Debug, Clone, Deserialize, Default)]
pub struct StorageConfig {
    #[serde(default)]
    pub backend: StorageBackend,

    /// YAML file of surveys and jobs loaded into the memory backend at startup
    pub seed_file: Option<PathBuf>,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum StorageBackend {
    #[default]
    Postgres,
    Memory,
}

impl StorageConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.seed_file.is_some() && self.backend != StorageBackend::Memory {
            return Err(ValidationError::SeedFileWithoutMemoryStorage);
        }
        Ok(())
    }
}

/// Where per-user conversation sessions live
#[derive(Debug, Clone, Deserialize)]
pub struct SessionConfig {
    #[serde(default)]
    pub backend: SessionBackend,

    /// Lifetime of an untouched session in seconds (Redis backend)
    #[serde(default = "default_ttl")]
    pub ttl_secs: u64,
}

#[derive(Debug, Clone, Copy, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum SessionBackend {
    #[default]
    Memory,
    Redis,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.ttl_secs == 0 {
            return Err(ValidationError::InvalidSessionTtl);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            backend: SessionBackend::default(),
            ttl_secs: default_ttl(),
        }
    }
}

fn default_ttl() -> u64 {
    86_400
}
