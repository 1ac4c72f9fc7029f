//! Runtime configuration

use serde::Deserialize;

use super::error::ValidationError;

/// Process-wide runtime settings
#[derive(Debug, Clone, Deserialize)]
pub struct RuntimeConfig {
    /// Environment name
    #[serde(default = "default_environment")]
    pub environment: Environment,

    /// Rust log filter directive
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Updates processed at the same time across all users
    #[serde(default = "default_max_concurrent_updates")]
    pub max_concurrent_updates: usize,
}

/// Application environment
#[derive(Debug, Clone, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum Environment {
    #[default]
    Development,
    Staging,
    Production,
}

impl RuntimeConfig {
    /// Check if running in production
    pub fn is_production(&self) -> bool {
        self.environment == Environment::Production
    }

    /// Validate runtime configuration
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.max_concurrent_updates == 0 || self.max_concurrent_updates > 1024 {
            return Err(ValidationError::InvalidConcurrency);
        }
        Ok(())
    }
}

impl Default for RuntimeConfig {
    fn default() -> Self {
        Self {
            environment: default_environment(),
            log_level: default_log_level(),
            max_concurrent_updates: default_max_concurrent_updates(),
        }
    }
}

fn default_environment() -> Environment {
    Environment::Development
}

fn default_log_level() -> String {
    "info,recruitment_bot=debug,sqlx=warn".to_string()
}

fn default_max_concurrent_updates() -> usize {
    64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_runtime_config_defaults() {
        let config = RuntimeConfig::default();
        assert_eq!(config.environment, Environment::Development);
        assert_eq!(config.max_concurrent_updates, 64);
        assert!(config.log_level.contains("recruitment_bot=debug"));
    }

    #[test]
    fn test_is_production() {
        let mut config = RuntimeConfig::default();
        assert!(!config.is_production());

        config.environment = Environment::Production;
        assert!(config.is_production());
    }

    #[test]
    fn test_validation_concurrency_bounds() {
        let config = RuntimeConfig {
            max_concurrent_updates: 0,
            ..Default::default()
        };
        assert_eq!(config.validate(), Err(ValidationError::InvalidConcurrency));

        let config = RuntimeConfig {
            max_concurrent_updates: 5000,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        assert!(RuntimeConfig::default().validate().is_ok());
    }
}
