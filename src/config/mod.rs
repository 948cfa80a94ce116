//! Application configuration module
//!
//! This module provides type-safe configuration loading from environment variables
//! using the `config` and `dotenvy` crates. Configuration is loaded with the
//! `IDEA_CLARIFIER` prefix and nested values use double underscores as separators.
//! Every value has a default, so an empty environment yields a working setup.
//!
//! # Example
//!
//! ```no_run
//! use idea_clarifier::config::AppConfig;
//!
//! let config = AppConfig::load().expect("Failed to load configuration");
//! config.validate().expect("Invalid configuration");
//!
//! println!("Up to {} rounds per session", config.session.max_rounds);
//! ```

mod ai;
mod error;
mod logging;
mod session;
mod storage;

pub use ai::AiConfig;
pub use error::{ConfigError, ValidationError};
pub use logging::LoggingConfig;
pub use session::{SessionConfig, MAX_ROUNDS_LIMIT};
pub use storage::{StorageBackend, StorageConfig};

use serde::Deserialize;

/// Root application configuration
///
/// Load using [`AppConfig::load()`] which reads from environment variables.
#[derive(Debug, Clone, Default, Deserialize, PartialEq)]
pub struct AppConfig {
    /// Round limit and input constraints
    #[serde(default)]
    pub session: SessionConfig,

    /// Agent call settings (timeout, sampling)
    #[serde(default)]
    pub ai: AiConfig,

    /// Log level and format
    #[serde(default)]
    pub logging: LoggingConfig,

    /// Session storage backend
    #[serde(default)]
    pub storage: StorageConfig,
}

impl AppConfig {
    /// Load configuration from environment variables
    ///
    /// This function:
    /// 1. Loads `.env` file if present (for development)
    /// 2. Reads environment variables with `IDEA_CLARIFIER` prefix
    /// 3. Uses `__` (double underscore) to separate nested values
    /// 4. Deserializes into typed configuration structs
    ///
    /// # Environment Variable Format
    ///
    /// - `IDEA_CLARIFIER__SESSION__MAX_ROUNDS=4` -> `session.max_rounds = 4`
    /// - `IDEA_CLARIFIER__STORAGE__BACKEND=file` -> `storage.backend = File`
    ///
    /// # Errors
    ///
    /// Returns `ConfigError` if values cannot be parsed into expected types.
    pub fn load() -> Result<Self, ConfigError> {
        // Load .env file if present (development)
        dotenvy::dotenv().ok();

        let config = config::Config::builder()
            .add_source(
                config::Environment::default()
                    .prefix("IDEA_CLARIFIER")
                    .prefix_separator("__")
                    .separator("__"),
            )
            .build()?
            .try_deserialize()?;

        Ok(config)
    }

    /// Load and validate in one step.
    pub fn load_validated() -> Result<Self, ConfigError> {
        let config = Self::load()?;
        config.validate()?;
        Ok(config)
    }

    /// Validate all configuration values
    ///
    /// # Errors
    ///
    /// Returns `ValidationError` if any configuration value is invalid.
    pub fn validate(&self) -> Result<(), ValidationError> {
        self.session.validate()?;
        self.ai.validate()?;
        self.logging.validate()?;
        self.storage.validate()?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::env;
    use std::path::PathBuf;
    use std::sync::Mutex;

    // Mutex to ensure tests don't run in parallel (env vars are global)
    static ENV_MUTEX: Mutex<()> = Mutex::new(());

    const VARS: [&str; 6] = [
        "IDEA_CLARIFIER__SESSION__MAX_ROUNDS",
        "IDEA_CLARIFIER__AI__TIMEOUT_SECS",
        "IDEA_CLARIFIER__AI__TEMPERATURE",
        "IDEA_CLARIFIER__LOGGING__JSON",
        "IDEA_CLARIFIER__STORAGE__BACKEND",
        "IDEA_CLARIFIER__STORAGE__DATA_DIR",
    ];

    /// Helper to clear environment variables after testing
    fn clear_env() {
        for var in VARS {
            env::remove_var(var);
        }
    }

    #[test]
    fn test_load_defaults_from_empty_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        clear_env();
        let result = AppConfig::load();

        assert!(result.is_ok(), "Failed to load config: {:?}", result.err());
        let config = result.unwrap();
        assert_eq!(config.session.max_rounds, 5);
        assert_eq!(config.ai.timeout_secs, 120);
        assert_eq!(config.storage.backend, StorageBackend::Memory);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_load_overrides_from_environment() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("IDEA_CLARIFIER__SESSION__MAX_ROUNDS", "3");
        env::set_var("IDEA_CLARIFIER__AI__TIMEOUT_SECS", "30");
        env::set_var("IDEA_CLARIFIER__AI__TEMPERATURE", "0.2");
        env::set_var("IDEA_CLARIFIER__LOGGING__JSON", "true");
        env::set_var("IDEA_CLARIFIER__STORAGE__BACKEND", "file");
        env::set_var("IDEA_CLARIFIER__STORAGE__DATA_DIR", "/tmp/sessions");
        let result = AppConfig::load();
        clear_env();

        let config = result.unwrap();
        assert_eq!(config.session.max_rounds, 3);
        assert_eq!(config.ai.timeout_secs, 30);
        assert!((config.ai.temperature - 0.2).abs() < f32::EPSILON);
        assert!(config.logging.json);
        assert_eq!(config.storage.backend, StorageBackend::File);
        assert_eq!(config.storage.data_dir, PathBuf::from("/tmp/sessions"));
    }

    #[test]
    fn test_out_of_range_rounds_fail_validation() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("IDEA_CLARIFIER__SESSION__MAX_ROUNDS", "11");
        let result = AppConfig::load_validated();
        clear_env();

        assert!(matches!(
            result,
            Err(ConfigError::ValidationFailed(ValidationError::MaxRoundsOutOfRange(11)))
        ));
    }

    #[test]
    fn test_unparseable_value_fails_loading() {
        let _guard = ENV_MUTEX.lock().unwrap();
        env::set_var("IDEA_CLARIFIER__AI__TIMEOUT_SECS", "soon");
        let result = AppConfig::load();
        clear_env();

        assert!(matches!(result, Err(ConfigError::LoadError(_))));
    }
}
