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
#[derive(Debug, Error, PartialEq)]
pub enum ValidationError {
    #[error("Required configuration missing: {0}")]
    MissingRequired(&'static str),

    #[error("max_rounds must be between 1 and 10, got {0}")]
    MaxRoundsOutOfRange(u32),

    #[error("max_input_length must be greater than zero")]
    InvalidMaxInputLength,

    #[error("Invalid AI request timeout")]
    InvalidTimeout,

    #[error("temperature must be between 0.0 and 2.0, got {0}")]
    TemperatureOutOfRange(f32),

    #[error("max_tokens must be greater than zero")]
    InvalidMaxTokens,

    #[error("Unknown log level: {0}")]
    InvalidLogLevel(String),
}
