//! Agent call configuration

use serde::Deserialize;
use std::time::Duration;

use super::error::ValidationError;

/// Sampling and timeout settings for Generator and Synthesizer calls
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct AiConfig {
    /// Timeout per collaborator call in seconds
    #[serde(default = "default_timeout")]
    pub timeout_secs: u64,

    /// Sampling temperature
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Maximum tokens per reply; provider default when unset
    pub max_tokens: Option<u32>,

    /// Questions the generator is asked to produce per round
    #[serde(default = "default_questions_per_round")]
    pub questions_per_round: u32,

    /// Options the generator is asked to offer per question
    #[serde(default = "default_options_per_question")]
    pub options_per_question: u32,
}

impl AiConfig {
    /// Get timeout as Duration
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(self.timeout_secs)
    }

    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.timeout_secs == 0 {
            return Err(ValidationError::InvalidTimeout);
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ValidationError::TemperatureOutOfRange(self.temperature));
        }
        if self.max_tokens == Some(0) {
            return Err(ValidationError::InvalidMaxTokens);
        }
        Ok(())
    }
}

impl Default for AiConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_timeout(),
            temperature: default_temperature(),
            max_tokens: None,
            questions_per_round: default_questions_per_round(),
            options_per_question: default_options_per_question(),
        }
    }
}

fn default_timeout() -> u64 {
    120
}

fn default_temperature() -> f32 {
    0.7
}

fn default_questions_per_round() -> u32 {
    3
}

fn default_options_per_question() -> u32 {
    4
}
