//! Session protocol configuration

use serde::Deserialize;

use super::error::ValidationError;
use crate::domain::clarification::{DEFAULT_MAX_INPUT_LENGTH, DEFAULT_MAX_ROUNDS};

/// Upper bound accepted for `max_rounds`.
pub const MAX_ROUNDS_LIMIT: u32 = 10;

/// Round limit and input constraints
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct SessionConfig {
    /// Rounds after which the judge always concludes
    #[serde(default = "default_max_rounds")]
    pub max_rounds: u32,

    /// Maximum characters accepted as the original input
    #[serde(default = "default_max_input_length")]
    pub max_input_length: usize,
}

impl SessionConfig {
    pub fn validate(&self) -> Result<(), ValidationError> {
        if !(1..=MAX_ROUNDS_LIMIT).contains(&self.max_rounds) {
            return Err(ValidationError::MaxRoundsOutOfRange(self.max_rounds));
        }
        if self.max_input_length == 0 {
            return Err(ValidationError::InvalidMaxInputLength);
        }
        Ok(())
    }
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_rounds: default_max_rounds(),
            max_input_length: default_max_input_length(),
        }
    }
}

fn default_max_rounds() -> u32 {
    DEFAULT_MAX_ROUNDS
}

fn default_max_input_length() -> usize {
    DEFAULT_MAX_INPUT_LENGTH
}
