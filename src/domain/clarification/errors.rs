//! Errors surfaced by clarification operations.

use crate::domain::foundation::{DomainError, ErrorCode, SessionId};
use crate::ports::GenerationError;

/// Caller-facing error for every clarification operation.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ClarificationError {
    /// The original input was empty or too long.
    #[error("invalid input: {0}")]
    InvalidInput(String),

    /// Submitted selections do not match the pending round.
    #[error("validation failed for '{field}': {message}")]
    Validation { field: String, message: String },

    /// The operation is not allowed in the session's current phase.
    #[error("invalid state: {0}")]
    InvalidState(String),

    #[error("session not found: {0}")]
    SessionNotFound(SessionId),

    /// A Generator or Synthesizer call failed or timed out.
    #[error("generation failed: {0}")]
    GenerationFailed(#[from] GenerationError),

    #[error("storage error: {0}")]
    Storage(String),
}

impl ClarificationError {
    pub fn invalid_state(message: impl Into<String>) -> Self {
        ClarificationError::InvalidState(message.into())
    }

    pub fn validation(field: impl Into<String>, message: impl Into<String>) -> Self {
        ClarificationError::Validation {
            field: field.into(),
            message: message.into(),
        }
    }

    pub fn storage(message: impl Into<String>) -> Self {
        ClarificationError::Storage(message.into())
    }

    pub fn code(&self) -> ErrorCode {
        match self {
            ClarificationError::InvalidInput(_) => ErrorCode::InvalidInput,
            ClarificationError::Validation { .. } => ErrorCode::ValidationFailed,
            ClarificationError::InvalidState(_) => ErrorCode::InvalidStateTransition,
            ClarificationError::SessionNotFound(_) => ErrorCode::SessionNotFound,
            ClarificationError::GenerationFailed(GenerationError::Timeout { .. }) => {
                ErrorCode::GenerationTimeout
            }
            ClarificationError::GenerationFailed(_) => ErrorCode::GenerationFailed,
            ClarificationError::Storage(_) => ErrorCode::StorageError,
        }
    }

    /// Returns true if retrying the same call may succeed.
    pub fn is_retryable(&self) -> bool {
        match self {
            ClarificationError::GenerationFailed(e) => e.is_retryable(),
            ClarificationError::Storage(_) => true,
            _ => false,
        }
    }
}

impl From<DomainError> for ClarificationError {
    fn from(err: DomainError) -> Self {
        match err.code {
            ErrorCode::InvalidInput => ClarificationError::InvalidInput(err.message),
            ErrorCode::ValidationFailed => ClarificationError::Validation {
                field: err.field().unwrap_or("unknown").to_string(),
                message: err.message,
            },
            ErrorCode::InvalidStateTransition | ErrorCode::SessionCompleted => {
                ClarificationError::InvalidState(err.message)
            }
            ErrorCode::GenerationFailed => {
                ClarificationError::GenerationFailed(GenerationError::InvalidOutput(err.message))
            }
            ErrorCode::GenerationTimeout => {
                let timeout_ms = err
                    .details
                    .get("timeout_ms")
                    .and_then(|v| v.parse().ok())
                    .unwrap_or(0);
                ClarificationError::GenerationFailed(GenerationError::Timeout { timeout_ms })
            }
            ErrorCode::SessionNotFound | ErrorCode::StorageError | ErrorCode::InternalError => {
                ClarificationError::Storage(err.to_string())
            }
        }
    }
}
