//! Generator Port - produces the questions and understanding for one round.
//!
//! The generator is the "intelligent" step of the conversation. The core only
//! relies on the shape of its output, never on how it was produced.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::clarification::{HistoryEntry, RoundDraft};
use crate::domain::foundation::SessionId;

use super::ai_provider::AIError;

/// Input for one generator call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationRequest {
    #[serde(skip)]
    pub session_id: SessionId,
    pub original_input: String,
    pub conversation_history: Vec<HistoryEntry>,
    pub current_round: u32,
}

/// Port for per-round question generation.
///
/// Implementations must return at least one question, each with at least one
/// option, unless `should_conclude` is set. The orchestrator rejects drafts
/// that break this.
#[async_trait]
pub trait Generator: Send + Sync {
    async fn generate(&self, request: GenerationRequest) -> Result<RoundDraft, GenerationError>;
}

/// Failure of a Generator or Synthesizer call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum GenerationError {
    /// The call did not finish within the configured timeout.
    #[error("collaborator call timed out after {timeout_ms}ms")]
    Timeout { timeout_ms: u64 },

    /// The collaborator or its backend reported a transient error.
    #[error("collaborator call failed: {0}")]
    Provider(String),

    /// The backend refused the call; repeating it will not help.
    #[error("collaborator call rejected: {0}")]
    Rejected(String),

    /// The collaborator answered, but the answer broke its contract.
    #[error("collaborator returned invalid output: {0}")]
    InvalidOutput(String),
}

impl GenerationError {
    pub fn provider(message: impl Into<String>) -> Self {
        GenerationError::Provider(message.into())
    }

    pub fn invalid_output(message: impl Into<String>) -> Self {
        GenerationError::InvalidOutput(message.into())
    }

    pub fn rejected(message: impl Into<String>) -> Self {
        GenerationError::Rejected(message.into())
    }

    pub fn is_timeout(&self) -> bool {
        matches!(self, GenerationError::Timeout { .. })
    }

    /// Returns true if repeating the call may succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, GenerationError::Timeout { .. } | GenerationError::Provider(_))
    }
}

impl From<AIError> for GenerationError {
    fn from(err: AIError) -> Self {
        match err {
            AIError::Timeout { timeout_secs } => GenerationError::Timeout {
                timeout_ms: timeout_secs.saturating_mul(1000),
            },
            AIError::Parse(msg) => GenerationError::InvalidOutput(msg),
            other if other.is_retryable() => GenerationError::Provider(other.to_string()),
            other => GenerationError::Rejected(other.to_string()),
        }
    }
}
