//! Synthesizer Port - turns a finished conversation into the final report.

use async_trait::async_trait;
use serde::Serialize;

use crate::domain::clarification::{FinalOutput, HistoryEntry, Understanding};
use crate::domain::foundation::SessionId;

use super::generator::GenerationError;

/// Input for the synthesis call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SynthesisRequest {
    #[serde(skip)]
    pub session_id: SessionId,
    pub original_input: String,
    pub conversation_history: Vec<HistoryEntry>,
    pub final_understanding: Understanding,
}

/// Port for final synthesis.
///
/// The returned output must contain at least one action item.
#[async_trait]
pub trait Synthesizer: Send + Sync {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<FinalOutput, GenerationError>;
}
