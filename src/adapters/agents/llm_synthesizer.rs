//! Synthesizer backed by an LLM completion.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::clarification::FinalOutput;
use crate::ports::{
    AIProvider, CompletionRequest, GenerationError, MessageRole, SynthesisRequest, Synthesizer,
};

use super::support::{parse_reply, reply_content, AgentSettings};

const SYSTEM_PROMPT: &str = r#"You turn a finished clarification conversation into an actionable plan.

You receive JSON with the user's original_input, the conversation_history and
the final_understanding. Reply with a single JSON object:
{
  "final_summary": "...",
  "action_items": [
    {"action": "...", "priority": "high|medium|low", "effort": "minimal|moderate|significant"}
  ],
  "tips": ["..."],
  "insights": ["..."],
  "next_steps": "...",
  "encouragement": "..."
}

action_items must contain at least one item."#;

/// Asks the model for the final report.
pub struct LlmSynthesizer {
    ai_provider: Arc<dyn AIProvider>,
    settings: AgentSettings,
}

impl LlmSynthesizer {
    pub fn new(ai_provider: Arc<dyn AIProvider>, settings: AgentSettings) -> Self {
        Self {
            ai_provider,
            settings,
        }
    }
}

#[async_trait]
impl Synthesizer for LlmSynthesizer {
    async fn synthesize(&self, request: SynthesisRequest) -> Result<FinalOutput, GenerationError> {
        let session_id = request.session_id;
        let user_message = serde_json::to_string_pretty(&request)
            .map_err(|e| GenerationError::provider(format!("failed to encode request: {}", e)))?;

        let mut completion = CompletionRequest::new()
            .with_system_prompt(SYSTEM_PROMPT)
            .with_message(MessageRole::User, user_message)
            .with_temperature(self.settings.temperature)
            .with_session(session_id);
        if let Some(max) = self.settings.max_tokens {
            completion = completion.with_max_tokens(max);
        }

        let start = Instant::now();
        let response = self.ai_provider.complete(completion).await?;
        tracing::debug!(
            session_id = %session_id,
            model = %response.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            total_tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "Synthesizer reply received"
        );

        let output: FinalOutput = parse_reply(reply_content(&response)?)?;
        output
            .validate()
            .map_err(|e| GenerationError::invalid_output(e.to_string()))?;
        Ok(output)
    }
}
