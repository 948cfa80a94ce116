//! Generator backed by an LLM completion.

use async_trait::async_trait;
use std::sync::Arc;
use std::time::Instant;

use crate::domain::clarification::RoundDraft;
use crate::ports::{
    AIProvider, CompletionRequest, GenerationError, GenerationRequest, Generator, MessageRole,
};

use super::support::{parse_reply, reply_content, AgentSettings};

/// Asks the model for the next round's understanding and questions.
pub struct LlmGenerator {
    ai_provider: Arc<dyn AIProvider>,
    settings: AgentSettings,
}

impl LlmGenerator {
    pub fn new(ai_provider: Arc<dyn AIProvider>, settings: AgentSettings) -> Self {
        Self {
            ai_provider,
            settings,
        }
    }

    fn system_prompt(&self) -> String {
        format!(
            r#"You help a user clarify a vague idea through multiple-choice questions.

You receive JSON with the user's original_input, the conversation_history of
previous rounds (questions asked and what the user selected) and current_round
(at most {max_rounds} rounds in total).

Reply with a single JSON object:
{{
  "understanding": {{
    "main_themes": ["..."],
    "user_intent": "...",
    "clarified_points": ["..."],
    "remaining_uncertainties": ["..."]
  }},
  "summary": "one paragraph on what you understand so far",
  "selections": [
    {{"question": "...", "options": ["...", "..."], "allow_other": true}}
  ],
  "should_conclude": false,
  "conclusion_reason": null
}}

Ask about {questions} questions with about {options} options each.
Set should_conclude to true, with a reason, once the intent is clear and
actionable; selections may then be empty."#,
            max_rounds = self.settings.max_rounds,
            questions = self.settings.questions_per_round,
            options = self.settings.options_per_question,
        )
    }
}

#[async_trait]
impl Generator for LlmGenerator {
    async fn generate(&self, request: GenerationRequest) -> Result<RoundDraft, GenerationError> {
        let session_id = request.session_id;
        let round = request.current_round;
        let user_message = serde_json::to_string_pretty(&request)
            .map_err(|e| GenerationError::provider(format!("failed to encode request: {}", e)))?;

        let mut completion = CompletionRequest::new()
            .with_system_prompt(self.system_prompt())
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
            round,
            model = %response.model,
            elapsed_ms = start.elapsed().as_millis() as u64,
            total_tokens = response.usage.total_tokens,
            finish_reason = ?response.finish_reason,
            "Generator reply received"
        );

        parse_reply(reply_content(&response)?)
    }
}
