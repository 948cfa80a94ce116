//! Settings and reply parsing shared by the LLM agents.

use serde::de::DeserializeOwned;

use crate::domain::clarification::DEFAULT_MAX_ROUNDS;
use crate::ports::{CompletionResponse, FinishReason, GenerationError};

/// Sampling and prompt settings for the LLM agents.
#[derive(Debug, Clone, PartialEq)]
pub struct AgentSettings {
    pub temperature: f32,
    pub max_tokens: Option<u32>,
    /// Prompt hint only; the core accepts any number of questions.
    pub questions_per_round: u32,
    /// Prompt hint only; the core accepts any non-zero number of options.
    pub options_per_question: u32,
    pub max_rounds: u32,
}

impl Default for AgentSettings {
    fn default() -> Self {
        Self {
            temperature: 0.7,
            max_tokens: None,
            questions_per_round: 3,
            options_per_question: 4,
            max_rounds: DEFAULT_MAX_ROUNDS,
        }
    }
}

/// Returns the reply text if the model finished normally.
///
/// A reply cut off at `max_tokens` would only fail later as broken JSON,
/// so it is reported as truncated here.
pub fn reply_content(response: &CompletionResponse) -> Result<&str, GenerationError> {
    match response.finish_reason {
        FinishReason::Stop => Ok(&response.content),
        FinishReason::Length => Err(GenerationError::invalid_output(
            "reply truncated at max_tokens",
        )),
        FinishReason::ContentFilter => Err(GenerationError::rejected(
            "reply withheld by content filter",
        )),
        FinishReason::Error => Err(GenerationError::provider(
            "provider reported an error while generating",
        )),
    }
}

/// Parses a model reply into `T`.
///
/// Tolerates a Markdown code fence or prose around the object.
pub fn parse_reply<T: DeserializeOwned>(content: &str) -> Result<T, GenerationError> {
    let json = extract_object(content).ok_or_else(|| {
        GenerationError::invalid_output(format!(
            "reply contains no JSON object: {}",
            preview(content)
        ))
    })?;

    serde_json::from_str(json).map_err(|e| {
        tracing::error!(error = %e, content_preview = %preview(content), "Failed to parse agent reply");
        GenerationError::invalid_output(format!("failed to parse reply: {}", e))
    })
}

fn extract_object(content: &str) -> Option<&str> {
    let start = content.find('{')?;
    let end = content.rfind('}')?;
    (end > start).then(|| &content[start..=end])
}

fn preview(content: &str) -> String {
    content.chars().take(200).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde::Deserialize;

    #[derive(Debug, Deserialize, PartialEq)]
    struct Reply {
        ok: bool,
    }

    #[test]
    fn parses_bare_object() {
        assert_eq!(parse_reply::<Reply>(r#"{"ok": true}"#).unwrap(), Reply { ok: true });
    }

    #[test]
    fn parses_fenced_object() {
        let content = "Here you go:\n```json\n{\"ok\": false}\n```\n";
        assert_eq!(parse_reply::<Reply>(content).unwrap(), Reply { ok: false });
    }

    #[test]
    fn rejects_reply_without_object() {
        let err = parse_reply::<Reply>("Mock response").unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOutput(_)));
    }

    #[test]
    fn rejects_wrong_shape() {
        let err = parse_reply::<Reply>(r#"{"different": 1}"#).unwrap_err();
        assert!(matches!(err, GenerationError::InvalidOutput(_)));
    }

    #[test]
    fn truncated_reply_is_invalid_output() {
        let mut response = CompletionResponse::new(r#"{"ok": tr"#, "mock");
        response.finish_reason = FinishReason::Length;

        let err = reply_content(&response).unwrap_err();
        assert_eq!(
            err,
            GenerationError::InvalidOutput("reply truncated at max_tokens".to_string())
        );
    }

    #[test]
    fn filtered_reply_is_rejected() {
        let mut response = CompletionResponse::new("", "mock");
        response.finish_reason = FinishReason::ContentFilter;

        assert!(matches!(reply_content(&response), Err(GenerationError::Rejected(_))));
    }

    #[test]
    fn stopped_reply_passes_through() {
        let response = CompletionResponse::new(r#"{"ok": true}"#, "mock");
        assert_eq!(reply_content(&response).unwrap(), r#"{"ok": true}"#);
    }

    #[test]
    fn default_settings() {
        let settings = AgentSettings::default();
        assert_eq!(settings.max_rounds, 5);
        assert_eq!(settings.temperature, 0.7);
    }
}
