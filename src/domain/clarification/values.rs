//! Value objects exchanged between the session, the user and the agents.

use serde::{Deserialize, Serialize};
use std::fmt;

use crate::domain::foundation::ValidationError;

// ─────────────────────────────────────────────────────────────────────────────
// Understanding
// ─────────────────────────────────────────────────────────────────────────────

/// The generator's interpretation of the user's idea as of one round.
///
/// Clarified points are expected to grow from round to round, but that is a
/// property of the generator and is not enforced here.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Understanding {
    #[serde(default)]
    pub main_themes: Vec<String>,
    #[serde(default)]
    pub user_intent: String,
    #[serde(default)]
    pub clarified_points: Vec<String>,
    #[serde(default)]
    pub remaining_uncertainties: Vec<String>,
}

impl Understanding {
    /// Returns true when nothing is left to clarify.
    pub fn is_settled(&self) -> bool {
        self.remaining_uncertainties.is_empty()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Questions and options
// ─────────────────────────────────────────────────────────────────────────────

/// Position of a question within its round, assigned when the round is built.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct QuestionId(u32);

impl QuestionId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for QuestionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "q{}", self.0)
    }
}

/// Position of an option within its question, assigned when the round is built.
///
/// Answers refer to options by this id, never by label text.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct OptionId(u32);

impl OptionId {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Display for OptionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "o{}", self.0)
    }
}

/// One selectable answer to a question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionOption {
    pub id: OptionId,
    pub label: String,
}

/// A multiple-choice question asked in a round.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Question {
    pub id: QuestionId,
    pub text: String,
    pub options: Vec<QuestionOption>,
    /// Whether the user may answer with free text instead of an option.
    pub allow_other: bool,
}

impl Question {
    /// Looks up an offered option by id.
    pub fn option(&self, id: OptionId) -> Option<&QuestionOption> {
        self.options.iter().find(|o| o.id == id)
    }

    /// Returns the option labels in display order.
    pub fn labels(&self) -> Vec<String> {
        self.options.iter().map(|o| o.label.clone()).collect()
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// User selections
// ─────────────────────────────────────────────────────────────────────────────

/// The user's answer to one question: an offered option or free text, never both.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Choice {
    Option(OptionId),
    FreeText(String),
}

/// One answered question.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserSelection {
    pub question_id: QuestionId,
    pub choice: Choice,
}

impl UserSelection {
    /// Answers a question with one of its offered options.
    pub fn option(question_id: QuestionId, option_id: OptionId) -> Self {
        Self {
            question_id,
            choice: Choice::Option(option_id),
        }
    }

    /// Answers a question with free text.
    pub fn free_text(question_id: QuestionId, text: impl Into<String>) -> Self {
        Self {
            question_id,
            choice: Choice::FreeText(text.into()),
        }
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Final output
// ─────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Priority {
    High,
    Medium,
    Low,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Effort {
    Minimal,
    Moderate,
    Significant,
}

/// A concrete next action for the user.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ActionItem {
    pub action: String,
    pub priority: Priority,
    pub effort: Effort,
}

impl ActionItem {
    pub fn new(action: impl Into<String>, priority: Priority, effort: Effort) -> Self {
        Self {
            action: action.into(),
            priority,
            effort,
        }
    }
}

/// The synthesized report attached to a completed session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FinalOutput {
    pub final_summary: String,
    pub action_items: Vec<ActionItem>,
    #[serde(default)]
    pub tips: Vec<String>,
    #[serde(default)]
    pub insights: Vec<String>,
    #[serde(default)]
    pub next_steps: String,
    #[serde(default)]
    pub encouragement: String,
}

impl FinalOutput {
    /// Checks the synthesizer contract: at least one non-blank action item.
    pub fn validate(&self) -> Result<(), ValidationError> {
        if self.action_items.is_empty() {
            return Err(ValidationError::empty_field("action_items"));
        }
        if let Some(pos) = self
            .action_items
            .iter()
            .position(|item| item.action.trim().is_empty())
        {
            return Err(ValidationError::invalid_format(
                "action_items",
                format!("item {} has no action text", pos),
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn output_with(items: Vec<ActionItem>) -> FinalOutput {
        FinalOutput {
            final_summary: "Open a small bakery".to_string(),
            action_items: items,
            tips: vec![],
            insights: vec![],
            next_steps: String::new(),
            encouragement: String::new(),
        }
    }

    #[test]
    fn understanding_without_uncertainties_is_settled() {
        let mut u = Understanding::default();
        assert!(u.is_settled());
        u.remaining_uncertainties.push("budget".to_string());
        assert!(!u.is_settled());
    }

    #[test]
    fn question_finds_option_by_id() {
        let q = Question {
            id: QuestionId::new(0),
            text: "Where?".to_string(),
            options: vec![
                QuestionOption { id: OptionId::new(0), label: "Downtown".to_string() },
                QuestionOption { id: OptionId::new(1), label: "Suburbs".to_string() },
            ],
            allow_other: false,
        };

        assert_eq!(q.option(OptionId::new(1)).map(|o| o.label.as_str()), Some("Suburbs"));
        assert!(q.option(OptionId::new(2)).is_none());
        assert_eq!(q.labels(), vec!["Downtown", "Suburbs"]);
    }

    #[test]
    fn choice_serializes_externally_tagged() {
        let opt = serde_json::to_value(Choice::Option(OptionId::new(2))).unwrap();
        let text = serde_json::to_value(Choice::FreeText("mine".to_string())).unwrap();
        assert_eq!(opt, serde_json::json!({"option": 2}));
        assert_eq!(text, serde_json::json!({"free_text": "mine"}));
    }

    #[test]
    fn final_output_requires_action_items() {
        assert!(output_with(vec![]).validate().is_err());
    }

    #[test]
    fn final_output_rejects_blank_action() {
        let out = output_with(vec![ActionItem::new("  ", Priority::High, Effort::Minimal)]);
        assert!(out.validate().is_err());
    }

    #[test]
    fn final_output_accepts_valid_items() {
        let out = output_with(vec![ActionItem::new(
            "Draft a menu",
            Priority::High,
            Effort::Moderate,
        )]);
        assert!(out.validate().is_ok());
    }

    #[test]
    fn priority_and_effort_reject_unknown_values() {
        assert!(serde_json::from_str::<Priority>("\"urgent\"").is_err());
        assert!(serde_json::from_str::<Effort>("\"huge\"").is_err());
        assert_eq!(serde_json::from_str::<Effort>("\"significant\"").unwrap(), Effort::Significant);
    }
}
