//! Round entity and the generator's raw draft of a round.

use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::fmt;

use crate::domain::foundation::{DomainError, ErrorCode, Timestamp};

use super::values::{
    Choice, OptionId, Question, QuestionId, QuestionOption, Understanding, UserSelection,
};

/// Reason a round ended the conversation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ConclusionReason {
    /// The round number reached the configured limit.
    MaxRoundsReached,
    /// The understanding has no remaining uncertainties.
    NoRemainingUncertainties,
    /// The generator itself asked to conclude.
    GeneratorAsserted { reason: Option<String> },
    /// The caller ended the conversation early.
    Forced,
}

impl fmt::Display for ConclusionReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConclusionReason::MaxRoundsReached => write!(f, "max iterations reached"),
            ConclusionReason::NoRemainingUncertainties => write!(f, "no remaining uncertainties"),
            ConclusionReason::GeneratorAsserted { reason: Some(reason) } => write!(f, "{}", reason),
            ConclusionReason::GeneratorAsserted { reason: None } => {
                write!(f, "generator requested conclusion")
            }
            ConclusionReason::Forced => write!(f, "concluded on request"),
        }
    }
}

/// A question as produced by the generator, before ids are assigned.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct QuestionDraft {
    pub question: String,
    pub options: Vec<String>,
    #[serde(default = "default_allow_other")]
    pub allow_other: bool,
}

fn default_allow_other() -> bool {
    true
}

impl QuestionDraft {
    pub fn new(question: impl Into<String>, options: Vec<&str>, allow_other: bool) -> Self {
        Self {
            question: question.into(),
            options: options.into_iter().map(String::from).collect(),
            allow_other,
        }
    }
}

/// Raw output of one generator call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RoundDraft {
    pub understanding: Understanding,
    #[serde(default)]
    pub summary: String,
    #[serde(default, alias = "selections")]
    pub questions: Vec<QuestionDraft>,
    #[serde(default)]
    pub should_conclude: bool,
    #[serde(default)]
    pub conclusion_reason: Option<String>,
}

/// One question/answer exchange within a session.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Round {
    round_number: u32,
    understanding: Understanding,
    summary: String,
    questions: Vec<Question>,
    user_selections: Vec<UserSelection>,
    conclusion: Option<ConclusionReason>,
    created_at: Timestamp,
}

impl Round {
    /// Builds a round from a generator draft and the judge's decision.
    ///
    /// Question and option ids are assigned here, by position.
    ///
    /// # Errors
    ///
    /// - `GenerationFailed` if a continuing round has no questions, or any
    ///   question has blank text or no options
    pub fn from_draft(
        round_number: u32,
        draft: RoundDraft,
        conclusion: Option<ConclusionReason>,
    ) -> Result<Self, DomainError> {
        if conclusion.is_none() && draft.questions.is_empty() {
            return Err(DomainError::new(
                ErrorCode::GenerationFailed,
                format!("round {} continues but asks no questions", round_number),
            ));
        }

        let mut questions = Vec::with_capacity(draft.questions.len());
        for (qi, q) in draft.questions.into_iter().enumerate() {
            if q.question.trim().is_empty() {
                return Err(DomainError::new(
                    ErrorCode::GenerationFailed,
                    format!("question {} has no text", qi),
                ));
            }
            if q.options.is_empty() {
                return Err(DomainError::new(
                    ErrorCode::GenerationFailed,
                    format!("question {} offers no options", qi),
                ));
            }
            let options = q
                .options
                .into_iter()
                .enumerate()
                .map(|(oi, label)| QuestionOption {
                    id: OptionId::new(oi as u32),
                    label,
                })
                .collect();
            questions.push(Question {
                id: QuestionId::new(qi as u32),
                text: q.question,
                options,
                allow_other: q.allow_other,
            });
        }

        Ok(Self {
            round_number,
            understanding: draft.understanding,
            summary: draft.summary,
            questions,
            user_selections: Vec::new(),
            conclusion,
            created_at: Timestamp::now(),
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn round_number(&self) -> u32 {
        self.round_number
    }

    pub fn understanding(&self) -> &Understanding {
        &self.understanding
    }

    pub fn summary(&self) -> &str {
        &self.summary
    }

    pub fn questions(&self) -> &[Question] {
        &self.questions
    }

    pub fn user_selections(&self) -> &[UserSelection] {
        &self.user_selections
    }

    pub fn is_answered(&self) -> bool {
        !self.user_selections.is_empty()
    }

    pub fn should_conclude(&self) -> bool {
        self.conclusion.is_some()
    }

    pub fn conclusion_reason(&self) -> Option<&ConclusionReason> {
        self.conclusion.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    /// Returns the question with the given id.
    pub fn question(&self, id: QuestionId) -> Option<&Question> {
        self.questions.get(id.index()).filter(|q| q.id == id)
    }

    /// Resolves an answer to the text shown to agents: option label or free text.
    pub fn answer_text(&self, selection: &UserSelection) -> Option<String> {
        match &selection.choice {
            Choice::Option(option_id) => self
                .question(selection.question_id)
                .and_then(|q| q.option(*option_id))
                .map(|o| o.label.clone()),
            Choice::FreeText(text) => Some(text.clone()),
        }
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Crate-internal mutations (driven by the Session aggregate)
    // ─────────────────────────────────────────────────────────────────────────

    /// Checks answers against the asked questions and returns them in question order.
    pub(crate) fn validate_selections(
        &self,
        selections: Vec<UserSelection>,
    ) -> Result<Vec<UserSelection>, DomainError> {
        if selections.len() != self.questions.len() {
            return Err(DomainError::validation(
                "selections",
                format!(
                    "expected {} selections for round {}, got {}",
                    self.questions.len(),
                    self.round_number,
                    selections.len()
                ),
            ));
        }

        let mut seen = HashSet::new();
        for selection in &selections {
            let question = self.question(selection.question_id).ok_or_else(|| {
                DomainError::validation(
                    "selections",
                    format!("question {} was not asked", selection.question_id),
                )
            })?;

            if !seen.insert(selection.question_id) {
                return Err(DomainError::validation(
                    "selections",
                    format!("question {} answered more than once", selection.question_id),
                ));
            }

            match &selection.choice {
                Choice::Option(option_id) => {
                    if question.option(*option_id).is_none() {
                        return Err(DomainError::validation(
                            "selections",
                            format!(
                                "option {} is not offered for question {}",
                                option_id, question.id
                            ),
                        ));
                    }
                }
                Choice::FreeText(text) => {
                    if !question.allow_other {
                        return Err(DomainError::validation(
                            "selections",
                            format!("question {} does not accept free text", question.id),
                        ));
                    }
                    if text.trim().is_empty() {
                        return Err(DomainError::validation(
                            "selections",
                            format!("free text for question {} is empty", question.id),
                        ));
                    }
                }
            }
        }

        let mut ordered = selections;
        ordered.sort_by_key(|s| s.question_id);
        Ok(ordered)
    }

    pub(crate) fn set_selections(&mut self, selections: Vec<UserSelection>) {
        self.user_selections = selections;
    }

    pub(crate) fn force_conclusion(&mut self) {
        if self.conclusion.is_none() {
            self.conclusion = Some(ConclusionReason::Forced);
        }
    }
}
