//! Session aggregate - one user's idea and the rounds spent clarifying it.
//!
//! # Lifecycle
//!
//! ```text
//! AwaitingGeneration ──append──▶ AwaitingSelection ──record+advance──▶ AwaitingGeneration
//!         │                             │
//!         └──append (concluding)──▶ AwaitingSynthesis ──conclude──▶ Completed
//! ```
//!
//! The aggregate enforces ordering and shape. It never calls collaborators;
//! the application layer drives it.

use crate::domain::foundation::{
    DomainError, ErrorCode, SessionId, SessionStatus, StateMachine, Timestamp,
};
use serde::{Deserialize, Serialize};
use std::fmt;

use super::history::HistoryEntry;
use super::round::Round;
use super::values::{FinalOutput, Question, Understanding, UserSelection};

/// Default maximum length of the original input, in characters.
pub const DEFAULT_MAX_INPUT_LENGTH: usize = 10_000;

/// Where a session stands in the round protocol.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SessionPhase {
    /// Round N has not been produced yet.
    AwaitingGeneration,
    /// Questions were returned to the user; waiting on answers.
    AwaitingSelection,
    /// The latest round concluded; the final report is pending.
    AwaitingSynthesis,
    Completed,
}

impl StateMachine for SessionPhase {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionPhase::*;
        matches!(
            (self, target),
            (AwaitingGeneration, AwaitingSelection)
                | (AwaitingGeneration, AwaitingSynthesis)
                | (AwaitingSelection, AwaitingGeneration)
                | (AwaitingSelection, AwaitingSynthesis)
                | (AwaitingSynthesis, Completed)
        )
    }

    fn valid_transitions(&self) -> Vec<Self> {
        use SessionPhase::*;
        match self {
            AwaitingGeneration => vec![AwaitingSelection, AwaitingSynthesis],
            AwaitingSelection => vec![AwaitingGeneration, AwaitingSynthesis],
            AwaitingSynthesis => vec![Completed],
            Completed => vec![],
        }
    }
}

impl fmt::Display for SessionPhase {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionPhase::AwaitingGeneration => "awaiting_generation",
            SessionPhase::AwaitingSelection => "awaiting_selection",
            SessionPhase::AwaitingSynthesis => "awaiting_synthesis",
            SessionPhase::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

/// Session aggregate.
///
/// # Invariants
///
/// - `original_input` is non-empty and immutable
/// - round numbers are 1-based, strictly increasing, without gaps
/// - `current_round` is `rounds.len()` while a round awaits answers, and
///   `rounds.len() + 1` while the next round awaits generation
/// - `status` only moves from in-progress to completed
/// - `final_output` is present iff `status` is completed
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Session {
    id: SessionId,
    original_input: String,
    rounds: Vec<Round>,
    current_round: u32,
    status: SessionStatus,
    final_output: Option<FinalOutput>,
    created_at: Timestamp,
    updated_at: Timestamp,
}

impl Session {
    /// Create a new in-progress session.
    ///
    /// The input is stored as given. Blankness and length are judged on the
    /// trimmed text.
    ///
    /// # Errors
    ///
    /// - `InvalidInput` if the input is blank or longer than `max_input_length` characters
    pub fn new(original_input: impl Into<String>, max_input_length: usize) -> Result<Self, DomainError> {
        let original_input = original_input.into();
        let trimmed = original_input.trim();

        if trimmed.is_empty() {
            return Err(DomainError::invalid_input(
                "original_input",
                "original input cannot be empty",
            ));
        }
        let length = trimmed.chars().count();
        if length > max_input_length {
            return Err(DomainError::invalid_input(
                "original_input",
                format!(
                    "original input is {} characters, maximum is {}",
                    length, max_input_length
                ),
            ));
        }

        let now = Timestamp::now();
        Ok(Self {
            id: SessionId::new(),
            original_input,
            rounds: Vec::new(),
            current_round: 1,
            status: SessionStatus::InProgress,
            final_output: None,
            created_at: now,
            updated_at: now,
        })
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Accessors
    // ─────────────────────────────────────────────────────────────────────────

    pub fn id(&self) -> &SessionId {
        &self.id
    }

    pub fn original_input(&self) -> &str {
        &self.original_input
    }

    pub fn rounds(&self) -> &[Round] {
        &self.rounds
    }

    pub fn current_round(&self) -> u32 {
        self.current_round
    }

    pub fn status(&self) -> SessionStatus {
        self.status
    }

    pub fn final_output(&self) -> Option<&FinalOutput> {
        self.final_output.as_ref()
    }

    pub fn created_at(&self) -> &Timestamp {
        &self.created_at
    }

    pub fn updated_at(&self) -> &Timestamp {
        &self.updated_at
    }

    pub fn latest_round(&self) -> Option<&Round> {
        self.rounds.last()
    }

    pub fn is_completed(&self) -> bool {
        self.status == SessionStatus::Completed
    }

    /// The most recent understanding, or an empty one before round 1.
    pub fn current_understanding(&self) -> Understanding {
        self.rounds
            .last()
            .map(|r| r.understanding().clone())
            .unwrap_or_default()
    }

    /// Derives the protocol phase from the stored state.
    pub fn phase(&self) -> SessionPhase {
        if self.is_completed() {
            return SessionPhase::Completed;
        }
        match self.rounds.last() {
            Some(round) if round.round_number() == self.current_round && !round.is_answered() => {
                if round.should_conclude() {
                    SessionPhase::AwaitingSynthesis
                } else {
                    SessionPhase::AwaitingSelection
                }
            }
            _ => SessionPhase::AwaitingGeneration,
        }
    }

    /// Questions the user still has to answer, if any.
    pub fn pending_questions(&self) -> Option<&[Question]> {
        match self.phase() {
            SessionPhase::AwaitingSelection => self.rounds.last().map(|r| r.questions()),
            _ => None,
        }
    }

    /// Past rounds in the shape handed to the agents.
    pub fn conversation_history(&self) -> Vec<HistoryEntry> {
        self.rounds.iter().map(HistoryEntry::from).collect()
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Lifecycle
    // ─────────────────────────────────────────────────────────────────────────

    /// Append the round for `current_round`. Does not advance.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `InvalidStateTransition` if the round number is not `current_round`
    ///   or that round already exists
    pub fn append_round(&mut self, round: Round) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        if round.round_number() != self.current_round {
            return Err(DomainError::invalid_state(format!(
                "cannot append round {} while current round is {}",
                round.round_number(),
                self.current_round
            )));
        }
        if self.rounds.len() as u32 + 1 != self.current_round {
            return Err(DomainError::invalid_state(format!(
                "round {} has already been generated",
                self.current_round
            )));
        }

        self.rounds.push(round);
        self.touch();
        Ok(())
    }

    /// Record the user's answers on the pending round.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `InvalidStateTransition` if no round is awaiting answers
    /// - `ValidationFailed` if the answers do not match the asked questions
    pub fn record_selections(&mut self, selections: Vec<UserSelection>) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        let phase = self.phase();
        if phase != SessionPhase::AwaitingSelection {
            return Err(DomainError::invalid_state(format!(
                "cannot record selections while {}",
                phase
            )));
        }

        let current = self.current_round;
        let round = self
            .rounds
            .last_mut()
            .ok_or_else(|| DomainError::invalid_state("no round awaiting selections"))?;
        let ordered = round.validate_selections(selections).map_err(|e| {
            e.with_detail("round", current.to_string())
        })?;
        round.set_selections(ordered);
        self.touch();
        Ok(())
    }

    /// Move on to the next round after the current one was answered.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `InvalidStateTransition` if there is no answered round to move past
    pub fn advance(&mut self) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        match self.rounds.last() {
            Some(round) if round.round_number() == self.current_round && round.is_answered() => {
                self.current_round += 1;
                self.touch();
                Ok(())
            }
            _ => Err(DomainError::invalid_state(format!(
                "round {} has no answered round to advance past",
                self.current_round
            ))),
        }
    }

    /// Complete the session after a concluding round.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `InvalidStateTransition` if the latest round did not conclude
    /// - `GenerationFailed` if the output has no usable action items
    pub fn conclude(&mut self, output: FinalOutput) -> Result<(), DomainError> {
        self.ensure_mutable()?;

        let concluded = self.rounds.last().map(Round::should_conclude).unwrap_or(false);
        if !concluded {
            return Err(DomainError::invalid_state(
                "cannot conclude before a round has decided to conclude",
            ));
        }
        Self::validate_output(&output)?;

        self.status = self
            .status
            .transition_to(SessionStatus::Completed)
            .map_err(|e| DomainError::invalid_state(e.to_string()))?;
        self.final_output = Some(output);
        self.touch();
        Ok(())
    }

    /// Complete the session regardless of the judge.
    ///
    /// The latest round is marked as concluded on request unless it had
    /// already concluded.
    ///
    /// # Errors
    ///
    /// - `SessionCompleted` if the session is completed
    /// - `InvalidStateTransition` if no round exists yet
    /// - `GenerationFailed` if the output has no usable action items
    pub fn force_conclude(&mut self, output: FinalOutput) -> Result<(), DomainError> {
        self.ensure_mutable()?;
        Self::validate_output(&output)?;

        let round = self
            .rounds
            .last_mut()
            .ok_or_else(|| DomainError::invalid_state("cannot conclude a session without rounds"))?;
        round.force_conclusion();
        self.conclude(output)
    }

    // ─────────────────────────────────────────────────────────────────────────
    // Helpers
    // ─────────────────────────────────────────────────────────────────────────

    fn ensure_mutable(&self) -> Result<(), DomainError> {
        if !self.status.is_mutable() {
            return Err(DomainError::new(
                ErrorCode::SessionCompleted,
                format!("session {} is already completed", self.id),
            ));
        }
        Ok(())
    }

    fn validate_output(output: &FinalOutput) -> Result<(), DomainError> {
        output
            .validate()
            .map_err(|e| DomainError::new(ErrorCode::GenerationFailed, e.to_string()))
    }

    fn touch(&mut self) {
        self.updated_at = Timestamp::now();
    }
}
