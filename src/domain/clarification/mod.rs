//! Clarification module - the round-orchestration core.
//!
//! A [`Session`] holds the user's idea and an append-only list of [`Round`]s.
//! Each round carries the generator's understanding, the questions asked and,
//! once answered, the user's selections. The [`ConversationJudge`] decides
//! after every round whether to keep asking or hand off to synthesis.

mod aggregate;
mod errors;
mod history;
mod judge;
mod round;
mod values;

pub use aggregate::{Session, SessionPhase, DEFAULT_MAX_INPUT_LENGTH};
pub use errors::ClarificationError;
pub use history::{HistoryEntry, HistoryQuestion, HistorySelection};
pub use judge::{decide, ConversationJudge, Verdict, DEFAULT_MAX_ROUNDS};
pub use round::{ConclusionReason, QuestionDraft, Round, RoundDraft};
pub use values::{
    ActionItem, Choice, Effort, FinalOutput, OptionId, Priority, Question, QuestionId,
    QuestionOption, Understanding, UserSelection,
};
