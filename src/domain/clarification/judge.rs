//! Conversation Judge - decides whether a round continues or concludes.
//!
//! Only two rules are owned here: the round limit and an empty list of
//! remaining uncertainties. Any other conclusion signal must arrive through
//! the generator's own `should_conclude` flag, which is OR-ed in by
//! [`ConversationJudge::evaluate`].

use super::round::{ConclusionReason, RoundDraft};
use super::values::Understanding;

/// Default round limit.
pub const DEFAULT_MAX_ROUNDS: u32 = 5;

/// Outcome of judging one round.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Verdict {
    Continue,
    Conclude(ConclusionReason),
}

impl Verdict {
    pub fn should_conclude(&self) -> bool {
        matches!(self, Verdict::Conclude(_))
    }

    pub fn reason(&self) -> Option<&ConclusionReason> {
        match self {
            Verdict::Continue => None,
            Verdict::Conclude(reason) => Some(reason),
        }
    }

    pub fn into_reason(self) -> Option<ConclusionReason> {
        match self {
            Verdict::Continue => None,
            Verdict::Conclude(reason) => Some(reason),
        }
    }
}

/// Applies the conclusion rules for a fixed round limit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ConversationJudge {
    max_rounds: u32,
}

impl ConversationJudge {
    /// Creates a judge. A limit of zero is treated as one.
    pub fn new(max_rounds: u32) -> Self {
        Self {
            max_rounds: max_rounds.max(1),
        }
    }

    pub fn max_rounds(&self) -> u32 {
        self.max_rounds
    }

    /// Applies the deterministic rules only.
    pub fn decide(&self, round_number: u32, understanding: &Understanding) -> Verdict {
        decide(round_number, understanding, self.max_rounds)
    }

    /// Applies the deterministic rules, then honours a generator-asserted conclusion.
    pub fn evaluate(&self, round_number: u32, draft: &RoundDraft) -> Verdict {
        match self.decide(round_number, &draft.understanding) {
            Verdict::Continue if draft.should_conclude => {
                Verdict::Conclude(ConclusionReason::GeneratorAsserted {
                    reason: draft
                        .conclusion_reason
                        .as_ref()
                        .map(|r| r.trim().to_string())
                        .filter(|r| !r.is_empty()),
                })
            }
            verdict => verdict,
        }
    }
}

impl Default for ConversationJudge {
    fn default() -> Self {
        Self::new(DEFAULT_MAX_ROUNDS)
    }
}

/// Pure conclusion rule: round limit first, then settled understanding.
///
/// A round number past the limit still concludes.
pub fn decide(round_number: u32, understanding: &Understanding, max_rounds: u32) -> Verdict {
    if round_number >= max_rounds {
        Verdict::Conclude(ConclusionReason::MaxRoundsReached)
    } else if understanding.is_settled() {
        Verdict::Conclude(ConclusionReason::NoRemainingUncertainties)
    } else {
        Verdict::Continue
    }
}
