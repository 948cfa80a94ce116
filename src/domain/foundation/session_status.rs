//! SessionStatus enum for tracking lifecycle of clarification sessions.

use serde::{Deserialize, Serialize};
use std::fmt;

use super::StateMachine;

/// Lifecycle status of a clarification session.
///
/// Monotonic: a completed session never returns to in-progress.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, Default)]
#[serde(rename_all = "snake_case")]
pub enum SessionStatus {
    #[default]
    InProgress,
    Completed,
}

impl SessionStatus {
    /// Returns true if the session can still be modified.
    pub fn is_mutable(&self) -> bool {
        matches!(self, SessionStatus::InProgress)
    }
}

impl StateMachine for SessionStatus {
    fn can_transition_to(&self, target: &Self) -> bool {
        use SessionStatus::*;
        matches!((self, target), (InProgress, Completed))
    }

    fn valid_transitions(&self) -> Vec<Self> {
        match self {
            SessionStatus::InProgress => vec![SessionStatus::Completed],
            SessionStatus::Completed => vec![],
        }
    }
}

impl fmt::Display for SessionStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            SessionStatus::InProgress => "in_progress",
            SessionStatus::Completed => "completed",
        };
        write!(f, "{}", s)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_in_progress() {
        assert_eq!(SessionStatus::default(), SessionStatus::InProgress);
    }

    #[test]
    fn is_mutable_works_correctly() {
        assert!(SessionStatus::InProgress.is_mutable());
        assert!(!SessionStatus::Completed.is_mutable());
    }

    #[test]
    fn in_progress_can_complete() {
        assert!(SessionStatus::InProgress.can_transition_to(&SessionStatus::Completed));
    }

    #[test]
    fn completed_never_reverts() {
        assert!(!SessionStatus::Completed.can_transition_to(&SessionStatus::InProgress));
        assert!(SessionStatus::Completed
            .transition_to(SessionStatus::InProgress)
            .is_err());
    }

    #[test]
    fn completed_is_terminal() {
        assert!(SessionStatus::Completed.is_terminal());
        assert!(!SessionStatus::InProgress.is_terminal());
    }

    #[test]
    fn serializes_to_snake_case_json() {
        assert_eq!(
            serde_json::to_string(&SessionStatus::InProgress).unwrap(),
            "\"in_progress\""
        );
        assert_eq!(
            serde_json::to_string(&SessionStatus::Completed).unwrap(),
            "\"completed\""
        );
    }

    #[test]
    fn display_matches_wire_format() {
        assert_eq!(SessionStatus::InProgress.to_string(), "in_progress");
        assert_eq!(SessionStatus::Completed.to_string(), "completed");
    }
}
