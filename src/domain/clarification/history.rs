//! Agent-facing projection of a session's past rounds.

use serde::{Deserialize, Serialize};

use super::round::Round;

/// One question as the agents see it: text plus option labels.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryQuestion {
    pub question: String,
    pub options: Vec<String>,
}

/// One answer as the agents see it: question text plus the chosen label or free text.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistorySelection {
    pub question: String,
    pub selected: String,
}

/// One past round in the conversation history.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryEntry {
    pub round: u32,
    pub summary: String,
    pub questions: Vec<HistoryQuestion>,
    pub user_selections: Vec<HistorySelection>,
}

impl From<&Round> for HistoryEntry {
    fn from(round: &Round) -> Self {
        let questions = round
            .questions()
            .iter()
            .map(|q| HistoryQuestion {
                question: q.text.clone(),
                options: q.labels(),
            })
            .collect();

        let user_selections = round
            .user_selections()
            .iter()
            .filter_map(|s| {
                let question = round.question(s.question_id)?;
                let selected = round.answer_text(s)?;
                Some(HistorySelection {
                    question: question.text.clone(),
                    selected,
                })
            })
            .collect();

        Self {
            round: round.round_number(),
            summary: round.summary().to_string(),
            questions,
            user_selections,
        }
    }
}
