//! StartSessionHandler - Command handler for opening a clarification session.

use std::sync::Arc;

use tracing::info;

use crate::domain::clarification::{ClarificationError, Session, SessionPhase};
use crate::ports::SessionRepository;

use super::round_driver::{RoundDriver, RoundOutcome};

/// Command to start a session from the user's raw idea.
#[derive(Debug, Clone)]
pub struct StartSessionCommand {
    pub original_input: String,
}

impl StartSessionCommand {
    pub fn new(original_input: impl Into<String>) -> Self {
        Self {
            original_input: original_input.into(),
        }
    }
}

/// Result of a started session.
#[derive(Debug, Clone)]
pub struct StartSessionResult {
    pub session: Session,
    pub outcome: RoundOutcome,
}

/// Handler for starting sessions.
pub struct StartSessionHandler {
    repository: Arc<dyn SessionRepository>,
    driver: RoundDriver,
    max_input_length: usize,
}

impl StartSessionHandler {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        driver: RoundDriver,
        max_input_length: usize,
    ) -> Self {
        Self {
            repository,
            driver,
            max_input_length,
        }
    }

    /// Creates the session and produces round 1.
    ///
    /// If round 1 already concludes, synthesis runs before anything is
    /// stored and no questions are returned. Nothing is stored when a
    /// collaborator call fails.
    pub async fn handle(&self, cmd: StartSessionCommand) -> Result<StartSessionResult, ClarificationError> {
        // 1. Validate input and create the aggregate
        let mut session = Session::new(cmd.original_input, self.max_input_length)?;
        info!(
            session_id = %session.id(),
            input_chars = session.original_input().chars().count(),
            "Session created"
        );

        // 2. Generate and judge round 1
        self.driver.produce_round(&mut session).await?;

        // 3. Degenerate one-round case: go straight to synthesis
        if session.phase() == SessionPhase::AwaitingSynthesis {
            self.driver.conclude(&mut session).await?;
        }

        // 4. Persist
        self.repository.save(&session).await?;

        let outcome = RoundOutcome::of(&session)?;
        Ok(StartSessionResult { session, outcome })
    }
}
