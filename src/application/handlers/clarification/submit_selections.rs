//! SubmitSelectionsHandler - Command handler for answering the pending round.

use std::sync::Arc;

use tracing::{debug, info};

use crate::domain::clarification::{ClarificationError, Session, SessionPhase, UserSelection};
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

use super::round_driver::{RoundDriver, RoundOutcome};
use super::session_locks::SessionLocks;
use super::load_session;

/// Command carrying the user's answers to the pending round.
#[derive(Debug, Clone)]
pub struct SubmitSelectionsCommand {
    pub session_id: SessionId,
    pub selections: Vec<UserSelection>,
}

/// Result of submitted selections.
#[derive(Debug, Clone)]
pub struct SubmitSelectionsResult {
    pub session: Session,
    pub outcome: RoundOutcome,
}

/// Handler for submitting selections.
pub struct SubmitSelectionsHandler {
    repository: Arc<dyn SessionRepository>,
    driver: RoundDriver,
    locks: SessionLocks,
}

impl SubmitSelectionsHandler {
    pub fn new(repository: Arc<dyn SessionRepository>, driver: RoundDriver, locks: SessionLocks) -> Self {
        Self {
            repository,
            driver,
            locks,
        }
    }

    /// Records the answers, then either returns the next round's questions
    /// or concludes the session.
    ///
    /// A session whose latest round already concluded goes straight to
    /// synthesis; it takes no answers, so any selections are rejected. The
    /// stored session only changes once every collaborator call has succeeded.
    pub async fn handle(&self, cmd: SubmitSelectionsCommand) -> Result<SubmitSelectionsResult, ClarificationError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        // 1. Load a working copy
        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;

        // 2. Apply the answers according to the phase
        match session.phase() {
            SessionPhase::Completed => {
                return Err(ClarificationError::invalid_state(format!(
                    "session {} is already completed",
                    cmd.session_id
                )));
            }
            SessionPhase::AwaitingGeneration => {
                return Err(ClarificationError::invalid_state(format!(
                    "session {} has no round awaiting selections",
                    cmd.session_id
                )));
            }
            SessionPhase::AwaitingSynthesis => {
                if !cmd.selections.is_empty() {
                    return Err(ClarificationError::validation(
                        "selections",
                        format!(
                            "round {} already concluded and takes no selections",
                            session.current_round()
                        ),
                    ));
                }
                debug!(session_id = %cmd.session_id, "Latest round already concluded, synthesizing");
            }
            SessionPhase::AwaitingSelection => {
                session.record_selections(cmd.selections)?;
                info!(
                    session_id = %cmd.session_id,
                    round = session.current_round(),
                    "Selections recorded"
                );
                session.advance()?;
                self.driver.produce_round(&mut session).await?;
            }
        }

        // 3. Conclude if the judge said so
        if session.phase() == SessionPhase::AwaitingSynthesis {
            self.driver.conclude(&mut session).await?;
        }

        // 4. Persist
        self.repository.save(&session).await?;

        let outcome = RoundOutcome::of(&session)?;
        Ok(SubmitSelectionsResult { session, outcome })
    }
}
