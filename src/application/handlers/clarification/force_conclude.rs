//! ForceConcludeHandler - Command handler for ending a conversation early.

use std::sync::Arc;

use tracing::info;

use crate::domain::clarification::{ClarificationError, FinalOutput, Session};
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

use super::load_session;
use super::round_driver::RoundDriver;
use super::session_locks::SessionLocks;

/// Command to conclude a session without waiting for the judge.
#[derive(Debug, Clone)]
pub struct ForceConcludeCommand {
    pub session_id: SessionId,
}

/// Result of a forced conclusion.
#[derive(Debug, Clone)]
pub struct ForceConcludeResult {
    pub session: Session,
    pub final_output: FinalOutput,
}

/// Handler for forced conclusion.
pub struct ForceConcludeHandler {
    repository: Arc<dyn SessionRepository>,
    driver: RoundDriver,
    locks: SessionLocks,
}

impl ForceConcludeHandler {
    pub fn new(repository: Arc<dyn SessionRepository>, driver: RoundDriver, locks: SessionLocks) -> Self {
        Self {
            repository,
            driver,
            locks,
        }
    }

    pub async fn handle(&self, cmd: ForceConcludeCommand) -> Result<ForceConcludeResult, ClarificationError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        let mut session = load_session(self.repository.as_ref(), &cmd.session_id).await?;
        if session.is_completed() {
            return Err(ClarificationError::invalid_state(format!(
                "session {} is already completed",
                cmd.session_id
            )));
        }

        info!(
            session_id = %cmd.session_id,
            round = session.current_round(),
            "Forcing conclusion"
        );
        self.driver.force_conclude(&mut session).await?;
        self.repository.save(&session).await?;

        let final_output = session.final_output().cloned().ok_or_else(|| {
            ClarificationError::invalid_state("concluded session has no final output")
        })?;
        Ok(ForceConcludeResult {
            session,
            final_output,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_doubles::{draft, output, ScriptedGenerator, ScriptedSynthesizer};
    use super::*;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::clarification::{
        ConclusionReason, ConversationJudge, Round, DEFAULT_MAX_INPUT_LENGTH,
    };
    use crate::ports::GenerationError;
    use std::time::Duration;

    async fn setup(
        synthesizer: ScriptedSynthesizer,
        with_round: bool,
    ) -> (Arc<InMemorySessionRepository>, ForceConcludeHandler, SessionId) {
        let repo = Arc::new(InMemorySessionRepository::new());
        let mut session = Session::new("Open a repair cafe", DEFAULT_MAX_INPUT_LENGTH).unwrap();
        if with_round {
            session
                .append_round(Round::from_draft(1, draft(), None).unwrap())
                .unwrap();
        }
        repo.save(&session).await.unwrap();

        let driver = RoundDriver::new(
            Arc::new(ScriptedGenerator::new(vec![])),
            Arc::new(synthesizer),
            ConversationJudge::default(),
            Duration::from_secs(5),
        );
        let handler = ForceConcludeHandler::new(repo.clone(), driver, SessionLocks::new());
        (repo, handler, *session.id())
    }

    #[tokio::test]
    async fn concludes_with_current_understanding() {
        let (repo, handler, id) = setup(ScriptedSynthesizer::new(vec![Ok(output())]), true).await;

        let result = handler.handle(ForceConcludeCommand { session_id: id }).await.unwrap();

        assert_eq!(result.final_output, output());
        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(stored.is_completed());
        assert_eq!(stored.rounds()[0].conclusion_reason(), Some(&ConclusionReason::Forced));
    }

    #[tokio::test]
    async fn already_completed_fails() {
        let (_repo, handler, id) =
            setup(ScriptedSynthesizer::new(vec![Ok(output()), Ok(output())]), true).await;
        handler.handle(ForceConcludeCommand { session_id: id }).await.unwrap();

        let err = handler.handle(ForceConcludeCommand { session_id: id }).await.unwrap_err();
        assert!(matches!(err, ClarificationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn synthesis_failure_leaves_session_in_progress() {
        let (repo, handler, id) =
            setup(ScriptedSynthesizer::new(vec![Err(GenerationError::provider("down"))]), true).await;

        assert!(handler.handle(ForceConcludeCommand { session_id: id }).await.is_err());

        let stored = repo.find_by_id(&id).await.unwrap().unwrap();
        assert!(!stored.is_completed());
        assert!(!stored.rounds()[0].should_conclude());
    }

    #[tokio::test]
    async fn session_without_rounds_cannot_conclude() {
        let (_repo, handler, id) = setup(ScriptedSynthesizer::new(vec![Ok(output())]), false).await;
        let err = handler.handle(ForceConcludeCommand { session_id: id }).await.unwrap_err();
        assert!(matches!(err, ClarificationError::InvalidState(_)));
    }

    #[tokio::test]
    async fn unknown_session_is_not_found() {
        let (_repo, handler, _id) = setup(ScriptedSynthesizer::new(vec![]), true).await;
        let err = handler
            .handle(ForceConcludeCommand { session_id: SessionId::new() })
            .await
            .unwrap_err();
        assert!(matches!(err, ClarificationError::SessionNotFound(_)));
    }
}
