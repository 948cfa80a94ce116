//! RoundDriver - runs collaborator calls against a session.
//!
//! Operates on a session the caller loaded and will save. Nothing here
//! touches storage, so a failed call leaves the stored session unchanged.

use std::future::Future;
use std::sync::Arc;
use std::time::{Duration, Instant};

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::clarification::{
    ClarificationError, ConversationJudge, FinalOutput, Question, Round, Session, Verdict,
};
use crate::domain::foundation::SessionId;
use crate::ports::{GenerationError, GenerationRequest, Generator, SynthesisRequest, Synthesizer};

/// Default timeout for one Generator or Synthesizer call.
pub const DEFAULT_CALL_TIMEOUT: Duration = Duration::from_secs(120);

/// What the caller sees after an operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum RoundOutcome {
    /// The conversation continues with these questions.
    Questions { round: u32, questions: Vec<Question> },
    /// The conversation concluded with this report.
    Completed { final_output: FinalOutput },
}

impl RoundOutcome {
    /// Reads the outcome off a session after an operation.
    pub fn of(session: &Session) -> Result<Self, ClarificationError> {
        if let Some(output) = session.final_output() {
            return Ok(RoundOutcome::Completed {
                final_output: output.clone(),
            });
        }
        session
            .pending_questions()
            .map(|questions| RoundOutcome::Questions {
                round: session.current_round(),
                questions: questions.to_vec(),
            })
            .ok_or_else(|| {
                ClarificationError::invalid_state(format!(
                    "session {} has neither pending questions nor a final output",
                    session.id()
                ))
            })
    }

    pub fn is_completed(&self) -> bool {
        matches!(self, RoundOutcome::Completed { .. })
    }
}

/// Calls the Generator and Synthesizer and applies their results.
#[derive(Clone)]
pub struct RoundDriver {
    generator: Arc<dyn Generator>,
    synthesizer: Arc<dyn Synthesizer>,
    judge: ConversationJudge,
    call_timeout: Duration,
}

impl RoundDriver {
    pub fn new(
        generator: Arc<dyn Generator>,
        synthesizer: Arc<dyn Synthesizer>,
        judge: ConversationJudge,
        call_timeout: Duration,
    ) -> Self {
        Self {
            generator,
            synthesizer,
            judge,
            call_timeout,
        }
    }

    pub fn judge(&self) -> &ConversationJudge {
        &self.judge
    }

    /// Generates, judges and appends the round for `current_round`.
    pub async fn produce_round(&self, session: &mut Session) -> Result<Verdict, ClarificationError> {
        let session_id = *session.id();
        let round_number = session.current_round();

        let request = GenerationRequest {
            session_id,
            original_input: session.original_input().to_string(),
            conversation_history: session.conversation_history(),
            current_round: round_number,
        };
        let draft = self
            .call(&session_id, "generate", self.generator.generate(request))
            .await?;

        let verdict = self.judge.evaluate(round_number, &draft);
        info!(
            session_id = %session_id,
            round = round_number,
            should_conclude = verdict.should_conclude(),
            reason = ?verdict.reason().map(|r| r.to_string()),
            "Judge decision"
        );

        let round = Round::from_draft(round_number, draft, verdict.clone().into_reason())
            .map_err(|e| {
                warn!(session_id = %session_id, round = round_number, error = %e, "Generator output rejected");
                ClarificationError::from(e)
            })?;
        session.append_round(round)?;
        debug!(session_id = %session_id, round = round_number, "Round appended");

        Ok(verdict)
    }

    /// Synthesizes the report and completes a session whose latest round concluded.
    pub async fn conclude(&self, session: &mut Session) -> Result<(), ClarificationError> {
        let output = self.synthesize(session).await?;
        session.conclude(output)?;
        Ok(())
    }

    /// Synthesizes the report and completes the session without consulting the judge.
    pub async fn force_conclude(&self, session: &mut Session) -> Result<(), ClarificationError> {
        if session.latest_round().is_none() {
            return Err(ClarificationError::invalid_state(
                "cannot conclude a session without rounds",
            ));
        }
        let output = self.synthesize(session).await?;
        session.force_conclude(output)?;
        Ok(())
    }

    async fn synthesize(&self, session: &Session) -> Result<FinalOutput, ClarificationError> {
        let session_id = *session.id();
        if session.is_completed() {
            return Err(ClarificationError::invalid_state(format!(
                "session {} is already completed",
                session_id
            )));
        }

        info!(session_id = %session_id, rounds = session.rounds().len(), "Synthesis started");
        let request = SynthesisRequest {
            session_id,
            original_input: session.original_input().to_string(),
            conversation_history: session.conversation_history(),
            final_understanding: session.current_understanding(),
        };
        let output = self
            .call(&session_id, "synthesize", self.synthesizer.synthesize(request))
            .await?;
        info!(
            session_id = %session_id,
            action_items = output.action_items.len(),
            "Synthesis completed"
        );
        Ok(output)
    }

    async fn call<T, F>(
        &self,
        session_id: &SessionId,
        step: &'static str,
        fut: F,
    ) -> Result<T, GenerationError>
    where
        F: Future<Output = Result<T, GenerationError>>,
    {
        let start = Instant::now();
        let result = match tokio::time::timeout(self.call_timeout, fut).await {
            Ok(result) => result,
            Err(_) => Err(GenerationError::Timeout {
                timeout_ms: u64::try_from(self.call_timeout.as_millis()).unwrap_or(u64::MAX),
            }),
        };
        let elapsed_ms = start.elapsed().as_millis() as u64;

        match &result {
            Ok(_) => debug!(session_id = %session_id, step, elapsed_ms, "Collaborator call succeeded"),
            Err(e) if e.is_timeout() => {
                warn!(session_id = %session_id, step, elapsed_ms, "Collaborator call timed out")
            }
            Err(e) => {
                warn!(session_id = %session_id, step, elapsed_ms, error = %e, "Collaborator call failed")
            }
        }
        result
    }
}
