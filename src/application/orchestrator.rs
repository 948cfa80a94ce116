//! Orchestrator - one entry point for every clarification operation.
//!
//! Shares a repository, a round driver and the per-session locks across
//! the individual handlers.

use std::sync::Arc;
use std::time::Duration;

use tracing::info;

use crate::adapters::{
    AgentSettings, FileSessionRepository, InMemorySessionRepository, LlmGenerator, LlmSynthesizer,
};
use crate::config::{AppConfig, StorageBackend};
use crate::domain::clarification::{
    ClarificationError, ConversationJudge, Session, UserSelection, DEFAULT_MAX_INPUT_LENGTH,
    DEFAULT_MAX_ROUNDS,
};
use crate::domain::foundation::SessionId;
use crate::ports::{AIProvider, Generator, ListSessionsQuery, SessionRepository, Synthesizer};

use super::handlers::{
    DeleteSessionCommand, DeleteSessionHandler, ForceConcludeCommand, ForceConcludeHandler,
    ForceConcludeResult, GetSessionHandler, GetSessionQuery, ListSessionsHandler, RoundDriver,
    SessionLocks, StartSessionCommand, StartSessionHandler, StartSessionResult,
    SubmitSelectionsCommand, SubmitSelectionsHandler, SubmitSelectionsResult,
    DEFAULT_CALL_TIMEOUT,
};

/// Protocol limits applied by the orchestrator.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct OrchestratorSettings {
    pub max_rounds: u32,
    pub max_input_length: usize,
    pub call_timeout: Duration,
}

impl Default for OrchestratorSettings {
    fn default() -> Self {
        Self {
            max_rounds: DEFAULT_MAX_ROUNDS,
            max_input_length: DEFAULT_MAX_INPUT_LENGTH,
            call_timeout: DEFAULT_CALL_TIMEOUT,
        }
    }
}

impl OrchestratorSettings {
    pub fn from_config(config: &AppConfig) -> Self {
        Self {
            max_rounds: config.session.max_rounds,
            max_input_length: config.session.max_input_length,
            call_timeout: config.ai.timeout(),
        }
    }

    pub fn with_max_rounds(mut self, max_rounds: u32) -> Self {
        self.max_rounds = max_rounds;
        self
    }

    pub fn with_call_timeout(mut self, call_timeout: Duration) -> Self {
        self.call_timeout = call_timeout;
        self
    }
}

/// Facade over the clarification handlers.
pub struct Orchestrator {
    start: StartSessionHandler,
    submit: SubmitSelectionsHandler,
    force: ForceConcludeHandler,
    get: GetSessionHandler,
    list: ListSessionsHandler,
    delete: DeleteSessionHandler,
}

impl Orchestrator {
    pub fn new(
        repository: Arc<dyn SessionRepository>,
        generator: Arc<dyn Generator>,
        synthesizer: Arc<dyn Synthesizer>,
        settings: OrchestratorSettings,
    ) -> Self {
        let judge = ConversationJudge::new(settings.max_rounds);
        let driver = RoundDriver::new(generator, synthesizer, judge, settings.call_timeout);
        let locks = SessionLocks::new();

        Self {
            start: StartSessionHandler::new(
                repository.clone(),
                driver.clone(),
                settings.max_input_length,
            ),
            submit: SubmitSelectionsHandler::new(repository.clone(), driver.clone(), locks.clone()),
            force: ForceConcludeHandler::new(repository.clone(), driver, locks.clone()),
            get: GetSessionHandler::new(repository.clone()),
            list: ListSessionsHandler::new(repository.clone()),
            delete: DeleteSessionHandler::new(repository, locks),
        }
    }

    /// Builds the storage backend and LLM agents described by `config`.
    pub fn from_config(config: &AppConfig, ai_provider: Arc<dyn AIProvider>) -> Self {
        let repository: Arc<dyn SessionRepository> = match config.storage.backend {
            StorageBackend::Memory => Arc::new(InMemorySessionRepository::new()),
            StorageBackend::File => Arc::new(FileSessionRepository::new(&config.storage.data_dir)),
        };
        let provider = ai_provider.provider_info();
        info!(
            provider = %provider.name,
            model = %provider.model,
            backend = ?config.storage.backend,
            max_rounds = config.session.max_rounds,
            timeout_secs = config.ai.timeout_secs,
            "Orchestrator configured"
        );

        let agent_settings = AgentSettings {
            temperature: config.ai.temperature,
            max_tokens: config.ai.max_tokens,
            questions_per_round: config.ai.questions_per_round,
            options_per_question: config.ai.options_per_question,
            max_rounds: config.session.max_rounds,
        };
        let generator = Arc::new(LlmGenerator::new(ai_provider.clone(), agent_settings.clone()));
        let synthesizer = Arc::new(LlmSynthesizer::new(ai_provider, agent_settings));

        Self::new(
            repository,
            generator,
            synthesizer,
            OrchestratorSettings::from_config(config),
        )
    }

    /// Opens a session and returns round 1, or the final output if it
    /// concluded immediately.
    pub async fn start_session(
        &self,
        original_input: impl Into<String>,
    ) -> Result<StartSessionResult, ClarificationError> {
        self.start.handle(StartSessionCommand::new(original_input)).await
    }

    /// Answers the pending round.
    pub async fn submit_selections(
        &self,
        session_id: SessionId,
        selections: Vec<UserSelection>,
    ) -> Result<SubmitSelectionsResult, ClarificationError> {
        self.submit
            .handle(SubmitSelectionsCommand {
                session_id,
                selections,
            })
            .await
    }

    /// Ends the conversation now and synthesizes from what is known.
    pub async fn force_conclude(
        &self,
        session_id: SessionId,
    ) -> Result<ForceConcludeResult, ClarificationError> {
        self.force.handle(ForceConcludeCommand { session_id }).await
    }

    pub async fn get_session(&self, session_id: SessionId) -> Result<Session, ClarificationError> {
        self.get.handle(GetSessionQuery { session_id }).await
    }

    pub async fn list_sessions(
        &self,
        query: ListSessionsQuery,
    ) -> Result<Vec<Session>, ClarificationError> {
        self.list.handle(query).await
    }

    pub async fn delete_session(&self, session_id: SessionId) -> Result<bool, ClarificationError> {
        self.delete.handle(DeleteSessionCommand { session_id }).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::MockAIProvider;
    use crate::config::StorageConfig;

    #[test]
    fn settings_follow_config() {
        let mut config = AppConfig::default();
        config.session.max_rounds = 3;
        config.ai.timeout_secs = 9;

        let settings = OrchestratorSettings::from_config(&config);

        assert_eq!(settings.max_rounds, 3);
        assert_eq!(settings.call_timeout, Duration::from_secs(9));
        assert_eq!(settings.max_input_length, DEFAULT_MAX_INPUT_LENGTH);
    }

    #[tokio::test]
    async fn failed_start_writes_nothing_to_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        let config = AppConfig {
            storage: StorageConfig {
                backend: StorageBackend::File,
                data_dir: dir.path().to_path_buf(),
            },
            ..Default::default()
        };
        let provider = Arc::new(MockAIProvider::new().with_response("not json"));
        let orchestrator = Orchestrator::from_config(&config, provider);

        // Unparseable generator reply: nothing may be written.
        let err = orchestrator.start_session("A garden app").await.unwrap_err();

        assert!(matches!(err, ClarificationError::GenerationFailed(_)));
        assert_eq!(std::fs::read_dir(dir.path()).map(|d| d.count()).unwrap_or(0), 0);
    }
}
