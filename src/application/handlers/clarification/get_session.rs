//! GetSessionHandler - Query handler for retrieving a session.

use std::sync::Arc;

use crate::domain::clarification::{ClarificationError, Session};
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

use super::load_session;

/// Query to get a session by ID.
#[derive(Debug, Clone)]
pub struct GetSessionQuery {
    pub session_id: SessionId,
}

/// Handler for retrieving sessions.
pub struct GetSessionHandler {
    repository: Arc<dyn SessionRepository>,
}

impl GetSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: GetSessionQuery) -> Result<Session, ClarificationError> {
        load_session(self.repository.as_ref(), &query.session_id).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::clarification::DEFAULT_MAX_INPUT_LENGTH;

    #[tokio::test]
    async fn returns_stored_session() {
        let repo = Arc::new(InMemorySessionRepository::new());
        let session = Session::new("A tiny house", DEFAULT_MAX_INPUT_LENGTH).unwrap();
        repo.save(&session).await.unwrap();
        let handler = GetSessionHandler::new(repo);

        let found = handler
            .handle(GetSessionQuery { session_id: *session.id() })
            .await
            .unwrap();

        assert_eq!(found, session);
    }

    #[tokio::test]
    async fn missing_session_is_not_found() {
        let handler = GetSessionHandler::new(Arc::new(InMemorySessionRepository::new()));
        let id = SessionId::new();

        let err = handler.handle(GetSessionQuery { session_id: id }).await.unwrap_err();

        assert_eq!(err, ClarificationError::SessionNotFound(id));
    }
}
