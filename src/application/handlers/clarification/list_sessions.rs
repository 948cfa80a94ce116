//! ListSessionsHandler - Query handler for browsing sessions newest-first.

use std::sync::Arc;

use crate::domain::clarification::{ClarificationError, Session};
use crate::ports::{ListSessionsQuery, SessionRepository};

/// Handler for listing sessions.
pub struct ListSessionsHandler {
    repository: Arc<dyn SessionRepository>,
}

impl ListSessionsHandler {
    pub fn new(repository: Arc<dyn SessionRepository>) -> Self {
        Self { repository }
    }

    pub async fn handle(&self, query: ListSessionsQuery) -> Result<Vec<Session>, ClarificationError> {
        Ok(self.repository.list(query).await?)
    }
}

#[cfg(test)]
mod tests {
    use super::super::test_doubles::FailingRepository;
    use super::*;
    use crate::adapters::storage::InMemorySessionRepository;
    use crate::domain::clarification::DEFAULT_MAX_INPUT_LENGTH;

    #[tokio::test]
    async fn lists_with_paging() {
        let repo = Arc::new(InMemorySessionRepository::new());
        for i in 0..3 {
            let s = Session::new(format!("idea {}", i), DEFAULT_MAX_INPUT_LENGTH).unwrap();
            repo.save(&s).await.unwrap();
        }
        let handler = ListSessionsHandler::new(repo);

        let all = handler.handle(ListSessionsQuery::default()).await.unwrap();
        let page = handler
            .handle(ListSessionsQuery::default().with_limit(2))
            .await
            .unwrap();

        assert_eq!(all.len(), 3);
        assert_eq!(page.len(), 2);
    }

    #[tokio::test]
    async fn storage_errors_are_surfaced() {
        let handler = ListSessionsHandler::new(Arc::new(FailingRepository));
        let err = handler.handle(ListSessionsQuery::default()).await.unwrap_err();
        assert!(matches!(err, ClarificationError::Storage(_)));
    }
}
