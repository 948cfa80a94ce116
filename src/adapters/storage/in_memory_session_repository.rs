//! In-Memory Session Repository
//!
//! Stores sessions in a process-local map.
//! Useful for testing and development.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;

use crate::domain::clarification::Session;
use crate::domain::foundation::{DomainError, SessionId};
use crate::ports::{apply_list_query, ListSessionsQuery, SessionRepository};

/// In-memory storage for sessions
#[derive(Debug, Clone, Default)]
pub struct InMemorySessionRepository {
    sessions: Arc<RwLock<HashMap<SessionId, Session>>>,
}

impl InMemorySessionRepository {
    /// Create a new, empty repository
    pub fn new() -> Self {
        Self::default()
    }

    /// Clear all stored data (useful for tests)
    pub async fn clear(&self) {
        self.sessions.write().await.clear();
    }

    /// Get the number of stored sessions
    pub async fn len(&self) -> usize {
        self.sessions.read().await.len()
    }

    pub async fn is_empty(&self) -> bool {
        self.sessions.read().await.is_empty()
    }
}

#[async_trait]
impl SessionRepository for InMemorySessionRepository {
    async fn save(&self, session: &Session) -> Result<(), DomainError> {
        let mut sessions = self.sessions.write().await;
        sessions.insert(*session.id(), session.clone());
        Ok(())
    }

    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(sessions.get(id).cloned())
    }

    async fn list(&self, query: ListSessionsQuery) -> Result<Vec<Session>, DomainError> {
        let sessions = self.sessions.read().await;
        Ok(apply_list_query(sessions.values().cloned().collect(), query))
    }

    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError> {
        let mut sessions = self.sessions.write().await;
        Ok(sessions.remove(id).is_some())
    }
}
