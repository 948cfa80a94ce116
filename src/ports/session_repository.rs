//! Session repository port.
//!
//! Defines the contract for persisting and retrieving clarification sessions.
//! The core calls it around every state transition but assumes no storage
//! format.

use crate::domain::clarification::Session;
use crate::domain::foundation::{DomainError, SessionId, SessionStatus};
use async_trait::async_trait;

/// Default page size for [`SessionRepository::list`].
pub const DEFAULT_LIST_LIMIT: usize = 50;

/// Filter and paging for session listings.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ListSessionsQuery {
    pub status: Option<SessionStatus>,
    pub limit: usize,
    pub offset: usize,
}

impl Default for ListSessionsQuery {
    fn default() -> Self {
        Self {
            status: None,
            limit: DEFAULT_LIST_LIMIT,
            offset: 0,
        }
    }
}

impl ListSessionsQuery {
    pub fn with_status(mut self, status: SessionStatus) -> Self {
        self.status = Some(status);
        self
    }

    pub fn with_limit(mut self, limit: usize) -> Self {
        self.limit = limit;
        self
    }

    pub fn with_offset(mut self, offset: usize) -> Self {
        self.offset = offset;
        self
    }
}

/// Repository port for Session persistence.
#[async_trait]
pub trait SessionRepository: Send + Sync {
    /// Insert or replace a session.
    ///
    /// # Errors
    ///
    /// - `StorageError` on persistence failure
    async fn save(&self, session: &Session) -> Result<(), DomainError>;

    /// Find a session by its ID.
    ///
    /// Returns `None` if not found.
    async fn find_by_id(&self, id: &SessionId) -> Result<Option<Session>, DomainError>;

    /// List sessions, newest first.
    async fn list(&self, query: ListSessionsQuery) -> Result<Vec<Session>, DomainError>;

    /// Delete a session. Returns whether it existed.
    async fn delete(&self, id: &SessionId) -> Result<bool, DomainError>;
}

/// Applies a listing query to an unordered set of sessions.
///
/// Shared by the in-process adapters.
pub fn apply_list_query(mut sessions: Vec<Session>, query: ListSessionsQuery) -> Vec<Session> {
    if let Some(status) = query.status {
        sessions.retain(|s| s.status() == status);
    }
    sessions.sort_by(|a, b| b.created_at().cmp(a.created_at()));
    sessions
        .into_iter()
        .skip(query.offset)
        .take(query.limit)
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    // Trait object safety test
    #[test]
    fn session_repository_is_object_safe() {
        fn _accepts_dyn(_repo: &dyn SessionRepository) {}
    }

    #[test]
    fn default_query_lists_fifty() {
        let q = ListSessionsQuery::default();
        assert_eq!(q.limit, 50);
        assert_eq!(q.offset, 0);
        assert!(q.status.is_none());
    }

    #[test]
    fn query_builder_sets_fields() {
        let q = ListSessionsQuery::default()
            .with_status(SessionStatus::Completed)
            .with_limit(10)
            .with_offset(20);
        assert_eq!(q.status, Some(SessionStatus::Completed));
        assert_eq!(q.limit, 10);
        assert_eq!(q.offset, 20);
    }
}
