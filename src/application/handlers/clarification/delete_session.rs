//! DeleteSessionHandler - Command handler for removing a session.

use std::sync::Arc;

use tracing::info;

use crate::domain::clarification::ClarificationError;
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

use super::session_locks::SessionLocks;

/// Command to delete a session.
#[derive(Debug, Clone)]
pub struct DeleteSessionCommand {
    pub session_id: SessionId,
}

/// Handler for deleting sessions.
pub struct DeleteSessionHandler {
    repository: Arc<dyn SessionRepository>,
    locks: SessionLocks,
}

impl DeleteSessionHandler {
    pub fn new(repository: Arc<dyn SessionRepository>, locks: SessionLocks) -> Self {
        Self { repository, locks }
    }

    /// Deletes the session. Returns whether it existed.
    ///
    /// Waits for any in-flight operation on the session to finish first.
    pub async fn handle(&self, cmd: DeleteSessionCommand) -> Result<bool, ClarificationError> {
        let _guard = self.locks.acquire(cmd.session_id).await;

        let existed = self.repository.delete(&cmd.session_id).await?;
        info!(session_id = %cmd.session_id, existed, "Session deleted");
        Ok(existed)
    }
}
