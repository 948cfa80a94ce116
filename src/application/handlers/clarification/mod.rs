//! Clarification command and query handlers.

mod delete_session;
mod force_conclude;
mod get_session;
mod list_sessions;
mod round_driver;
mod session_locks;
mod start_session;
mod submit_selections;

#[cfg(test)]
mod test_doubles;

pub use delete_session::{DeleteSessionCommand, DeleteSessionHandler};
pub use force_conclude::{ForceConcludeCommand, ForceConcludeHandler, ForceConcludeResult};
pub use get_session::{GetSessionHandler, GetSessionQuery};
pub use list_sessions::ListSessionsHandler;
pub use round_driver::{RoundDriver, RoundOutcome, DEFAULT_CALL_TIMEOUT};
pub use session_locks::{SessionGuard, SessionLocks};
pub use start_session::{StartSessionCommand, StartSessionHandler, StartSessionResult};
pub use submit_selections::{
    SubmitSelectionsCommand, SubmitSelectionsHandler, SubmitSelectionsResult,
};

use crate::domain::clarification::{ClarificationError, Session};
use crate::domain::foundation::SessionId;
use crate::ports::SessionRepository;

/// Loads a session or fails with `SessionNotFound`.
pub(crate) async fn load_session(
    repository: &dyn SessionRepository,
    id: &SessionId,
) -> Result<Session, ClarificationError> {
    repository
        .find_by_id(id)
        .await?
        .ok_or(ClarificationError::SessionNotFound(*id))
}
