//! Application handlers.
//!
//! Command and query handlers that orchestrate domain operations.

pub mod clarification;

pub use clarification::{
    DeleteSessionCommand, DeleteSessionHandler, ForceConcludeCommand, ForceConcludeHandler,
    ForceConcludeResult, GetSessionHandler, GetSessionQuery, ListSessionsHandler, RoundDriver,
    RoundOutcome, SessionLocks, StartSessionCommand, StartSessionHandler, StartSessionResult,
    SubmitSelectionsCommand, SubmitSelectionsHandler, SubmitSelectionsResult,
    DEFAULT_CALL_TIMEOUT,
};
