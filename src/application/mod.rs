//! Application layer - Commands, Queries, and Handlers.
//!
//! This layer orchestrates domain operations and coordinates between ports.
//! Following CQRS, it separates command handlers (write) from query handlers (read).
//! [`Orchestrator`] wires every handler to one set of collaborators.

pub mod handlers;
mod orchestrator;

pub use handlers::{
    DeleteSessionCommand, DeleteSessionHandler, ForceConcludeCommand, ForceConcludeHandler,
    ForceConcludeResult, GetSessionHandler, GetSessionQuery, ListSessionsHandler, RoundDriver,
    RoundOutcome, SessionLocks, StartSessionCommand, StartSessionHandler, StartSessionResult,
    SubmitSelectionsCommand, SubmitSelectionsHandler, SubmitSelectionsResult,
    DEFAULT_CALL_TIMEOUT,
};
pub use orchestrator::{Orchestrator, OrchestratorSettings};
