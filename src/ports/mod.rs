//! Ports - Interfaces for external dependencies.
//!
//! Following hexagonal architecture, ports define the contracts between
//! the clarification core and the outside world. Adapters implement these ports.
//!
//! ## Collaborator Ports
//!
//! - `Generator` - Produces each round's understanding and questions
//! - `Synthesizer` - Produces the final report
//! - `AIProvider` - Provider-agnostic LLM completion, used by the agent adapters
//!
//! ## Persistence Ports
//!
//! - `SessionRepository` - Save, load, list and delete sessions

mod ai_provider;
mod generator;
mod session_repository;
mod synthesizer;

pub use ai_provider::{
    AIError, AIProvider, CompletionRequest, CompletionResponse, FinishReason, Message,
    MessageRole, ProviderInfo, TokenUsage,
};
pub use generator::{GenerationError, GenerationRequest, Generator};
pub use session_repository::{
    apply_list_query, ListSessionsQuery, SessionRepository, DEFAULT_LIST_LIMIT,
};
pub use synthesizer::{SynthesisRequest, Synthesizer};
