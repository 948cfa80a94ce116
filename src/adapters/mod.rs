//! Adapters - Implementations of port interfaces.
//!
//! Adapters connect the clarification core to external systems:
//! - `ai` - AIProvider implementations
//! - `agents` - Generator/Synthesizer built on an AIProvider
//! - `storage` - SessionRepository implementations (in-memory, YAML files)

pub mod agents;
pub mod ai;
pub mod storage;

pub use agents::{AgentSettings, LlmGenerator, LlmSynthesizer};
pub use ai::MockAIProvider;
pub use storage::{FileSessionRepository, InMemorySessionRepository};
