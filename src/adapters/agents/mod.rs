//! LLM-backed Agents
//!
//! Generator and Synthesizer implementations that talk to any `AIProvider`.
//! Each call sends the request as a pretty-printed JSON user message and
//! expects a single JSON object back.

mod llm_generator;
mod llm_synthesizer;
mod support;

pub use llm_generator::LlmGenerator;
pub use llm_synthesizer::LlmSynthesizer;
pub use support::{parse_reply, AgentSettings};
