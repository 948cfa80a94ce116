//! AI Provider Adapters.
//!
//! Implementations of the AIProvider port.
//!
//! ## Available Adapters
//!
//! - `MockAIProvider` - Configurable mock for tests and demos
//!
//! Vendor integrations plug in by implementing `AIProvider`; none ship here.

mod mock_provider;

pub use mock_provider::{MockAIProvider, MockError};
