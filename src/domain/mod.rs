//! Domain layer containing business logic and domain types.
//!
//! # Module Organization
//!
//! - `foundation` - Shared domain primitives (value objects, IDs, enums, errors)
//! - `clarification` - Session/round lifecycle, conversation judge, history projection

pub mod clarification;
pub mod foundation;
