//! Idea Clarifier - Iterative idea clarification through rounds of questions
//!
//! A user submits a raw idea. Each round a Generator proposes multiple-choice
//! questions, the user answers, and a judge decides whether to keep asking.
//! Once it concludes, a Synthesizer turns the conversation into a structured
//! report with action items.
//!
//! The entry point is [`application::Orchestrator`].

pub mod adapters;
pub mod application;
pub mod config;
pub mod domain;
pub mod ports;
pub mod telemetry;
