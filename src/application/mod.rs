//! Application layer - Use cases and orchestration.
//!
//! Services depend on domain ports (traits) rather than concrete
//! implementations, so the oracles and the index can be swapped in tests.

pub mod services;

pub use services::{AdvisorService, AnswerGenerator, AskOutcome, RagService};
