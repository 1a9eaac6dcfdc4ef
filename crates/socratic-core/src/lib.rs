//! socratic-core — Data model, prompts, and the model relay.
//!
//! This crate holds everything between an HTTP request body and the LLM
//! provider: prompt construction, tolerant JSON extraction from free-form
//! model output, the relay operations, and the in-memory student log.

pub mod error;
pub mod extract;
pub mod model;
pub mod prompts;
pub mod relay;
pub mod store;
pub mod traits;

pub use error::ProviderError;
pub use relay::{FailureReason, Relay, RelayOutcome, RelaySettings};
pub use store::StudentLogStore;
