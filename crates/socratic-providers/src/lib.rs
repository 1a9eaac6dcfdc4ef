//! socratic-providers — LLM provider integrations.
//!
//! Implements the `LlmProvider` trait for the Anthropic Messages API and a
//! canned mock, and loads the service configuration that selects between them.

pub mod anthropic;
pub mod config;
pub mod mock;

pub use config::{create_provider, load_config_from, ProviderConfig, ServerConfig, SocraticConfig};
pub use socratic_core::error::ProviderError;
