//! Core trait definitions for LLM providers.
//!
//! Implemented by the `socratic-providers` crate.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::error::ProviderError;

/// Trait for LLM backends that answer a system instruction plus one user message.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Human-readable provider name (e.g. "anthropic").
    fn name(&self) -> &str;

    /// Issue a single completion call and return the first text segment.
    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError>;
}

/// Request sent to an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateRequest {
    /// Model identifier (e.g. "claude-3-7-sonnet-20250219").
    pub model: String,
    /// System instruction.
    pub system_prompt: String,
    /// The single user message.
    pub user_message: String,
    /// Maximum tokens to generate.
    pub max_tokens: u32,
    /// Sampling temperature, or `None` for the provider default.
    pub temperature: Option<f64>,
}

/// Response from an LLM provider.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateResponse {
    /// The first text segment of the reply.
    pub content: String,
    /// Model that actually answered.
    pub model: String,
    /// Token usage.
    #[serde(default)]
    pub token_usage: TokenUsage,
    /// Latency in milliseconds.
    pub latency_ms: u64,
}

/// Token accounting reported by the provider.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct TokenUsage {
    pub prompt_tokens: u32,
    pub completion_tokens: u32,
    pub total_tokens: u32,
}
