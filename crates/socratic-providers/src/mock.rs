//! Mock provider for tests and offline front-end development.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;

use socratic_core::error::ProviderError;
use socratic_core::traits::{GenerateRequest, GenerateResponse, LlmProvider, TokenUsage};

/// A mock LLM provider that answers without network access.
///
/// Replies are chosen by matching a substring against the system prompt and
/// user message, falling back to a default reply.
pub struct MockProvider {
    /// Ordered (substring, reply) pairs; first match wins.
    responses: Vec<(String, String)>,
    default_response: Result<String, MockFailure>,
    call_count: AtomicU32,
    last_request: Mutex<Option<GenerateRequest>>,
}

/// Error a failing mock reports on every call.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MockFailure {
    Network,
    Upstream,
}

impl MockProvider {
    /// Create a mock with the given substring → reply mappings.
    pub fn new(responses: Vec<(String, String)>, default_response: &str) -> Self {
        Self {
            responses,
            default_response: Ok(default_response.to_string()),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Create a mock that always returns the same text.
    pub fn with_fixed_response(response: &str) -> Self {
        Self::new(Vec::new(), response)
    }

    /// Create a mock whose every call fails.
    pub fn failing(failure: MockFailure) -> Self {
        Self {
            responses: Vec::new(),
            default_response: Err(failure),
            call_count: AtomicU32::new(0),
            last_request: Mutex::new(None),
        }
    }

    /// Canned, well-formed replies for each relay operation.
    pub fn demo() -> Self {
        Self::new(
            vec![
                ("socratic teacher".to_string(), DEMO_ASSESSMENT.to_string()),
                ("lesson plan".to_string(), DEMO_LESSON_PLAN.to_string()),
                ("parent teacher".to_string(), DEMO_GUIDANCE.to_string()),
            ],
            "I can only help with tutoring requests.",
        )
    }

    pub fn call_count(&self) -> u32 {
        self.call_count.load(Ordering::Relaxed)
    }

    pub fn last_request(&self) -> Option<GenerateRequest> {
        self.last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        "mock"
    }

    async fn generate(&self, request: &GenerateRequest) -> Result<GenerateResponse, ProviderError> {
        self.call_count.fetch_add(1, Ordering::Relaxed);
        *self
            .last_request
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner()) = Some(request.clone());

        let content = match self.responses.iter().find(|(key, _)| {
            request.system_prompt.contains(key.as_str()) || request.user_message.contains(key.as_str())
        }) {
            Some((_, reply)) => reply.clone(),
            None => match &self.default_response {
                Ok(reply) => reply.clone(),
                Err(MockFailure::Network) => {
                    return Err(ProviderError::NetworkError("mock connection refused".into()))
                }
                Err(MockFailure::Upstream) => {
                    return Err(ProviderError::ApiError {
                        status: 500,
                        message: "mock upstream failure".into(),
                    })
                }
            },
        };

        let prompt_tokens = ((request.system_prompt.len() + request.user_message.len()) / 4) as u32;
        let completion_tokens = (content.len() / 4) as u32; // Rough estimate

        Ok(GenerateResponse {
            content,
            model: request.model.clone(),
            token_usage: TokenUsage {
                prompt_tokens,
                completion_tokens,
                total_tokens: prompt_tokens + completion_tokens,
            },
            latency_ms: 1,
        })
    }
}

const DEMO_ASSESSMENT: &str = r#"{"concept": "fractions", "assessment": "Understands halves but mixes up numerator and denominator.", "score": 3, "strengths": "Uses concrete examples", "weaknesses": "Vocabulary for fraction parts", "recommendation": "Practice naming parts with fraction strips"}"#;

const DEMO_LESSON_PLAN: &str = r#"{"topic": "fractions", "objectives": ["Name numerator and denominator"], "activities": ["Fraction strip matching"], "materials": ["Fraction strips"], "homework": "Find three fractions at home"}"#;

const DEMO_GUIDANCE: &str = r#"{"topic": "fractions", "progress_summary": "Making steady progress with halves and quarters.", "at_home_strategies": ["Cut food into equal parts"], "conversation_starters": ["How many pieces make a whole?"], "encouragement_tips": ["Praise careful explanations"]}"#;
