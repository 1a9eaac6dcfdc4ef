//! The model relay.
//!
//! Each operation builds a system instruction, makes exactly one provider
//! call, and extracts a JSON object from the reply. Failures never escape:
//! they come back as [`RelayOutcome::Failed`], which callers collapse into
//! the null-filled fallback shapes the front-end expects.

use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use tracing::instrument;

use crate::error::ProviderError;
use crate::extract::extract_json_object;
use crate::model::{Assessment, JsonObject};
use crate::prompts;
use crate::traits::{GenerateRequest, LlmProvider};

/// Model parameters used by the relay.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RelaySettings {
    /// Model identifier passed to the provider.
    #[serde(default = "default_model")]
    pub model: String,
    /// Sampling temperature; the provider default applies when unset.
    #[serde(default)]
    pub temperature: Option<f64>,
    /// Token budget for turn evaluation.
    #[serde(default = "default_turn_max_tokens")]
    pub turn_max_tokens: u32,
    /// Token budget for lesson plans.
    #[serde(default = "default_long_max_tokens")]
    pub plan_max_tokens: u32,
    /// Token budget for parent guidance.
    #[serde(default = "default_long_max_tokens")]
    pub guidance_max_tokens: u32,
}

fn default_model() -> String {
    "claude-3-7-sonnet-20250219".to_string()
}
fn default_turn_max_tokens() -> u32 {
    300
}
fn default_long_max_tokens() -> u32 {
    500
}

impl Default for RelaySettings {
    fn default() -> Self {
        Self {
            model: default_model(),
            temperature: None,
            turn_max_tokens: default_turn_max_tokens(),
            plan_max_tokens: default_long_max_tokens(),
            guidance_max_tokens: default_long_max_tokens(),
        }
    }
}

/// Why a relay call degraded to its fallback.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum FailureReason {
    /// The provider could not be reached or timed out.
    NetworkError,
    /// The provider answered with an error or an empty reply.
    UpstreamError,
    /// The reply held no parseable JSON object.
    ParseError,
}

impl FailureReason {
    pub fn as_str(&self) -> &'static str {
        match self {
            FailureReason::NetworkError => "network_error",
            FailureReason::UpstreamError => "upstream_error",
            FailureReason::ParseError => "parse_error",
        }
    }
}

impl fmt::Display for FailureReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl From<&ProviderError> for FailureReason {
    fn from(err: &ProviderError) -> Self {
        if err.is_network() {
            FailureReason::NetworkError
        } else {
            FailureReason::UpstreamError
        }
    }
}

/// Result of a relay operation.
#[derive(Debug, Clone, PartialEq)]
pub enum RelayOutcome<T> {
    Ok(T),
    Failed {
        reason: FailureReason,
        /// Reply text, when the provider returned any.
        raw: Option<String>,
    },
}

impl<T> RelayOutcome<T> {
    /// `"ok"` or the failure reason, for the `x-relay-status` header.
    pub fn status(&self) -> &'static str {
        match self {
            RelayOutcome::Ok(_) => "ok",
            RelayOutcome::Failed { reason, .. } => reason.as_str(),
        }
    }
}

impl RelayOutcome<Assessment> {
    /// Collapse into the backward-compatible assessment shape.
    pub fn into_assessment(self) -> Assessment {
        match self {
            RelayOutcome::Ok(assessment) => assessment,
            RelayOutcome::Failed { raw, .. } => Assessment::fallback(raw),
        }
    }
}

impl RelayOutcome<JsonObject> {
    /// Collapse into the parsed object, or `{topic, raw}` on failure.
    pub fn into_topic_body(self, topic: &str) -> JsonObject {
        match self {
            RelayOutcome::Ok(map) => map,
            RelayOutcome::Failed { raw, .. } => {
                let mut map = JsonObject::new();
                map.insert("topic".into(), Value::String(topic.to_string()));
                if let Some(raw) = raw {
                    map.insert("raw".into(), Value::String(raw));
                }
                map
            }
        }
    }
}

/// Forwards prompts to an LLM provider and normalizes its replies.
pub struct Relay {
    provider: Arc<dyn LlmProvider>,
    settings: RelaySettings,
}

impl Relay {
    pub fn new(provider: Arc<dyn LlmProvider>, settings: RelaySettings) -> Self {
        Self { provider, settings }
    }

    pub fn provider_name(&self) -> &str {
        self.provider.name()
    }

    /// Evaluate a student's explanation.
    #[instrument(skip(self, topic, transcript), fields(provider = %self.provider.name()))]
    pub async fn socratic_feedback(
        &self,
        grade: i64,
        topic: &str,
        transcript: &str,
    ) -> RelayOutcome<Assessment> {
        let request = GenerateRequest {
            model: self.settings.model.clone(),
            system_prompt: prompts::socratic_system_prompt(grade, topic),
            user_message: prompts::transcript_message(transcript),
            max_tokens: self.settings.turn_max_tokens,
            temperature: self.settings.temperature,
        };

        match self.call("socratic feedback", &request).await {
            RelayOutcome::Ok((map, raw)) => {
                match serde_json::from_value::<Assessment>(Value::Object(map)) {
                    Ok(assessment) => RelayOutcome::Ok(assessment),
                    Err(e) => {
                        tracing::warn!(error = %e, "assessment has unexpected field types");
                        RelayOutcome::Failed {
                            reason: FailureReason::ParseError,
                            raw: Some(raw),
                        }
                    }
                }
            }
            RelayOutcome::Failed { reason, raw } => RelayOutcome::Failed { reason, raw },
        }
    }

    /// Build a lesson plan from a list of assessments.
    #[instrument(skip(self, topic, assessments, language), fields(provider = %self.provider.name()))]
    pub async fn lesson_plan(
        &self,
        grade: i64,
        topic: &str,
        assessments: &[Value],
        language: &str,
    ) -> RelayOutcome<JsonObject> {
        let request = GenerateRequest {
            model: self.settings.model.clone(),
            system_prompt: prompts::lesson_plan_system_prompt(grade, topic, language),
            user_message: prompts::assessments_message(assessments),
            max_tokens: self.settings.plan_max_tokens,
            temperature: self.settings.temperature,
        };
        self.call_object("lesson plan", &request).await
    }

    /// Produce guidance for a student's parents, optionally translated.
    #[instrument(skip(self, topic, assessments, language), fields(provider = %self.provider.name()))]
    pub async fn parent_guidance(
        &self,
        grade: i64,
        topic: &str,
        assessments: &[Value],
        language: &str,
    ) -> RelayOutcome<JsonObject> {
        let request = GenerateRequest {
            model: self.settings.model.clone(),
            system_prompt: prompts::parent_guidance_system_prompt(grade, topic, language),
            user_message: prompts::assessments_message(assessments),
            max_tokens: self.settings.guidance_max_tokens,
            temperature: self.settings.temperature,
        };
        self.call_object("parent guidance", &request).await
    }

    async fn call_object(&self, label: &str, request: &GenerateRequest) -> RelayOutcome<JsonObject> {
        match self.call(label, request).await {
            RelayOutcome::Ok((map, _)) => RelayOutcome::Ok(map),
            RelayOutcome::Failed { reason, raw } => RelayOutcome::Failed { reason, raw },
        }
    }

    /// One provider call plus extraction. Yields the object and the raw text.
    async fn call(
        &self,
        label: &str,
        request: &GenerateRequest,
    ) -> RelayOutcome<(JsonObject, String)> {
        let response = match self.provider.generate(request).await {
            Ok(response) => response,
            Err(e) => {
                tracing::warn!(error = %e, "{label} call failed");
                return RelayOutcome::Failed {
                    reason: FailureReason::from(&e),
                    raw: None,
                };
            }
        };

        let raw = response.content;
        tracing::debug!(latency_ms = response.latency_ms, raw = %raw, "{label} reply");

        match extract_json_object(&raw) {
            Ok(map) => RelayOutcome::Ok((map, raw)),
            Err(e) => {
                tracing::warn!(error = %e, "{label} reply was not JSON");
                RelayOutcome::Failed {
                    reason: FailureReason::ParseError,
                    raw: Some(raw),
                }
            }
        }
    }
}
