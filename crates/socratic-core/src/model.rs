//! Core data model types for socratic.
//!
//! Request bodies accepted by the router, the assessment record produced by
//! the relay, the fallback shapes, and the student log entry.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Deserializer, Serialize};
use serde_json::Value;
use uuid::Uuid;

/// A JSON object as returned by the model.
pub type JsonObject = serde_json::Map<String, Value>;

/// A student's explanation of a topic, as captured by the front-end.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TurnRequest {
    /// Student's grade level.
    pub grade: i64,
    /// Topic the student is learning.
    pub topic: String,
    /// Transcript of the student's spoken explanation.
    pub transcript: String,
}

/// Request for a lesson plan tailored to a set of assessments.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LessonPlanRequest {
    pub grade: i64,
    pub topic: String,
    /// Assessment mappings, forwarded to the model without shape checks.
    pub assessments: Vec<Value>,
    #[serde(default = "default_language")]
    pub language: String,
}

/// Request for guidance aimed at a student's parents or guardians.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ParentViewRequest {
    pub grade: i64,
    pub topic: String,
    pub assessments: Vec<Value>,
    #[serde(default = "default_language")]
    pub language: String,
}

fn default_language() -> String {
    DEFAULT_LANGUAGE.to_string()
}

/// Structured evaluation of a student's explanation.
///
/// Every field may be null, even when the model call succeeded. `raw` only
/// appears on the fallback path, and only when some reply text was obtained.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Assessment {
    #[serde(default, deserialize_with = "lenient_text")]
    pub concept: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub assessment: Option<String>,
    /// Always within `1..=5` when present.
    #[serde(default, deserialize_with = "lenient_score")]
    pub score: Option<u8>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub strengths: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub weaknesses: Option<String>,
    #[serde(default, deserialize_with = "lenient_text")]
    pub recommendation: Option<String>,
    #[serde(default, skip_deserializing, skip_serializing_if = "Option::is_none")]
    pub raw: Option<String>,
}

impl Assessment {
    /// The null-filled fallback record.
    pub fn fallback(raw: Option<String>) -> Self {
        Self {
            raw,
            ..Self::default()
        }
    }
}

pub const MIN_SCORE: u8 = 1;
pub const MAX_SCORE: u8 = 5;

fn lenient_text<'de, D>(deserializer: D) -> Result<Option<String>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    Ok(value.and_then(|v| match v {
        Value::Null => None,
        Value::String(s) => Some(s),
        Value::Array(items) => {
            let parts: Vec<String> = items
                .into_iter()
                .map(|item| match item {
                    Value::String(s) => s,
                    other => other.to_string(),
                })
                .collect();
            Some(parts.join("; "))
        }
        other => Some(other.to_string()),
    }))
}

fn lenient_score<'de, D>(deserializer: D) -> Result<Option<u8>, D::Error>
where
    D: Deserializer<'de>,
{
    let value = Option::<Value>::deserialize(deserializer)?;
    let number = match value {
        Some(Value::Number(n)) => n.as_f64(),
        // Models sometimes answer "4" or "4/5".
        Some(Value::String(s)) => s
            .split('/')
            .next()
            .and_then(|head| head.trim().parse::<f64>().ok()),
        _ => None,
    };
    Ok(number.filter(|n| n.is_finite()).map(clamp_score))
}

fn clamp_score(n: f64) -> u8 {
    n.round().clamp(MIN_SCORE as f64, MAX_SCORE as f64) as u8
}

/// One logged student turn.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogEntry {
    pub id: Uuid,
    pub topic: String,
    pub transcript: String,
    pub logged_at: DateTime<Utc>,
}

impl LogEntry {
    pub fn new(topic: impl Into<String>, transcript: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            topic: topic.into(),
            transcript: transcript.into(),
            logged_at: Utc::now(),
        }
    }
}

/// A language parents can ask guidance to be translated into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct LanguageOption {
    pub name: &'static str,
    pub code: &'static str,
}

pub const DEFAULT_LANGUAGE: &str = "English";

/// Languages offered by the front-end.
pub const LANGUAGES: &[LanguageOption] = &[
    LanguageOption { name: "English", code: "en" },
    LanguageOption { name: "Spanish", code: "es" },
    LanguageOption { name: "French", code: "fr" },
    LanguageOption { name: "Chinese (Simplified)", code: "zh" },
    LanguageOption { name: "Chinese (Traditional)", code: "zh-Hant" },
    LanguageOption { name: "Arabic", code: "ar" },
    LanguageOption { name: "Hindi", code: "hi" },
    LanguageOption { name: "Portuguese", code: "pt" },
    LanguageOption { name: "Russian", code: "ru" },
    LanguageOption { name: "Japanese", code: "ja" },
    LanguageOption { name: "Korean", code: "ko" },
];

/// Map a language name or code to its display name.
///
/// Unknown values pass through trimmed, so free-form languages still reach
/// the translation directive.
pub fn resolve_language(input: &str) -> String {
    let trimmed = input.trim();
    LANGUAGES
        .iter()
        .find(|l| l.name.eq_ignore_ascii_case(trimmed) || l.code.eq_ignore_ascii_case(trimmed))
        .map(|l| l.name.to_string())
        .unwrap_or_else(|| trimmed.to_string())
}

/// Whether `input` names the default language (or is empty).
pub fn is_default_language(input: &str) -> bool {
    let trimmed = input.trim();
    trimmed.is_empty() || resolve_language(trimmed) == DEFAULT_LANGUAGE
}
