//! System instructions and user messages sent to the model.

use serde_json::Value;

use crate::model::{is_default_language, resolve_language};

/// Instruction for evaluating a single student explanation.
pub fn socratic_system_prompt(grade: i64, topic: &str) -> String {
    format!(
        "You are a gentle and encouraging socratic teacher for Grade {grade} on \"{topic}\".\n\
         Analyze their explanation and return ONLY JSON with keys:\n\
         concept, assessment, score (1-5), strengths, weaknesses, recommendation."
    )
}

/// Instruction for building a lesson plan out of student assessments.
pub fn lesson_plan_system_prompt(grade: i64, topic: &str, language: &str) -> String {
    let prompt = format!(
        "You are a skilled teacher preparing a lesson plan for Grade {grade} students on \"{topic}\".\n\
         Use the provided student assessments (concepts, strengths, weaknesses, recommendations)\n\
         to identify the gaps and strengths inside the students understanding.\n\
         Output ONLY JSON with keys:\n\
         topic, objectives (list), activities (list), materials (list), homework (string)."
    );
    with_translation(prompt, language)
}

/// Instruction for advising parents on a student's progress.
pub fn parent_guidance_system_prompt(grade: i64, topic: &str, language: &str) -> String {
    let prompt = format!(
        "You are a supportive parent teacher who is helping guardians of Grade {grade} students\n\
         learning \"{topic}\". Based on the student's assessments (concepts, strengths,\n\
         weaknesses, recommendations), generate advice for parents and update parents on students progress.\n\n\
         Output ONLY JSON with keys:\n\
         topic,\n\
         progress_summary (string),\n\
         at_home_strategies (list),\n\
         conversation_starters (list),\n\
         encouragement_tips (list)."
    );
    with_translation(prompt, language)
}

/// Append a translation directive unless `language` is the default.
fn with_translation(mut prompt: String, language: &str) -> String {
    if !is_default_language(language) {
        prompt.push_str(&translation_directive(language));
    }
    prompt
}

pub fn translation_directive(language: &str) -> String {
    format!(
        " Translate the final JSON output into {}.",
        resolve_language(language)
    )
}

pub fn transcript_message(transcript: &str) -> String {
    format!("Transcript: {transcript}")
}

pub fn assessments_message(assessments: &[Value]) -> String {
    // Serializing a slice of `Value` cannot fail.
    let serialized = serde_json::to_string(assessments).unwrap_or_else(|_| "[]".to_string());
    format!("Here are student assessments: {serialized}")
}
