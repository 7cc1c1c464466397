use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Structured output of one diagnosis call.
///
/// Wire aliases match the classification model's JSON keys
/// (`diagnosis` / `further_tests`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DiagnosisReport {
    /// Possible conditions matching the narrative so far.
    #[serde(default, alias = "diagnosis")]
    pub conditions: Vec<String>,
    /// Clarifying questions to put to the patient next.
    #[serde(default)]
    pub follow_up_questions: Vec<String>,
    /// Tests that would confirm the suspected conditions.
    #[serde(default, alias = "further_tests")]
    pub recommended_tests: Vec<String>,
}

impl DiagnosisReport {
    pub fn is_empty(&self) -> bool {
        self.conditions.is_empty()
            && self.follow_up_questions.is_empty()
            && self.recommended_tests.is_empty()
    }
}

/// Narrative state persisted after each update.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NarrativeSnapshot {
    pub session_id: String,
    pub timestamp: DateTime<Utc>,
    pub medical_summary: String,
    pub word_count: usize,
}

impl NarrativeSnapshot {
    pub fn new(session_id: impl Into<String>, narrative: &str) -> Self {
        Self {
            session_id: session_id.into(),
            timestamp: Utc::now(),
            medical_summary: narrative.to_string(),
            word_count: narrative.split_whitespace().count(),
        }
    }
}
