//! Parsing of model output into a [`DiagnosisReport`].
//!
//! Classification models wrap their JSON in markdown code fences often
//! enough that stripping them first is part of the contract.

use anyhow::{Context, Result};
use careline_core::DiagnosisReport;

/// Parse a model response into a report.
pub fn parse_report(raw: &str) -> Result<DiagnosisReport> {
    let cleaned = strip_code_fences(raw.trim());
    serde_json::from_str(cleaned).context("diagnosis response was not valid report JSON")
}

/// Remove a surrounding ``` or ```json fence, if present.
fn strip_code_fences(raw: &str) -> &str {
    let mut s = raw;
    if let Some(rest) = s.strip_prefix("```json") {
        s = rest;
    } else if let Some(rest) = s.strip_prefix("```") {
        s = rest;
    }
    if let Some(rest) = s.strip_suffix("```") {
        s = rest;
    }
    s.trim()
}

#[cfg(test)]
mod tests {
    use super::*;

    const CLEAN: &str = r#"{"diagnosis": ["celiac disease", "IBS"], "follow_up_questions": ["Any weight loss?"], "further_tests": ["tTG-IgA serology"]}"#;

    #[test]
    fn parses_clean_json() {
        let report = parse_report(CLEAN).unwrap();
        assert_eq!(report.conditions.len(), 2);
        assert_eq!(report.follow_up_questions.len(), 1);
        assert_eq!(report.recommended_tests, vec!["tTG-IgA serology".to_string()]);
    }

    #[test]
    fn parses_json_fenced_output() {
        let fenced = format!("```json\n{CLEAN}\n```");
        let report = parse_report(&fenced).unwrap();
        assert_eq!(report.conditions[0], "celiac disease");
    }

    #[test]
    fn parses_bare_fenced_output() {
        let fenced = format!("```\n{CLEAN}\n```");
        assert!(parse_report(&fenced).is_ok());
    }

    #[test]
    fn missing_keys_default_to_empty() {
        let report = parse_report(r#"{"diagnosis": []}"#).unwrap();
        assert!(report.is_empty());
    }

    #[test]
    fn rejects_non_json_chatter() {
        assert!(parse_report("I think the patient has a migraine.").is_err());
    }
}
