//! Log Redaction Layer
//!
//! Medical narratives and transcripts carry patient-identifying data.
//! Scrubs phone numbers, email addresses, and access tokens from strings
//! prior to logging.

use regex::Regex;
use std::sync::LazyLock;

static TELEPHONE_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?:\+?\d{1,3}[-.\s]?)?\(?\d{3}\)?[-.\s]?\d{3}[-.\s]?\d{4}").unwrap()
});
static EMAIL_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"[a-zA-Z0-9._%+\-]+@[a-zA-Z0-9.\-]+\.[a-zA-Z]{2,}").unwrap()
});
static API_KEY_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(sk-[a-zA-Z0-9]{32,})|(Bearer\s+[a-zA-Z0-9\-\._~+/]+=*)").unwrap()
});

/// Redacts sensitive patterns in a string.
pub fn redact_sensitive_data(input: &str) -> String {
    let mut redacted = input.to_string();

    redacted = TELEPHONE_RE.replace_all(&redacted, "[REDACTED_PHONE]").to_string();
    redacted = EMAIL_RE.replace_all(&redacted, "[REDACTED_EMAIL]").to_string();
    redacted = API_KEY_RE.replace_all(&redacted, "[REDACTED_TOKEN]").to_string();

    redacted
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn redacts_phone_numbers() {
        let raw = "Reach the patient at +1-555-123-4567 tomorrow";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("555-123-4567"));
        assert!(clean.contains("[REDACTED_PHONE]"));
    }

    #[test]
    fn redacts_emails_and_tokens() {
        let raw = "patient@example.com authorized via Bearer eyJhbGciOiJIUzI1NiJ9";
        let clean = redact_sensitive_data(raw);
        assert!(!clean.contains("patient@example.com"));
        assert!(!clean.contains("eyJhbGciOiJIUzI1NiJ9"));
    }

    #[test]
    fn leaves_clinical_text_alone() {
        let raw = "Patient reports headache for 3 days, worse at night.";
        assert_eq!(redact_sensitive_data(raw), raw);
    }
}
