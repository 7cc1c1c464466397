//! The update throttler: rate floor, change detection, staleness ceiling,
//! word-count and section triggers, checked in that order.

use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tracing::{debug, info};

fn now_secs() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_secs()
}

// ---------------------------------------------------------------------------
// Settings
// ---------------------------------------------------------------------------

/// Throttle policy knobs, read from the `diagnosis_throttling` config section.
///
/// Every field is optional in the file; missing keys take the documented
/// defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ThrottleSettings {
    /// Hard floor: no send happens faster than this, whatever the content.
    pub minimum_interval_seconds: u64,
    /// Soft ceiling: once exceeded, the next distinct narrative goes through.
    pub maximum_interval_seconds: u64,
    /// Words added since the last send that justify an early call.
    pub word_count_threshold: usize,
    /// Section markers (e.g. "ALLERGIES:") whose first appearance forces an
    /// early send. Checked in configured order.
    pub trigger_sections: Vec<String>,
}

impl Default for ThrottleSettings {
    fn default() -> Self {
        Self {
            minimum_interval_seconds: 15,
            maximum_interval_seconds: 60,
            word_count_threshold: 20,
            trigger_sections: Vec::new(),
        }
    }
}

// ---------------------------------------------------------------------------
// Decision
// ---------------------------------------------------------------------------

/// Why an update was approved.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendReason {
    /// The maximum interval elapsed since the last send.
    MaxIntervalElapsed,
    /// Enough words were added since the last send.
    WordThresholdMet,
    /// A configured section marker appeared for the first time.
    TriggerSection,
}

/// Why an update was held back.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum HoldReason {
    /// The minimum interval has not elapsed since the last send.
    MinimumInterval,
    /// The candidate is identical to the last narrative sent.
    Unchanged,
    /// No force condition was met.
    NoTrigger,
}

/// Outcome of evaluating one candidate narrative.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ThrottleDecision {
    Send(SendReason),
    Hold(HoldReason),
}

impl ThrottleDecision {
    pub fn is_send(&self) -> bool {
        matches!(self, Self::Send(_))
    }
}

// ---------------------------------------------------------------------------
// Throttler
// ---------------------------------------------------------------------------

/// Gates narrative snapshots on their way to the diagnosis service.
///
/// Holds the last-sent snapshot (time, text, word count) and applies the
/// policy in [`ThrottleSettings`]. State changes only through
/// [`mark_sent`](Self::mark_sent); evaluation is a pure read.
#[derive(Debug, Clone)]
pub struct UpdateThrottler {
    settings: ThrottleSettings,
    /// Unix seconds of the last send; 0 means never sent, so the first
    /// distinct candidate always clears the floor.
    last_sent_at: u64,
    last_sent_text: String,
    last_sent_word_count: usize,
}

impl UpdateThrottler {
    pub fn new(settings: ThrottleSettings) -> Self {
        info!(
            min = settings.minimum_interval_seconds,
            max = settings.maximum_interval_seconds,
            word_threshold = settings.word_count_threshold,
            sections = settings.trigger_sections.len(),
            "Update throttler initialized"
        );
        Self {
            settings,
            last_sent_at: 0,
            last_sent_text: String::new(),
            last_sent_word_count: 0,
        }
    }

    /// Should `narrative` be forwarded for diagnosis now?
    pub fn should_send_update(&self, narrative: &str) -> bool {
        self.evaluate_at(narrative, now_secs()).is_send()
    }

    /// Decision logic against an explicit clock reading.
    ///
    /// Checks run in priority order and the first match wins; the order is
    /// observable through the logged reason.
    pub fn evaluate_at(&self, narrative: &str, now: u64) -> ThrottleDecision {
        let elapsed = now.saturating_sub(self.last_sent_at);

        if elapsed < self.settings.minimum_interval_seconds {
            debug!(
                elapsed,
                min = self.settings.minimum_interval_seconds,
                "Too soon since last send"
            );
            return ThrottleDecision::Hold(HoldReason::MinimumInterval);
        }

        if narrative == self.last_sent_text {
            debug!("Narrative unchanged");
            return ThrottleDecision::Hold(HoldReason::Unchanged);
        }

        if elapsed >= self.settings.maximum_interval_seconds {
            info!(elapsed, "Maximum interval reached, forcing send");
            return ThrottleDecision::Send(SendReason::MaxIntervalElapsed);
        }

        // Signed: a narrative that shrank can never meet the threshold.
        let words_added = word_count(narrative) as i64 - self.last_sent_word_count as i64;
        if words_added >= self.settings.word_count_threshold as i64 {
            info!(words_added, "Word threshold met");
            return ThrottleDecision::Send(SendReason::WordThresholdMet);
        }

        for section in &self.settings.trigger_sections {
            if narrative.contains(section.as_str()) && !self.last_sent_text.contains(section.as_str())
            {
                info!(section = %section, "Trigger section appeared");
                return ThrottleDecision::Send(SendReason::TriggerSection);
            }
        }

        debug!(elapsed, words_added, "No send condition met");
        ThrottleDecision::Hold(HoldReason::NoTrigger)
    }

    /// Record that `narrative` was actually forwarded.
    ///
    /// The caller must pass the exact text that was sent — the next
    /// evaluation compares against it verbatim.
    pub fn mark_sent(&mut self, narrative: &str) {
        self.mark_sent_at(narrative, now_secs());
    }

    /// [`mark_sent`](Self::mark_sent) against an explicit clock reading.
    pub fn mark_sent_at(&mut self, narrative: &str, now: u64) {
        self.last_sent_at = now;
        self.last_sent_text = narrative.to_string();
        self.last_sent_word_count = word_count(narrative);
        debug!(
            words = self.last_sent_word_count,
            at = now,
            "Marked narrative sent"
        );
    }

    pub fn settings(&self) -> &ThrottleSettings {
        &self.settings
    }

    pub fn last_sent_text(&self) -> &str {
        &self.last_sent_text
    }
}

/// Whitespace-token count.
///
/// The same function feeds the threshold check and the stored count so the
/// words-added delta cannot drift.
pub fn word_count(text: &str) -> usize {
    text.split_whitespace().count()
}

#[cfg(test)]
mod tests {
    use super::*;

    const T0: u64 = 1_000;

    fn settings_with_allergies() -> ThrottleSettings {
        ThrottleSettings {
            trigger_sections: vec!["ALLERGIES:".to_string()],
            ..Default::default()
        }
    }

    fn sent(text: &str, at: u64) -> UpdateThrottler {
        let mut t = UpdateThrottler::new(settings_with_allergies());
        t.mark_sent_at(text, at);
        t
    }

    #[test]
    fn first_distinct_candidate_is_sent() {
        // Never sent: last_sent_at is 0, so any realistic clock reading
        // clears both the floor and the ceiling.
        let t = UpdateThrottler::new(settings_with_allergies());
        assert_eq!(
            t.evaluate_at("Patient reports headache.", T0),
            ThrottleDecision::Send(SendReason::MaxIntervalElapsed)
        );
    }

    #[test]
    fn first_empty_candidate_is_unchanged() {
        // The initial last-sent text is empty, so an empty first candidate
        // carries no new information.
        let t = UpdateThrottler::new(ThrottleSettings::default());
        assert_eq!(
            t.evaluate_at("", T0),
            ThrottleDecision::Hold(HoldReason::Unchanged)
        );
    }

    #[test]
    fn identical_resend_within_floor_reports_floor() {
        // Reason ordering matters: inside the floor window the floor wins,
        // even though the content is also unchanged.
        let t = sent("Patient reports headache.", T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache.", T0 + 5),
            ThrottleDecision::Hold(HoldReason::MinimumInterval)
        );
    }

    #[test]
    fn floor_wins_over_every_force_condition() {
        let t = sent("Patient reports headache.", T0);
        let loaded = format!(
            "Patient reports headache. ALLERGIES: penicillin. {}",
            "word ".repeat(50)
        );
        assert_eq!(
            t.evaluate_at(&loaded, T0 + 14),
            ThrottleDecision::Hold(HoldReason::MinimumInterval)
        );
    }

    #[test]
    fn small_change_below_every_trigger_is_held() {
        let t = sent("Patient reports headache.", T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache and nausea.", T0 + 20),
            ThrottleDecision::Hold(HoldReason::NoTrigger)
        );
    }

    #[test]
    fn ceiling_forces_any_distinct_change() {
        let t = sent("Patient reports headache.", T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache and nausea.", T0 + 65),
            ThrottleDecision::Send(SendReason::MaxIntervalElapsed)
        );
    }

    #[test]
    fn identical_resend_past_ceiling_is_still_unchanged() {
        // Staleness alone never justifies resending the same text.
        let t = sent("Patient reports headache.", T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache.", T0 + 120),
            ThrottleDecision::Hold(HoldReason::Unchanged)
        );
    }

    #[test]
    fn new_trigger_section_forces_send() {
        let t = sent("Patient reports headache.", T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache. ALLERGIES: penicillin.", T0 + 20),
            ThrottleDecision::Send(SendReason::TriggerSection)
        );
    }

    #[test]
    fn trigger_section_present_in_both_does_not_fire() {
        let t = sent("Patient reports headache. ALLERGIES: penicillin.", T0);
        assert_eq!(
            t.evaluate_at(
                "Patient reports headache. ALLERGIES: penicillin. Mild fever.",
                T0 + 20
            ),
            ThrottleDecision::Hold(HoldReason::NoTrigger)
        );
    }

    #[test]
    fn word_threshold_forces_send_before_ceiling() {
        let t = sent("Patient reports headache.", T0);
        let grown = format!("Patient reports headache. {}", "detail ".repeat(25));
        assert_eq!(
            t.evaluate_at(&grown, T0 + 20),
            ThrottleDecision::Send(SendReason::WordThresholdMet)
        );
    }

    #[test]
    fn shrinking_narrative_never_meets_threshold() {
        let long = format!("Patient reports headache. {}", "detail ".repeat(30));
        let t = sent(&long, T0);
        assert_eq!(
            t.evaluate_at("Patient reports headache.", T0 + 20),
            ThrottleDecision::Hold(HoldReason::NoTrigger)
        );
    }

    #[test]
    fn shrinking_narrative_with_zero_threshold_is_still_held() {
        let mut settings = ThrottleSettings::default();
        settings.word_count_threshold = 0;
        let mut t = UpdateThrottler::new(settings);
        t.mark_sent_at("one two three four", T0);
        // -2 words added is below a threshold of 0.
        assert_eq!(
            t.evaluate_at("one two", T0 + 20),
            ThrottleDecision::Hold(HoldReason::NoTrigger)
        );
    }

    #[test]
    fn mark_sent_is_idempotent_apart_from_the_timestamp() {
        let mut once = UpdateThrottler::new(ThrottleSettings::default());
        once.mark_sent_at("Patient reports headache.", T0);

        let mut twice = UpdateThrottler::new(ThrottleSettings::default());
        twice.mark_sent_at("Patient reports headache.", T0);
        twice.mark_sent_at("Patient reports headache.", T0 + 3);

        assert_eq!(once.last_sent_text, twice.last_sent_text);
        assert_eq!(once.last_sent_word_count, twice.last_sent_word_count);
        assert_eq!(twice.last_sent_at, T0 + 3);
    }

    #[test]
    fn mark_sent_recomputes_the_word_count() {
        let mut t = UpdateThrottler::new(ThrottleSettings::default());
        t.mark_sent_at("  leading   and \n trailing  whitespace  ", T0);
        assert_eq!(t.last_sent_word_count, 4);
        assert_eq!(t.last_sent_text, "  leading   and \n trailing  whitespace  ");
    }

    #[test]
    fn word_count_splits_on_whitespace_runs() {
        assert_eq!(word_count(""), 0);
        assert_eq!(word_count("   "), 0);
        assert_eq!(word_count("one"), 1);
        assert_eq!(word_count(" one\ttwo \n three "), 3);
    }

    #[test]
    fn evaluation_does_not_mutate_state() {
        let t = sent("Patient reports headache.", T0);
        let candidate = "Patient reports headache. ALLERGIES: penicillin.";
        let first = t.evaluate_at(candidate, T0 + 20);
        let second = t.evaluate_at(candidate, T0 + 20);
        assert_eq!(first, second);
        assert_eq!(t.last_sent_text(), "Patient reports headache.");
    }

    #[test]
    fn trigger_sections_checked_in_configured_order() {
        let settings = ThrottleSettings {
            trigger_sections: vec!["MEDICATIONS:".to_string(), "ALLERGIES:".to_string()],
            ..Default::default()
        };
        let mut t = UpdateThrottler::new(settings);
        t.mark_sent_at("Patient reports headache.", T0);
        // Both markers are new; the send fires regardless of which matched,
        // but both-new must still be a single approval.
        assert_eq!(
            t.evaluate_at(
                "Patient reports headache. MEDICATIONS: ibuprofen. ALLERGIES: none.",
                T0 + 20
            ),
            ThrottleDecision::Send(SendReason::TriggerSection)
        );
    }

    #[test]
    fn default_settings_match_documented_values() {
        let s = ThrottleSettings::default();
        assert_eq!(s.minimum_interval_seconds, 15);
        assert_eq!(s.maximum_interval_seconds, 60);
        assert_eq!(s.word_count_threshold, 20);
        assert!(s.trigger_sections.is_empty());
    }

    #[test]
    fn partial_config_section_fills_missing_keys() {
        let s: ThrottleSettings =
            serde_yaml::from_str("minimum_interval_seconds: 5\ntrigger_sections: [\"ALLERGIES:\"]")
                .unwrap();
        assert_eq!(s.minimum_interval_seconds, 5);
        assert_eq!(s.maximum_interval_seconds, 60);
        assert_eq!(s.word_count_threshold, 20);
        assert_eq!(s.trigger_sections, vec!["ALLERGIES:".to_string()]);
    }
}
