//! Per-session intake state.

use careline_core::DiagnosisReport;

/// Active state of one intake conversation session.
#[derive(Debug, Clone)]
pub struct IntakeState {
    pub session_id: String,
    /// Cumulative medical narrative, as last returned by the summarizer.
    pub narrative: String,
    /// Number of events that changed the narrative.
    pub updates_applied: u32,
    /// Number of completed diagnosis calls.
    pub diagnoses_received: u32,
    pub last_report: Option<DiagnosisReport>,
}

impl IntakeState {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
            narrative: String::new(),
            updates_applied: 0,
            diagnoses_received: 0,
            last_report: None,
        }
    }
}

/// What a finished session hands back to its host.
#[derive(Debug, Clone)]
pub struct IntakeSummary {
    pub session_id: String,
    pub narrative: String,
    pub updates_applied: u32,
    pub diagnoses_received: u32,
    pub last_report: Option<DiagnosisReport>,
}

impl From<IntakeState> for IntakeSummary {
    fn from(state: IntakeState) -> Self {
        Self {
            session_id: state.session_id,
            narrative: state.narrative,
            updates_applied: state.updates_applied,
            diagnoses_received: state.diagnoses_received,
            last_report: state.last_report,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_state_is_empty() {
        let state = IntakeState::new("s1");
        assert_eq!(state.session_id, "s1");
        assert!(state.narrative.is_empty());
        assert_eq!(state.updates_applied, 0);
        assert!(state.last_report.is_none());
    }
}
