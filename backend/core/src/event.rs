use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// One recorded call event.
/// Every transcript chunk, narrative change, and diagnosis exchange during a
/// session is logged as one of these.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CallEvent {
    pub timestamp: DateTime<Utc>,
    pub kind: CallEventKind,
    pub participant: String,
    pub content: String,
}

/// Categories of events that can occur during an intake call.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "snake_case")]
pub enum CallEventKind {
    /// The session was opened
    SessionStart,
    /// A participant joined the call
    ParticipantConnected,
    /// A participant left the call
    ParticipantDisconnected,
    /// A user utterance was transcribed
    UserTranscript,
    /// A conversation turn was finalized
    Conversation,
    /// The medical narrative changed
    NarrativeUpdated,
    /// A narrative snapshot was forwarded for diagnosis
    DiagnosisRequested,
    /// The diagnosis service returned a report
    DiagnosisReceived,
    /// A collaborator call failed
    Error,
    /// The session was closed
    SessionEnd,
}

impl CallEvent {
    pub fn new(
        kind: CallEventKind,
        participant: impl Into<String>,
        content: impl Into<String>,
    ) -> Self {
        Self {
            timestamp: Utc::now(),
            kind,
            participant: participant.into(),
            content: content.into(),
        }
    }
}

impl std::fmt::Display for CallEventKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = serde_json::to_value(self)
            .ok()
            .and_then(|v| v.as_str().map(String::from))
            .unwrap_or_else(|| format!("{:?}", self));
        write!(f, "{}", s)
    }
}
