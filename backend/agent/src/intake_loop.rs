//! Core intake session loop.
//!
//! One task per session consumes the event stream and drives the
//! summarize → throttle → diagnose pipeline in strict evaluate-then-mark
//! alternation, so the throttler state always reflects exactly the snapshot
//! that reached the diagnosis service.

use std::sync::Arc;

use anyhow::Result;
use tokio::sync::mpsc;
use tracing::{debug, info, instrument, warn};

use careline_core::{
    CallEvent, CallEventKind, CallLog, CareError, DiagnosisService, NarrativeSummarizer,
};
use careline_throttle::{ThrottleSettings, UpdateThrottler};

use crate::session::{IntakeState, IntakeSummary};

/// Discrete text-producing events delivered by the session event source.
#[derive(Debug, Clone)]
pub enum SessionEvent {
    /// Final transcription of a user utterance.
    UserTranscript { participant: String, text: String },
    /// A finalized conversation turn (either side).
    ConversationTurn { participant: String, text: String },
    ParticipantConnected { identity: String },
    ParticipantDisconnected { identity: String },
    /// End the session and flush artifacts.
    Close,
}

/// Runs one intake session to completion.
pub struct IntakeRunner {
    state: IntakeState,
    throttler: UpdateThrottler,
    summarizer: Arc<dyn NarrativeSummarizer>,
    diagnosis: Arc<dyn DiagnosisService>,
    call_log: Box<dyn CallLog>,
}

impl IntakeRunner {
    pub fn new(
        session_id: impl Into<String>,
        throttle_settings: ThrottleSettings,
        summarizer: Arc<dyn NarrativeSummarizer>,
        diagnosis: Arc<dyn DiagnosisService>,
        call_log: Box<dyn CallLog>,
    ) -> Self {
        Self {
            state: IntakeState::new(session_id),
            throttler: UpdateThrottler::new(throttle_settings),
            summarizer,
            diagnosis,
            call_log,
        }
    }

    /// Consume events until `Close` (or the sender hangs up), then flush the
    /// call summary.
    #[instrument(skip_all, fields(session_id = %self.state.session_id))]
    pub async fn run(mut self, mut rx: mpsc::Receiver<SessionEvent>) -> Result<IntakeSummary> {
        info!("Starting intake session loop");
        self.log(CallEventKind::SessionStart, "system", "intake session opened")
            .await;

        while let Some(event) = rx.recv().await {
            match event {
                SessionEvent::UserTranscript { participant, text } => {
                    self.log(CallEventKind::UserTranscript, participant, text.clone())
                        .await;
                    self.ingest(&text).await;
                }
                SessionEvent::ConversationTurn { participant, text } => {
                    self.log(CallEventKind::Conversation, participant, text.clone())
                        .await;
                    self.ingest(&text).await;
                }
                SessionEvent::ParticipantConnected { identity } => {
                    let content = format!("{identity} joined");
                    self.log(CallEventKind::ParticipantConnected, identity, content)
                        .await;
                }
                SessionEvent::ParticipantDisconnected { identity } => {
                    let content = format!("{identity} left");
                    self.log(CallEventKind::ParticipantDisconnected, identity, content)
                        .await;
                }
                SessionEvent::Close => {
                    info!("Session close requested");
                    break;
                }
            }
        }

        self.log(CallEventKind::SessionEnd, "system", "intake session closed")
            .await;
        self.call_log.save_summary().await?;

        info!(
            updates = self.state.updates_applied,
            diagnoses = self.state.diagnoses_received,
            "Intake session finished"
        );
        Ok(self.state.into())
    }

    /// Fold one chunk of transcribed text into the narrative, then offer the
    /// resulting snapshot to the throttler.
    async fn ingest(&mut self, text: &str) {
        let updated = match self.summarizer.update(&self.state.narrative, text).await {
            Ok(updated) => updated,
            Err(e) => {
                // A failed update never wipes the narrative; the session
                // keeps running on the previous state.
                let err = CareError::Summarizer(e.to_string());
                warn!(error = %err, "Summarizer update failed; keeping narrative");
                self.log(CallEventKind::Error, "summarizer", err.to_string())
                    .await;
                return;
            }
        };

        if updated != self.state.narrative {
            self.state.narrative = updated;
            self.state.updates_applied += 1;
            self.log(
                CallEventKind::NarrativeUpdated,
                "system",
                self.state.narrative.clone(),
            )
            .await;
            if let Err(e) = self.call_log.save_narrative(&self.state.narrative).await {
                warn!(error = %e, "Failed to persist narrative snapshot");
            }
        } else {
            debug!("No new medical information");
        }

        self.maybe_diagnose().await;
    }

    async fn maybe_diagnose(&mut self) {
        if !self.throttler.should_send_update(&self.state.narrative) {
            return;
        }

        let narrative = self.state.narrative.clone();
        self.log(CallEventKind::DiagnosisRequested, "system", narrative.clone())
            .await;

        match self.diagnosis.diagnose(&narrative).await {
            Ok(report) => {
                // Only a completed downstream call counts as sent.
                self.throttler.mark_sent(&narrative);
                self.state.diagnoses_received += 1;
                let service = self.diagnosis.name().to_string();
                let rendered =
                    serde_json::to_string(&report).unwrap_or_else(|e| e.to_string());
                self.log(CallEventKind::DiagnosisReceived, service, rendered)
                    .await;
                self.state.last_report = Some(report);
            }
            Err(e) => {
                let err = CareError::Diagnosis {
                    service: self.diagnosis.name().to_string(),
                    message: e.to_string(),
                };
                warn!(error = %err, "Diagnosis call failed; will retry on a later snapshot");
                self.log(CallEventKind::Error, "diagnosis", err.to_string())
                    .await;
            }
        }
    }

    async fn log(
        &mut self,
        kind: CallEventKind,
        participant: impl Into<String>,
        content: impl Into<String>,
    ) {
        let event = CallEvent::new(kind, participant, content);
        if let Err(e) = self.call_log.record(event).await {
            warn!(error = %CareError::Storage(e.to_string()), "Failed to record call event");
        }
    }
}
