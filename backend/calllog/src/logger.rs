//! File-backed call logger: one log file per intake session plus JSON
//! artifacts (narrative snapshot, end-of-call summary).

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::Serialize;
use tokio::fs;
use tokio::io::AsyncWriteExt;
use tracing::info;

use careline_core::{CallEvent, CallLog, NarrativeSnapshot};
use careline_logging::redact_sensitive_data;

/// End-of-call summary document.
#[derive(Debug, Serialize)]
struct CallSummary<'a> {
    session_id: &'a str,
    call_log: &'a [CallEvent],
}

/// Per-session call logger.
///
/// Creates its directories up front; every recorded event is appended to the
/// session's log file immediately and kept in memory for the summary.
pub struct CallLogger {
    session_id: String,
    log_path: PathBuf,
    extract_path: PathBuf,
    summary_dir: PathBuf,
    entries: Vec<CallEvent>,
}

impl CallLogger {
    pub async fn create(
        session_id: impl Into<String>,
        log_dir: impl AsRef<Path>,
        extract_dir: impl AsRef<Path>,
        summary_dir: impl AsRef<Path>,
    ) -> Result<Self> {
        let session_id = session_id.into();
        let log_dir = log_dir.as_ref();
        let extract_dir = extract_dir.as_ref();
        let summary_dir = summary_dir.as_ref().to_path_buf();

        for dir in [log_dir, extract_dir, summary_dir.as_path()] {
            fs::create_dir_all(dir)
                .await
                .with_context(|| format!("failed to create session directory: {}", dir.display()))?;
        }

        let logger = Self {
            log_path: log_dir.join(format!("intake_call_{session_id}.log")),
            extract_path: extract_dir.join(format!("facts_{session_id}.json")),
            summary_dir,
            session_id,
            entries: Vec::new(),
        };

        logger
            .append_line(&format!("[session_start] Session: {}", logger.session_id))
            .await?;
        info!(path = %logger.log_path.display(), "Started new intake call log");
        Ok(logger)
    }

    pub fn session_id(&self) -> &str {
        &self.session_id
    }

    pub fn entries(&self) -> &[CallEvent] {
        &self.entries
    }

    async fn append_line(&self, line: &str) -> Result<()> {
        let stamped = format!("{} - {}\n", Utc::now().format("%Y-%m-%d %H:%M:%S"), line);
        let mut file = fs::OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.log_path)
            .await
            .with_context(|| format!("failed to open call log: {}", self.log_path.display()))?;
        file.write_all(stamped.as_bytes())
            .await
            .with_context(|| format!("failed to write call log: {}", self.log_path.display()))?;
        Ok(())
    }
}

#[async_trait]
impl CallLog for CallLogger {
    async fn record(&mut self, event: CallEvent) -> Result<()> {
        self.append_line(&format!(
            "[{}] {}: {}",
            event.kind, event.participant, event.content
        ))
        .await?;

        // Runtime logs are shared; scrub PII there, keep the session file raw.
        info!(
            "[CALL LOG] [{}] {}: {}",
            event.kind,
            event.participant,
            redact_sensitive_data(&event.content)
        );

        self.entries.push(event);
        Ok(())
    }

    async fn save_narrative(&mut self, narrative: &str) -> Result<()> {
        let snapshot = NarrativeSnapshot::new(self.session_id.clone(), narrative);
        write_json(&self.extract_path, &snapshot).await
    }

    async fn save_summary(&mut self) -> Result<()> {
        if self.entries.is_empty() {
            return Ok(());
        }
        let filename = format!(
            "summary_{}_{}.json",
            self.session_id,
            Utc::now().format("%Y%m%d_%H%M%S")
        );
        let path = self.summary_dir.join(filename);
        let summary = CallSummary {
            session_id: &self.session_id,
            call_log: &self.entries,
        };
        write_json(&path, &summary).await?;
        info!(path = %path.display(), "Saved call summary");
        Ok(())
    }
}

/// Write pretty JSON atomically (temp file, then rename).
async fn write_json<T: Serialize>(path: &Path, value: &T) -> Result<()> {
    let json = serde_json::to_string_pretty(value).context("failed to serialize JSON artifact")?;
    let tmp_path = path.with_extension("json.tmp");
    fs::write(&tmp_path, json.as_bytes())
        .await
        .with_context(|| format!("failed to write temp file: {}", tmp_path.display()))?;
    fs::rename(&tmp_path, path)
        .await
        .with_context(|| format!("failed to rename into place: {}", path.display()))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use careline_core::CallEventKind;

    async fn logger_in(dir: &Path) -> CallLogger {
        CallLogger::create(
            "test_session",
            dir.join("logs"),
            dir.join("extracts"),
            dir.join("summaries"),
        )
        .await
        .unwrap()
    }

    #[tokio::test]
    async fn records_events_to_the_session_file() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_in(dir.path()).await;

        logger
            .record(CallEvent::new(
                CallEventKind::UserTranscript,
                "caller",
                "I have a headache",
            ))
            .await
            .unwrap();

        let raw = std::fs::read_to_string(dir.path().join("logs/intake_call_test_session.log"))
            .unwrap();
        assert!(raw.contains("[session_start] Session: test_session"));
        assert!(raw.contains("[user_transcript] caller: I have a headache"));
        assert_eq!(logger.entries().len(), 1);
    }

    #[tokio::test]
    async fn narrative_snapshot_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_in(dir.path()).await;

        logger
            .save_narrative("Patient reports headache and nausea.")
            .await
            .unwrap();

        let raw =
            std::fs::read_to_string(dir.path().join("extracts/facts_test_session.json")).unwrap();
        let snapshot: NarrativeSnapshot = serde_json::from_str(&raw).unwrap();
        assert_eq!(snapshot.session_id, "test_session");
        assert_eq!(snapshot.word_count, 5);
    }

    #[tokio::test]
    async fn summary_contains_all_entries() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_in(dir.path()).await;

        for i in 0..3 {
            logger
                .record(CallEvent::new(
                    CallEventKind::Conversation,
                    "agent",
                    format!("turn {i}"),
                ))
                .await
                .unwrap();
        }
        logger.save_summary().await.unwrap();

        let mut files = std::fs::read_dir(dir.path().join("summaries")).unwrap();
        let entry = files.next().unwrap().unwrap();
        let raw = std::fs::read_to_string(entry.path()).unwrap();
        let value: serde_json::Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(value["session_id"], "test_session");
        assert_eq!(value["call_log"].as_array().unwrap().len(), 3);
    }

    #[tokio::test]
    async fn empty_call_writes_no_summary() {
        let dir = tempfile::tempdir().unwrap();
        let mut logger = logger_in(dir.path()).await;
        logger.save_summary().await.unwrap();
        let count = std::fs::read_dir(dir.path().join("summaries")).unwrap().count();
        assert_eq!(count, 0);
    }
}
