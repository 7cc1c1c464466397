//! In-memory call log for tests and dry runs.

use std::sync::{Arc, Mutex};

use anyhow::Result;
use async_trait::async_trait;

use careline_core::{CallEvent, CallLog};

#[derive(Debug, Default)]
struct Inner {
    events: Vec<CallEvent>,
    narratives: Vec<String>,
    summaries_saved: usize,
}

/// Keeps everything in memory; nothing touches disk.
///
/// Clones share state, so a test can hand one clone to the session runner
/// and inspect the other afterwards.
#[derive(Debug, Clone, Default)]
pub struct MemoryCallLog {
    inner: Arc<Mutex<Inner>>,
}

impl MemoryCallLog {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn events(&self) -> Vec<CallEvent> {
        self.inner.lock().unwrap_or_else(|e| e.into_inner()).events.clone()
    }

    pub fn narratives(&self) -> Vec<String> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .narratives
            .clone()
    }

    pub fn summaries_saved(&self) -> usize {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .summaries_saved
    }
}

#[async_trait]
impl CallLog for MemoryCallLog {
    async fn record(&mut self, event: CallEvent) -> Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .events
            .push(event);
        Ok(())
    }

    async fn save_narrative(&mut self, narrative: &str) -> Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .narratives
            .push(narrative.to_string());
        Ok(())
    }

    async fn save_summary(&mut self) -> Result<()> {
        self.inner
            .lock()
            .unwrap_or_else(|e| e.into_inner())
            .summaries_saved += 1;
        Ok(())
    }
}
