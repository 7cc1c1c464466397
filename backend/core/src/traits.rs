use anyhow::Result;
use async_trait::async_trait;

use crate::event::CallEvent;
use crate::types::DiagnosisReport;

/// Maintains the cumulative medical narrative for one session.
///
/// Implementations fold newly transcribed text into the running narrative
/// and may return it unchanged when nothing medically relevant was added.
#[async_trait]
pub trait NarrativeSummarizer: Send + Sync {
    async fn update(&self, narrative: &str, new_text: &str) -> Result<String>;
}

/// Downstream classification service: narrative in, structured report out.
#[async_trait]
pub trait DiagnosisService: Send + Sync {
    /// Service name for logging (e.g. "openbio-llm").
    fn name(&self) -> &str;

    async fn diagnose(&self, narrative: &str) -> Result<DiagnosisReport>;
}

/// Persists call events and end-of-call artifacts.
#[async_trait]
pub trait CallLog: Send {
    /// Append one event to the call record.
    async fn record(&mut self, event: CallEvent) -> Result<()>;

    /// Persist the current narrative snapshot.
    async fn save_narrative(&mut self, narrative: &str) -> Result<()>;

    /// Write the end-of-call summary.
    async fn save_summary(&mut self) -> Result<()>;
}

/// Chat-completion seam shared by the summarizer and diagnosis backends.
#[async_trait]
pub trait LlmProvider: Send + Sync {
    /// Provider name (e.g. "openai", "nebius").
    fn name(&self) -> &str;

    /// Send a completion request and return the response text.
    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse>;
}

/// Request to an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmRequest {
    pub model: String,
    pub system_prompt: String,
    pub user_prompt: String,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Response from an LLM provider.
#[derive(Debug, Clone)]
pub struct LlmResponse {
    pub content: String,
    pub model: String,
    pub latency_ms: u64,
}
