use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, instrument};

use careline_core::{LlmProvider, LlmRequest, NarrativeSummarizer};

const SYSTEM_PROMPT: &str = "You are a medical listening assistant. \
Maintain a summary of the patient's condition based on doctor-patient conversation. \
Fold new relevant medical information into a coherent narrative. \
Keep the summary concise but comprehensive, focusing on symptoms, duration, \
triggers, and relevant medical history. Use clear, short sentences.";

/// Summarizer that folds conversation chunks into the narrative via an LLM.
pub struct LlmSummarizer {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmSummarizer {
    pub fn new(
        provider: Arc<dyn LlmProvider>,
        model: impl Into<String>,
        max_tokens: u32,
        temperature: f32,
    ) -> Self {
        Self {
            provider,
            model: model.into(),
            max_tokens,
            temperature,
        }
    }

    fn update_prompt(narrative: &str, new_text: &str) -> String {
        let current = if narrative.is_empty() {
            "No medical information yet."
        } else {
            narrative
        };
        format!(
            "Current medical summary:\n{current}\n\n\
             New conversation:\n{new_text}\n\n\
             Update the medical summary to include any new relevant medical \
             information from this conversation. Keep sentences short and clear. \
             Avoid repetition. If no new medical information is present, return \
             the current summary unchanged. Focus on: patient demographics, \
             symptoms, duration, triggers, medical history, medications, and \
             relevant context."
        )
    }
}

#[async_trait]
impl NarrativeSummarizer for LlmSummarizer {
    #[instrument(skip_all, fields(provider = self.provider.name()))]
    async fn update(&self, narrative: &str, new_text: &str) -> Result<String> {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: Self::update_prompt(narrative, new_text),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.provider.complete(&request).await?;
        let updated = response.content.trim();

        // A model that returns nothing should not wipe the narrative.
        if updated.is_empty() {
            debug!("Summarizer returned empty content; keeping current narrative");
            return Ok(narrative.to_string());
        }

        Ok(updated.to_string())
    }
}

/// Dev/test summarizer that appends raw text instead of calling a model.
pub struct AppendSummarizer;

#[async_trait]
impl NarrativeSummarizer for AppendSummarizer {
    async fn update(&self, narrative: &str, new_text: &str) -> Result<String> {
        let new_text = new_text.trim();
        if new_text.is_empty() {
            return Ok(narrative.to_string());
        }
        if narrative.is_empty() {
            Ok(new_text.to_string())
        } else {
            Ok(format!("{narrative} {new_text}"))
        }
    }
}
