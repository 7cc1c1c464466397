use std::collections::VecDeque;

use anyhow::Result;
use async_trait::async_trait;
use tokio::sync::Mutex;

use careline_core::{LlmProvider, LlmRequest, LlmResponse};

/// A mock LLM provider that returns canned responses.
///
/// Scripted responses are consumed in order; once the script runs out the
/// provider falls back to its fixed response (or echoes the user prompt).
pub struct MockProvider {
    name: String,
    fixed_response: Option<String>,
    scripted: Mutex<VecDeque<String>>,
}

impl MockProvider {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            fixed_response: None,
            scripted: Mutex::new(VecDeque::new()),
        }
    }

    pub fn with_response(mut self, response: impl Into<String>) -> Self {
        self.fixed_response = Some(response.into());
        self
    }

    pub fn with_script(mut self, responses: impl IntoIterator<Item = String>) -> Self {
        self.scripted.get_mut().extend(responses);
        self
    }
}

#[async_trait]
impl LlmProvider for MockProvider {
    fn name(&self) -> &str {
        &self.name
    }

    async fn complete(&self, request: &LlmRequest) -> Result<LlmResponse> {
        let content = {
            let mut scripted = self.scripted.lock().await;
            scripted.pop_front()
        }
        .or_else(|| self.fixed_response.clone())
        .unwrap_or_else(|| request.user_prompt.clone());

        Ok(LlmResponse {
            content,
            model: "mock".to_string(),
            latency_ms: 0,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn request() -> LlmRequest {
        LlmRequest {
            model: "mock".to_string(),
            system_prompt: String::new(),
            user_prompt: "hello".to_string(),
            max_tokens: 16,
            temperature: 0.0,
        }
    }

    #[tokio::test]
    async fn scripted_responses_come_in_order() {
        let provider = MockProvider::new("mock")
            .with_script(["first".to_string(), "second".to_string()]);
        assert_eq!(provider.complete(&request()).await.unwrap().content, "first");
        assert_eq!(provider.complete(&request()).await.unwrap().content, "second");
    }

    #[tokio::test]
    async fn exhausted_script_falls_back_to_fixed_response() {
        let provider = MockProvider::new("mock")
            .with_response("fallback")
            .with_script(["only".to_string()]);
        provider.complete(&request()).await.unwrap();
        assert_eq!(provider.complete(&request()).await.unwrap().content, "fallback");
    }

    #[tokio::test]
    async fn no_script_echoes_the_prompt() {
        let provider = MockProvider::new("mock");
        assert_eq!(provider.complete(&request()).await.unwrap().content, "hello");
    }
}
