use std::sync::Arc;

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info, instrument};

use careline_core::{DiagnosisReport, DiagnosisService, LlmProvider, LlmRequest};

use crate::report::parse_report;

const SYSTEM_PROMPT: &str = "You are a medical diagnosis assistant. You will receive a patient \
narrative containing symptoms and history.\n\n\
DIAGNOSIS GUIDELINES:\n\
- If you have ANY symptoms with duration and characteristics, provide possible diagnoses\n\
- Be proactive and suggest likely conditions based on available information\n\
- Include both common and serious conditions that fit the symptoms\n\n\
ONLY if there is literally NO medical information (just greetings or age):\n\
- Provide an empty diagnosis array and focus on gathering initial symptoms\n\n\
For ALL other cases, provide:\n\
1. Differential diagnoses matching the symptoms, even with partial information\n\
2. One or two follow-up questions to refine or confirm the diagnosis\n\
3. Diagnostic tests that would confirm the suspected diagnoses\n\n\
Format your response as a JSON object with exactly these keys:\n\
- \"diagnosis\": array of possible diagnoses based on current symptoms\n\
- \"follow_up_questions\": array of 1-2 clarifying questions\n\
- \"further_tests\": array of tests to confirm suspected diagnoses\n\n\
Respond ONLY with the JSON object.";

/// Diagnosis service backed by a classification model behind an
/// [`LlmProvider`].
pub struct LlmDiagnosisService {
    provider: Arc<dyn LlmProvider>,
    model: String,
    max_tokens: u32,
    temperature: f32,
}

impl LlmDiagnosisService {
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
}

#[async_trait]
impl DiagnosisService for LlmDiagnosisService {
    fn name(&self) -> &str {
        self.provider.name()
    }

    #[instrument(skip_all, fields(model = %self.model))]
    async fn diagnose(&self, narrative: &str) -> Result<DiagnosisReport> {
        let request = LlmRequest {
            model: self.model.clone(),
            system_prompt: SYSTEM_PROMPT.to_string(),
            user_prompt: narrative.to_string(),
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self.provider.complete(&request).await?;
        debug!(latency_ms = response.latency_ms, "Diagnosis model responded");

        let report = parse_report(&response.content)?;
        info!(
            conditions = report.conditions.len(),
            questions = report.follow_up_questions.len(),
            tests = report.recommended_tests.len(),
            "Parsed diagnosis report"
        );
        Ok(report)
    }
}

/// Dev/test service that always returns the same report.
pub struct StaticDiagnosisService {
    report: DiagnosisReport,
}

impl StaticDiagnosisService {
    pub fn new(report: DiagnosisReport) -> Self {
        Self { report }
    }

    pub fn empty() -> Self {
        Self {
            report: DiagnosisReport::default(),
        }
    }
}

#[async_trait]
impl DiagnosisService for StaticDiagnosisService {
    fn name(&self) -> &str {
        "static"
    }

    async fn diagnose(&self, _narrative: &str) -> Result<DiagnosisReport> {
        Ok(self.report.clone())
    }
}
