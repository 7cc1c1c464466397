//! Careline runtime configuration schema.
//!
//! Typed for serde YAML deserialization. Every section and every key is
//! optional in the file; missing values take the documented defaults, so a
//! partial `config.yaml` always yields a usable config.

use careline_throttle::ThrottleSettings;
use serde::{Deserialize, Serialize};

/// Root configuration (`config.yaml`).
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct CarelineConfig {
    /// Update-throttling policy for narrative-to-diagnosis forwarding.
    pub diagnosis_throttling: ThrottleSettings,

    /// Narrative summarizer model settings.
    pub summarizer: SummarizerConfig,

    /// Diagnosis classification model settings.
    pub diagnosis: DiagnosisConfig,

    /// Logging configuration.
    pub logging: LoggingConfig,

    /// Per-session artifact directories.
    pub session: SessionConfig,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SummarizerConfig {
    pub model: String,
    /// Supports `${ENV_VAR}` substitution.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for SummarizerConfig {
    fn default() -> Self {
        Self {
            model: "gpt-4o-mini".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 300,
            temperature: 0.3,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct DiagnosisConfig {
    pub model: String,
    /// Supports `${ENV_VAR}` substitution.
    pub api_key: Option<String>,
    pub base_url: Option<String>,
    pub max_tokens: u32,
    pub temperature: f32,
}

impl Default for DiagnosisConfig {
    fn default() -> Self {
        Self {
            model: "aaditya/Llama3-OpenBioLLM-70B".to_string(),
            api_key: None,
            base_url: None,
            max_tokens: 1024,
            temperature: 0.7,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingConfig {
    /// Default tracing filter when `RUST_LOG` is unset.
    pub level: String,
    /// Directory for the rolling NDJSON runtime log.
    pub dir: String,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            level: "info".to_string(),
            dir: "logs".to_string(),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    /// Per-call plain-text logs.
    pub log_dir: String,
    /// Narrative snapshot JSON files.
    pub extract_dir: String,
    /// End-of-call summary JSON files.
    pub summary_dir: String,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            log_dir: "logs".to_string(),
            extract_dir: "medical_extracts".to_string(),
            summary_dir: "call_summaries".to_string(),
        }
    }
}
