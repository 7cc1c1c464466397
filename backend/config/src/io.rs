//! Config file loading with defaults-on-any-error fallback.
//!
//! The runtime must come up even when `config.yaml` is missing or broken
//! (spoken sessions should never die over a config typo), so [`load_config`]
//! substitutes the full default config on any read, parse, or env
//! substitution failure and logs a warning.

use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use tokio::fs;
use tracing::{info, warn};

use crate::env::resolve_env_vars;
use crate::schema::CarelineConfig;

/// Default config file name, looked up in the working directory.
const CONFIG_FILE_NAME: &str = "config.yaml";

/// Resolve the config file path.
/// Priority: `CARELINE_CONFIG` env > `./config.yaml`.
pub fn config_file_path() -> PathBuf {
    if let Ok(path) = std::env::var("CARELINE_CONFIG") {
        return PathBuf::from(path);
    }
    PathBuf::from(CONFIG_FILE_NAME)
}

/// Parse raw YAML into a typed config, resolving `${VAR}` references.
///
/// Pure over its inputs (modulo the process environment); the disk and
/// fallback concerns live in [`load_config`].
pub fn parse_config(raw: &str) -> Result<CarelineConfig> {
    let value: serde_json::Value =
        serde_yaml::from_str(raw).context("config is not valid YAML")?;
    let value = resolve_env_vars(&value)?;
    serde_json::from_value(value).context("config did not match the expected schema")
}

/// Load and parse the config from disk.
///
/// Never fails: a missing file, malformed YAML, or unresolvable env var
/// falls back to [`CarelineConfig::default`].
pub async fn load_config(path: &Path) -> CarelineConfig {
    let raw = match fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not read config; using defaults"
            );
            return CarelineConfig::default();
        }
    };

    match parse_config(&raw) {
        Ok(config) => {
            info!(path = %path.display(), "Loaded config");
            config
        }
        Err(e) => {
            warn!(
                path = %path.display(),
                error = %e,
                "Could not parse config; using defaults"
            );
            CarelineConfig::default()
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_full_section() {
        let raw = r#"
diagnosis_throttling:
  minimum_interval_seconds: 10
  maximum_interval_seconds: 45
  word_count_threshold: 12
  trigger_sections:
    - "ALLERGIES:"
    - "MEDICATIONS:"
"#;
        let config = parse_config(raw).unwrap();
        assert_eq!(config.diagnosis_throttling.minimum_interval_seconds, 10);
        assert_eq!(config.diagnosis_throttling.maximum_interval_seconds, 45);
        assert_eq!(config.diagnosis_throttling.word_count_threshold, 12);
        assert_eq!(config.diagnosis_throttling.trigger_sections.len(), 2);
    }

    #[test]
    fn parse_rejects_malformed_yaml() {
        assert!(parse_config("diagnosis_throttling: [unclosed").is_err());
    }

    #[test]
    fn parse_rejects_wrong_types() {
        assert!(parse_config("diagnosis_throttling:\n  minimum_interval_seconds: \"soon\"").is_err());
    }

    #[tokio::test]
    async fn load_missing_file_falls_back_to_defaults() {
        let config = load_config(Path::new("/nonexistent/careline/config.yaml")).await;
        assert_eq!(config, CarelineConfig::default());
    }

    #[tokio::test]
    async fn load_malformed_file_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, ": not yaml : [").await.unwrap();
        let config = load_config(&path).await;
        assert_eq!(config, CarelineConfig::default());
    }

    #[tokio::test]
    async fn load_partial_file_defaults_missing_keys() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(&path, "diagnosis_throttling:\n  word_count_threshold: 5\n")
            .await
            .unwrap();
        let config = load_config(&path).await;
        assert_eq!(config.diagnosis_throttling.word_count_threshold, 5);
        assert_eq!(config.diagnosis_throttling.minimum_interval_seconds, 15);
    }

    #[tokio::test]
    async fn load_with_unresolvable_env_var_falls_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("config.yaml");
        tokio::fs::write(
            &path,
            "summarizer:\n  api_key: \"${CARELINE_TEST_VAR_THAT_IS_NOT_SET}\"\n",
        )
        .await
        .unwrap();
        let config = load_config(&path).await;
        assert_eq!(config, CarelineConfig::default());
    }
}
