//! `careline-config` — Careline runtime configuration.
//!
//! Provides:
//! - Typed config schema (throttling, summarizer, diagnosis, logging, session)
//! - YAML loading with full-default fallback on any error
//! - `${ENV_VAR}` substitution for secrets

pub mod env;
pub mod io;
pub mod schema;

pub use env::{resolve_env_vars, resolve_env_vars_with, MissingEnvVarError};
pub use io::{config_file_path, load_config, parse_config};
pub use schema::{
    CarelineConfig, DiagnosisConfig, LoggingConfig, SessionConfig, SummarizerConfig,
};
