//! Telemetry and structured logging for Careline.
//!
//! Handles subscriber setup (console + rolling NDJSON file) and redaction of
//! patient-identifying data before anything reaches a log line.

pub mod logger;
pub mod redact;

pub use logger::init_logger;
pub use redact::redact_sensitive_data;
