//! `careline-diagnosis` — turns a medical narrative into a structured report
//! (conditions, follow-up questions, recommended tests) via a classification
//! model.

pub mod report;
pub mod service;

pub use report::parse_report;
pub use service::{LlmDiagnosisService, StaticDiagnosisService};
