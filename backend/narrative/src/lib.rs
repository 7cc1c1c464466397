//! `careline-narrative` — maintains the cumulative medical narrative.
//!
//! The summarizer folds each transcribed conversation chunk into a running
//! summary of the patient's condition; the result is what the throttler
//! evaluates and the diagnosis service consumes.

pub mod summarizer;

pub use summarizer::{AppendSummarizer, LlmSummarizer};
