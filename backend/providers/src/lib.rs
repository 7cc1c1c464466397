//! `careline-providers` — chat-completion backends behind the
//! [`LlmProvider`](careline_core::LlmProvider) trait.
//!
//! Both the narrative summarizer and the diagnosis classifier speak the
//! OpenAI-compatible chat-completions protocol, so one HTTP provider covers
//! OpenAI, Nebius, and anything else wire-compatible.

pub mod mock;
pub mod openai_compat;

pub use mock::MockProvider;
pub use openai_compat::OpenAiCompatProvider;
