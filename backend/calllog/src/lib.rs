//! `careline-calllog` — per-call persistence.
//!
//! One plain-text log per session, a JSON narrative snapshot updated after
//! each change, and an end-of-call summary JSON. Console/runtime logs go
//! through the redaction layer; the session's own files keep the raw text.

pub mod logger;
pub mod memory;

pub use logger::CallLogger;
pub use memory::MemoryCallLog;
