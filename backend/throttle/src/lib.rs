//! `careline-throttle` — decides when a medical narrative has changed enough
//! to be worth another call to the diagnosis service.
//!
//! One [`UpdateThrottler`] per conversation session. The caller evaluates a
//! candidate narrative, performs the downstream call on approval, and
//! reports completion with [`UpdateThrottler::mark_sent`].

pub mod throttler;

pub use throttler::{
    word_count, HoldReason, SendReason, ThrottleDecision, ThrottleSettings, UpdateThrottler,
};
