use thiserror::Error;

/// Top-level error type for the Careline runtime.
#[derive(Debug, Error)]
pub enum CareError {
    #[error("summarizer error: {0}")]
    Summarizer(String),

    #[error("diagnosis service error ({service}): {message}")]
    Diagnosis { service: String, message: String },

    #[error("channel closed: {0}")]
    ChannelClosed(String),

    #[error("storage error: {0}")]
    Storage(String),

    #[error(transparent)]
    Other(#[from] anyhow::Error),
}
