use thiserror::Error;

#[derive(Debug, Error)]
pub enum PayloadError {
    #[error("invalid input: {0}")]
    InvalidInput(String),

    #[error("buffer too small: expected at least 2 header bytes, got {actual}")]
    BufferTooSmall { actual: usize },

    #[error("truncated buffer: need {needed} bytes at offset {offset}, {remaining} remaining")]
    TruncatedBuffer {
        offset: usize,
        needed: usize,
        remaining: usize,
    },

    #[error("json serialization error: {0}")]
    JsonError(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, PayloadError>;
