//! Errors raised by symbol catalogs and usage logs

use thiserror::Error;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failed: {0}")]
    Io(#[from] std::io::Error),

    #[error("store record could not be (de)serialized: {0}")]
    Serde(#[from] serde_json::Error),

    #[error("store backend failed: {0}")]
    Backend(String),

    #[error("store lock poisoned: {0}")]
    Poisoned(&'static str),

    #[error("rejected usage event: {0}")]
    InvalidEvent(String),
}

impl StoreError {
    pub fn backend(err: impl std::fmt::Display) -> Self {
        StoreError::Backend(err.to_string())
    }
}

pub type StoreResult<T> = Result<T, StoreError>;
