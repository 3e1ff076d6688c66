use thiserror::Error;

use crate::db::StoreError;

/// Business rejection codes produced by [`super::MovementService`]
pub mod codes {
    pub const INVALID_ACCOUNT: &str = "INVALID_ACCOUNT";
    pub const INACTIVE_ACCOUNT: &str = "INACTIVE_ACCOUNT";
    pub const INSUFFICIENT_FUNDS: &str = "INSUFFICIENT_FUNDS";
}

#[derive(Debug, Error)]
pub enum MovementError {
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("Corrupt idempotency payload for key {key}: {reason}")]
    CorruptCache { key: String, reason: String },

    #[error("Failed to encode movement result: {0}")]
    Encode(#[from] serde_json::Error),

    #[error("Request token must be 1 to {max} characters, got {len}")]
    InvalidToken { len: usize, max: usize },
}

impl MovementError {
    pub fn code(&self) -> &'static str {
        match self {
            MovementError::Store(_) => "STORAGE_ERROR",
            MovementError::CorruptCache { .. } | MovementError::Encode(_) => "INTERNAL_ERROR",
            MovementError::InvalidToken { .. } => "INVALID_TOKEN",
        }
    }

    pub fn http_status(&self) -> u16 {
        match self {
            MovementError::InvalidToken { .. } => 400,
            _ => 500,
        }
    }
}
