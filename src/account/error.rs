//! Account Error Types

use thiserror::Error;

use crate::db::StoreError;

#[derive(Error, Debug)]
pub enum AccountError {
    #[error("Invalid value: {0}")]
    InvalidValue(String),

    #[error("Invalid document")]
    InvalidDocument,

    #[error("Document already registered")]
    DuplicateDocument,

    #[error("Account not found")]
    NotFound,

    #[error("Account not found or already inactive")]
    NotFoundOrInactive,

    #[error("Account is already active")]
    AlreadyActive,

    #[error("Invalid password")]
    Unauthorized,

    #[error("Password hashing failed: {0}")]
    Hashing(String),

    #[error(transparent)]
    Store(#[from] StoreError),
}

impl AccountError {
    /// Stable error code for API responses
    pub fn code(&self) -> &'static str {
        match self {
            AccountError::InvalidValue(_) => "INVALID_VALUE",
            AccountError::InvalidDocument => "INVALID_DOCUMENT",
            AccountError::DuplicateDocument => "DUPLICATE_DOCUMENT",
            AccountError::NotFound | AccountError::NotFoundOrInactive => "INVALID_ACCOUNT",
            AccountError::AlreadyActive => "ALREADY_ACTIVE",
            AccountError::Unauthorized => "UNAUTHORIZED",
            AccountError::Hashing(_) | AccountError::Store(_) => "INTERNAL_ERROR",
        }
    }

    /// HTTP status code suggestion
    pub fn http_status(&self) -> u16 {
        match self {
            AccountError::InvalidValue(_)
            | AccountError::InvalidDocument
            | AccountError::DuplicateDocument
            | AccountError::NotFound
            | AccountError::NotFoundOrInactive
            | AccountError::AlreadyActive => 400,
            AccountError::Unauthorized => 401,
            AccountError::Hashing(_) | AccountError::Store(_) => 500,
        }
    }
}
