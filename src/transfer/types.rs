//! Transfer Core Types

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::account::AccountNumber;
use crate::money::Amount;

/// One transfer request as seen by the saga
#[derive(Debug, Clone)]
pub struct TransferCommand {
    pub origin: AccountNumber,
    pub destination: AccountNumber,
    pub amount: Amount,
    /// Caller-supplied; required and non-empty (enforced at the boundary)
    pub idempotency_key: String,
    /// Opaque bearer credential forwarded to the movement ledger
    pub credential: String,
}

/// Stable, programmatic failure classification
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum TransferErrorType {
    InvalidAccount,
    InactiveAccount,
    RemoteError,
    PersistenceError,
    UnexpectedError,
}

impl TransferErrorType {
    pub fn as_str(&self) -> &'static str {
        match self {
            TransferErrorType::InvalidAccount => "INVALID_ACCOUNT",
            TransferErrorType::InactiveAccount => "INACTIVE_ACCOUNT",
            TransferErrorType::RemoteError => "REMOTE_ERROR",
            TransferErrorType::PersistenceError => "PERSISTENCE_ERROR",
            TransferErrorType::UnexpectedError => "UNEXPECTED_ERROR",
        }
    }
}

impl fmt::Display for TransferErrorType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Terminal outcome of a saga execution; serialized form is the cache payload
///
/// Only `error_type` is stable; `error_message` is a human-readable diagnostic.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct TransferResult {
    pub success: bool,
    pub error_type: Option<TransferErrorType>,
    pub error_message: Option<String>,
}

impl TransferResult {
    pub fn success() -> Self {
        Self {
            success: true,
            error_type: None,
            error_message: None,
        }
    }

    pub fn fail(error_type: TransferErrorType, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_type: Some(error_type),
            error_message: Some(message.into()),
        }
    }

    pub fn is_success(&self) -> bool {
        self.success
    }
}
