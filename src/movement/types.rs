//! Movement Core Types

use std::fmt;

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::account::AccountNumber;
use crate::money::Amount;

/// Direction of a movement against an account balance
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize, ToSchema)]
pub enum MovementKind {
    #[serde(rename = "C")]
    Credit,
    #[serde(rename = "D")]
    Debit,
}

impl MovementKind {
    /// Single-letter code stored in `movements_tb.kind`
    #[inline]
    pub fn code(&self) -> &'static str {
        match self {
            MovementKind::Credit => "C",
            MovementKind::Debit => "D",
        }
    }

    pub fn from_code(code: &str) -> Option<Self> {
        match code.trim().to_ascii_uppercase().as_str() {
            "C" => Some(MovementKind::Credit),
            "D" => Some(MovementKind::Debit),
            _ => None,
        }
    }

    /// Kind of the movement that reverses this one
    #[inline]
    pub fn opposite(&self) -> Self {
        match self {
            MovementKind::Credit => MovementKind::Debit,
            MovementKind::Debit => MovementKind::Credit,
        }
    }
}

impl fmt::Display for MovementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

/// Outcome reported by the movement ledger for one call
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MoveOutcome {
    pub successful: bool,
    pub status_code: u16,
    pub body: String,
}

impl MoveOutcome {
    pub fn accepted() -> Self {
        Self {
            successful: true,
            status_code: 204,
            body: String::new(),
        }
    }

    pub fn rejected(status_code: u16, body: impl Into<String>) -> Self {
        Self {
            successful: false,
            status_code,
            body: body.into(),
        }
    }
}

/// Wire body of `POST /v1/accounts/movements`
#[derive(Debug, Clone, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementRequest {
    #[schema(example = 1)]
    pub account_number: AccountNumber,
    #[schema(value_type = String, example = "10.00")]
    pub amount: Amount,
    #[schema(example = "C")]
    pub kind: MovementKind,
}

/// Command handled by [`super::MovementService::record`]
#[derive(Debug, Clone)]
pub struct MovementCommand {
    pub account: AccountNumber,
    pub amount: Amount,
    pub kind: MovementKind,
    /// Deduplicates retried deliveries of the same movement
    pub request_token: String,
}

/// Typed outcome of recording a movement; also the idempotency payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MovementResult {
    pub success: bool,
    pub error_type: Option<String>,
    pub error_message: Option<String>,
}

impl MovementResult {
    pub fn ok() -> Self {
        Self {
            success: true,
            error_type: None,
            error_message: None,
        }
    }

    pub fn fail(error_type: &str, message: impl Into<String>) -> Self {
        Self {
            success: false,
            error_type: Some(error_type.to_string()),
            error_message: Some(message.into()),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal::Decimal;

    #[test]
    fn test_kind_codes() {
        assert_eq!(MovementKind::Credit.code(), "C");
        assert_eq!(MovementKind::Debit.code(), "D");
        assert_eq!(MovementKind::from_code(" d "), Some(MovementKind::Debit));
        assert_eq!(MovementKind::from_code("X"), None);
    }

    #[test]
    fn test_opposite() {
        assert_eq!(MovementKind::Credit.opposite(), MovementKind::Debit);
        assert_eq!(MovementKind::Debit.opposite(), MovementKind::Credit);
    }

    #[test]
    fn test_movement_request_wire_format() {
        let req = MovementRequest {
            account_number: 7,
            amount: Amount::new(Decimal::new(1000, 2)).unwrap(),
            kind: MovementKind::Debit,
        };
        let json = serde_json::to_value(&req).unwrap();
        assert_eq!(
            json,
            serde_json::json!({"accountNumber": 7, "amount": "10.00", "kind": "D"})
        );
    }
}
