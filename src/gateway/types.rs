//! API boundary types
//!
//! - [`ApiResponse<T>`]: success wrapper `{code, msg, data}`
//! - [`ApiError`]: error response `{code, msg, errorType}` with HTTP status
//! - Request DTOs with boundary validation

use axum::{
    Json,
    http::{HeaderMap, StatusCode},
    response::{IntoResponse, Response},
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use crate::account::{AccountError, AccountNumber};
use crate::money::Amount;
use crate::transfer::TransferCommand;

pub const IDEMPOTENCY_KEY_HEADER: &str = "Idempotency-Key";
pub const MOVEMENT_TOKEN_HEADER: &str = "X-Idempotency-Key";

/// Longest accepted idempotency key or movement token
pub const MAX_IDEMPOTENCY_KEY_LEN: usize = crate::idempotency::MAX_TOKEN_LEN;

// ============================================================================
// Unified API Response Format
// ============================================================================

/// Unified API response wrapper
///
/// - code: 0 = success, non-zero = error code
/// - msg: short message description
/// - data: actual data (success) or absent (error)
#[derive(Debug, Serialize, ToSchema)]
pub struct ApiResponse<T> {
    #[schema(example = 0)]
    pub code: i32,
    #[schema(example = "ok")]
    pub msg: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
}

impl<T> ApiResponse<T> {
    pub fn success(data: T) -> Self {
        Self {
            code: error_codes::SUCCESS,
            msg: "ok".to_string(),
            data: Some(data),
        }
    }
}

/// Error response body
#[derive(Debug, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct ErrorBody {
    #[schema(example = 3001)]
    pub code: i32,
    #[schema(example = "failed to credit destination")]
    pub msg: String,
    /// Stable domain error type, when the failure came from a business rule
    #[serde(skip_serializing_if = "Option::is_none")]
    #[schema(example = "REMOTE_ERROR")]
    pub error_type: Option<String>,
}

#[derive(Debug)]
pub struct ApiError {
    pub status: StatusCode,
    pub code: i32,
    pub msg: String,
    pub error_type: Option<String>,
}

pub type ApiResult<T> = Result<T, ApiError>;

impl ApiError {
    pub fn new(status: StatusCode, code: i32, msg: impl Into<String>) -> Self {
        Self {
            status,
            code,
            msg: msg.into(),
            error_type: None,
        }
    }

    pub fn with_error_type(mut self, error_type: impl Into<String>) -> Self {
        self.error_type = Some(error_type.into());
        self
    }

    pub fn bad_request(msg: impl Into<String>) -> Self {
        Self::new(StatusCode::BAD_REQUEST, error_codes::INVALID_PARAMETER, msg)
    }

    pub fn missing_auth() -> Self {
        Self::new(
            StatusCode::UNAUTHORIZED,
            error_codes::MISSING_AUTH,
            "Authorization: Bearer <token> header required",
        )
    }

    pub fn internal(msg: impl Into<String>) -> Self {
        Self::new(
            StatusCode::INTERNAL_SERVER_ERROR,
            error_codes::INTERNAL_ERROR,
            msg,
        )
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorBody {
            code: self.code,
            msg: self.msg,
            error_type: self.error_type,
        };
        (self.status, Json(body)).into_response()
    }
}

impl From<AccountError> for ApiError {
    fn from(err: AccountError) -> Self {
        let status =
            StatusCode::from_u16(err.http_status()).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
        let code = if status.is_server_error() {
            tracing::error!(error = %err, "Account operation failed");
            error_codes::INTERNAL_ERROR
        } else {
            error_codes::ACCOUNT_REJECTED
        };
        ApiError::new(status, code, err.to_string()).with_error_type(err.code())
    }
}

// ============================================================================
// Header helpers
// ============================================================================

/// Value of a required, non-blank header
pub fn required_header(headers: &HeaderMap, name: &str) -> ApiResult<String> {
    headers
        .get(name)
        .and_then(|v| v.to_str().ok())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .map(str::to_string)
        .ok_or_else(|| ApiError::bad_request(format!("{} header is required", name)))
}

/// Required idempotency header, capped at [`MAX_IDEMPOTENCY_KEY_LEN`]
pub fn idempotency_header(headers: &HeaderMap, name: &str) -> ApiResult<String> {
    let value = required_header(headers, name)?;
    if value.len() > MAX_IDEMPOTENCY_KEY_LEN {
        return Err(ApiError::bad_request(format!(
            "{} must be at most {} characters",
            name, MAX_IDEMPOTENCY_KEY_LEN
        )));
    }
    Ok(value)
}

/// Bearer credential from `Authorization`, forwarded without verification
pub fn bearer_token(headers: &HeaderMap) -> ApiResult<String> {
    let value = headers
        .get(axum::http::header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .ok_or_else(ApiError::missing_auth)?;

    let (scheme, token) = value.trim().split_once(' ').ok_or_else(ApiError::missing_auth)?;
    let token = token.trim();
    if !scheme.eq_ignore_ascii_case("bearer") || token.is_empty() {
        return Err(ApiError::missing_auth());
    }
    Ok(token.to_string())
}

// ============================================================================
// Request DTOs
// ============================================================================

/// Transfer request body
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct TransferRequest {
    #[schema(example = 1)]
    pub origin: AccountNumber,
    #[schema(example = 2)]
    pub destination: AccountNumber,
    #[schema(value_type = String, example = "10.00")]
    pub amount: Decimal,
}

impl TransferRequest {
    /// Boundary validation; the saga itself does not re-check these rules
    ///
    /// `idempotency_key` comes from [`idempotency_header`], which bounds it.
    pub fn into_command(
        self,
        idempotency_key: String,
        credential: String,
    ) -> ApiResult<TransferCommand> {
        if self.origin <= 0 {
            return Err(ApiError::bad_request("origin must be a positive account number"));
        }
        if self.destination <= 0 {
            return Err(ApiError::bad_request(
                "destination must be a positive account number",
            ));
        }
        if self.origin == self.destination {
            return Err(ApiError::bad_request("destination must differ from origin"));
        }
        let amount = Amount::new(self.amount)
            .map_err(|e| ApiError::bad_request(format!("amount: {}", e)))?;

        Ok(TransferCommand {
            origin: self.origin,
            destination: self.destination,
            amount,
            idempotency_key,
            credential,
        })
    }
}

/// Movement request body as received over HTTP
#[derive(Debug, Clone, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct MovementApiRequest {
    #[schema(example = 1)]
    pub account_number: AccountNumber,
    #[schema(value_type = String, example = "10.00")]
    pub amount: Decimal,
    /// "C" (credit) or "D" (debit)
    #[schema(example = "C")]
    pub kind: String,
}

// ============================================================================
// Error Codes
// ============================================================================

/// Standard API error codes
pub mod error_codes {
    pub const SUCCESS: i32 = 0;

    // Client errors (1xxx)
    pub const INVALID_PARAMETER: i32 = 1001;

    // Auth errors (2xxx)
    pub const MISSING_AUTH: i32 = 2001;

    // Business rejections (3xxx)
    pub const TRANSFER_REJECTED: i32 = 3001;
    pub const MOVEMENT_REJECTED: i32 = 3002;
    pub const ACCOUNT_REJECTED: i32 = 3003;

    // Server errors (5xxx)
    pub const INTERNAL_ERROR: i32 = 5000;
    pub const SERVICE_UNAVAILABLE: i32 = 5001;
}
