//! Movement handler (the ledger side of a transfer leg)

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, MOVEMENT_TOKEN_HEADER, MovementApiRequest, bearer_token, error_codes,
    idempotency_header,
};
use crate::money::Amount;
use crate::movement::{MovementCommand, MovementKind};

/// Record a credit or debit
///
/// POST /v1/accounts/movements
#[utoipa::path(
    post,
    path = "/v1/accounts/movements",
    request_body = MovementApiRequest,
    params(
        ("X-Idempotency-Key" = String, Header, description = "Per-movement request token"),
    ),
    responses(
        (status = 204, description = "Movement recorded"),
        (status = 400, description = "Invalid request or movement rejected", body = super::super::types::ErrorBody),
        (status = 401, description = "Missing bearer credential")
    ),
    security(("bearer_auth" = [])),
    tag = "Movement"
)]
pub async fn create_movement(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<MovementApiRequest>,
) -> ApiResult<StatusCode> {
    let request_token = idempotency_header(&headers, MOVEMENT_TOKEN_HEADER)?;
    // Caller identity is not checked against the account
    bearer_token(&headers)?;

    if req.account_number <= 0 {
        return Err(ApiError::bad_request(
            "accountNumber must be a positive account number",
        ));
    }
    let amount = Amount::new(req.amount)
        .map_err(|e| ApiError::bad_request(format!("amount: {}", e)))?;
    let kind = MovementKind::from_code(&req.kind)
        .ok_or_else(|| ApiError::bad_request("kind must be \"C\" or \"D\""))?;

    let cmd = MovementCommand {
        account: req.account_number,
        amount,
        kind,
        request_token,
    };

    let result = state.movements.record(cmd).await.map_err(|e| {
        if e.http_status() == 400 {
            return ApiError::bad_request(e.to_string()).with_error_type(e.code());
        }
        tracing::error!(error = %e, "Movement failed");
        ApiError::internal(e.to_string())
    })?;

    if result.success {
        return Ok(StatusCode::NO_CONTENT);
    }

    let mut err = ApiError::new(
        StatusCode::BAD_REQUEST,
        error_codes::MOVEMENT_REJECTED,
        result.error_message.unwrap_or_default(),
    );
    if let Some(error_type) = result.error_type {
        err = err.with_error_type(error_type);
    }
    Err(err)
}
