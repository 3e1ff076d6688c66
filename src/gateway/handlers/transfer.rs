//! Transfer handler

use std::sync::Arc;

use axum::{
    Json,
    extract::State,
    http::{HeaderMap, StatusCode},
};
use tokio_util::sync::CancellationToken;

use super::super::state::AppState;
use super::super::types::{
    ApiError, ApiResult, IDEMPOTENCY_KEY_HEADER, TransferRequest, bearer_token, error_codes,
    idempotency_header,
};

/// Transfer between two accounts
///
/// POST /v1/transfers
///
/// The saga runs on its own task. If the client goes away the handler future
/// is dropped, which cancels the saga's forward steps; compensation and the
/// idempotency write still complete on that task.
#[utoipa::path(
    post,
    path = "/v1/transfers",
    request_body = TransferRequest,
    params(
        ("Idempotency-Key" = String, Header, description = "Caller-supplied request token"),
    ),
    responses(
        (status = 204, description = "Transfer committed"),
        (status = 400, description = "Invalid request or transfer rejected", body = super::super::types::ErrorBody),
        (status = 401, description = "Missing bearer credential")
    ),
    security(("bearer_auth" = [])),
    tag = "Transfer"
)]
pub async fn create_transfer(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    Json(req): Json<TransferRequest>,
) -> ApiResult<StatusCode> {
    let idempotency_key = idempotency_header(&headers, IDEMPOTENCY_KEY_HEADER)?;
    let credential = bearer_token(&headers)?;
    let cmd = req.into_command(idempotency_key, credential)?;

    let cancel = CancellationToken::new();
    let guard = cancel.clone().drop_guard();

    let saga = state.saga.clone();
    let result = tokio::spawn(async move { saga.execute(cmd, &cancel).await })
        .await
        .map_err(|e| {
            tracing::error!(error = %e, "Transfer task aborted");
            ApiError::internal("transfer task aborted")
        })?;
    guard.disarm();

    if result.is_success() {
        return Ok(StatusCode::NO_CONTENT);
    }

    let mut err = ApiError::new(
        StatusCode::BAD_REQUEST,
        error_codes::TRANSFER_REJECTED,
        result.error_message.unwrap_or_default(),
    );
    if let Some(error_type) = result.error_type {
        err = err.with_error_type(error_type.as_str());
    }
    Err(err)
}
