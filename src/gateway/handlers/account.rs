//! Account lifecycle handlers

use std::sync::Arc;

use axum::{
    Json,
    extract::{Path, State},
    http::StatusCode,
};

use super::super::state::AppState;
use super::super::types::{ApiResponse, ApiResult};
use crate::account::{
    AccountNumber, AccountPasswordRequest, CreateAccountRequest, CreateAccountResponse,
};

/// Open a new account
///
/// POST /v1/accounts
#[utoipa::path(
    post,
    path = "/v1/accounts",
    request_body = CreateAccountRequest,
    responses(
        (status = 201, description = "Account created", body = CreateAccountResponse),
        (status = 400, description = "Invalid value or duplicate document", body = super::super::types::ErrorBody)
    ),
    tag = "Account"
)]
pub async fn create_account(
    State(state): State<Arc<AppState>>,
    Json(req): Json<CreateAccountRequest>,
) -> ApiResult<(StatusCode, Json<ApiResponse<CreateAccountResponse>>)> {
    let number = state.accounts.create(req).await?;
    Ok((
        StatusCode::CREATED,
        Json(ApiResponse::success(CreateAccountResponse { number })),
    ))
}

/// POST /v1/accounts/{number}/activate
#[utoipa::path(
    post,
    path = "/v1/accounts/{number}/activate",
    params(("number" = i32, Path, description = "Account number")),
    request_body = AccountPasswordRequest,
    responses(
        (status = 204, description = "Account activated"),
        (status = 400, description = "Unknown or already active account", body = super::super::types::ErrorBody),
        (status = 401, description = "Wrong password")
    ),
    tag = "Account"
)]
pub async fn activate_account(
    State(state): State<Arc<AppState>>,
    Path(number): Path<AccountNumber>,
    Json(req): Json<AccountPasswordRequest>,
) -> ApiResult<StatusCode> {
    state.accounts.activate(number, &req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}

/// POST /v1/accounts/{number}/deactivate
#[utoipa::path(
    post,
    path = "/v1/accounts/{number}/deactivate",
    params(("number" = i32, Path, description = "Account number")),
    request_body = AccountPasswordRequest,
    responses(
        (status = 204, description = "Account deactivated"),
        (status = 400, description = "Unknown or inactive account", body = super::super::types::ErrorBody),
        (status = 401, description = "Wrong password")
    ),
    tag = "Account"
)]
pub async fn deactivate_account(
    State(state): State<Arc<AppState>>,
    Path(number): Path<AccountNumber>,
    Json(req): Json<AccountPasswordRequest>,
) -> ApiResult<StatusCode> {
    state.accounts.deactivate(number, &req.password).await?;
    Ok(StatusCode::NO_CONTENT)
}
