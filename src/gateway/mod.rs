pub mod handlers;
pub mod openapi;
pub mod state;
pub mod types;

use axum::{
    Router,
    routing::{get, post},
};
use std::sync::Arc;
use tokio::net::TcpListener;

use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use crate::config::GatewayConfig;
use state::AppState;

/// Build the HTTP router
pub fn router(state: Arc<AppState>) -> Router {
    let v1 = Router::new()
        .route("/health", get(handlers::health_check))
        .route("/transfers", post(handlers::create_transfer))
        .route("/accounts", post(handlers::create_account))
        .route("/accounts/movements", post(handlers::create_movement))
        .route("/accounts/{number}/activate", post(handlers::activate_account))
        .route(
            "/accounts/{number}/deactivate",
            post(handlers::deactivate_account),
        );

    Router::new()
        .nest("/v1", v1)
        .with_state(state)
        // OpenAPI / Swagger UI (stateless, added after with_state)
        .merge(SwaggerUi::new("/docs").url("/api-docs/openapi.json", openapi::ApiDoc::openapi()))
}

/// Start the HTTP gateway and serve until Ctrl-C
pub async fn run_server(config: &GatewayConfig, state: Arc<AppState>) -> std::io::Result<()> {
    let app = router(state);

    let addr = format!("{}:{}", config.host, config.port);
    let listener = TcpListener::bind(&addr).await.map_err(|e| {
        tracing::error!(
            "Failed to bind to {}: {} (port {} may already be in use)",
            addr,
            e,
            config.port
        );
        e
    })?;

    tracing::info!("Gateway listening on http://{}", addr);
    tracing::info!("API Docs: http://{}/docs", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!("Failed to install Ctrl-C handler: {}", e);
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::{Body, to_bytes};
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use crate::account::{AccountService, MockAccountLookup};
    use crate::clock::SystemClock;
    use crate::config::SagaConfig;
    use crate::idempotency::InMemoryIdempotencyStore;
    use crate::movement::{MemoryMovementStore, MockLedger, MovementKind, MovementService};
    use crate::transfer::TransferSaga;
    use crate::transfer::store::MockTransferStore;

    struct TestApp {
        app: Router,
        ledger: Arc<MockLedger>,
    }

    fn test_app() -> TestApp {
        let accounts = Arc::new(MockAccountLookup::new().with(1, true).with(2, true));
        let ledger = Arc::new(MockLedger::new());
        let idempotency = Arc::new(InMemoryIdempotencyStore::new());

        let saga = Arc::new(TransferSaga::new(
            accounts.clone(),
            ledger.clone(),
            Arc::new(MockTransferStore::new()),
            idempotency.clone(),
            Arc::new(SystemClock),
            &SagaConfig::default(),
        ));
        let movements = Arc::new(MovementService::new(
            accounts,
            Arc::new(MemoryMovementStore::new()),
            idempotency,
            Arc::new(SystemClock),
        ));
        let account_store = Arc::new(NoAccountStore);
        let state = AppState::new(saga, movements, Arc::new(AccountService::new(account_store)));

        TestApp {
            app: router(Arc::new(state)),
            ledger,
        }
    }

    /// Account store that knows no accounts
    struct NoAccountStore;

    #[async_trait::async_trait]
    impl crate::account::AccountStore for NoAccountStore {
        async fn document_exists(&self, _: &str) -> Result<bool, crate::db::StoreError> {
            Ok(false)
        }

        async fn create(&self, _: &str, _: &str, _: &str) -> Result<i32, crate::db::StoreError> {
            Ok(1)
        }

        async fn get_credentials(
            &self,
            _: i32,
        ) -> Result<Option<crate::account::AccountCredentials>, crate::db::StoreError> {
            Ok(None)
        }

        async fn set_active(&self, _: i32, _: bool) -> Result<(), crate::db::StoreError> {
            Ok(())
        }
    }

    fn post_json(uri: &str, body: &str, headers: &[(&str, &str)]) -> Request<Body> {
        let mut builder = Request::builder()
            .method("POST")
            .uri(uri)
            .header("content-type", "application/json");
        for (name, value) in headers {
            builder = builder.header(*name, *value);
        }
        builder.body(Body::from(body.to_string())).unwrap()
    }

    async fn body_json(response: axum::response::Response) -> serde_json::Value {
        let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
        serde_json::from_slice(&bytes).unwrap()
    }

    const TRANSFER: &str = r#"{"origin":1,"destination":2,"amount":"10.00"}"#;

    #[tokio::test]
    async fn test_health() {
        let t = test_app();
        let response = t
            .app
            .oneshot(Request::get("/v1/health").body(Body::empty()).unwrap())
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::OK);
        assert_eq!(body_json(response).await["code"], 0);
    }

    #[tokio::test]
    async fn test_transfer_success_is_no_content() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/transfers",
                TRANSFER,
                &[("Idempotency-Key", "idem-1"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
        assert_eq!(t.ledger.call_count(), 2);
        assert_eq!(t.ledger.calls()[0].credential, "tok");
    }

    #[tokio::test]
    async fn test_transfer_requires_idempotency_key() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/transfers",
                TRANSFER,
                &[("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(t.ledger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transfer_requires_bearer() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/transfers",
                TRANSFER,
                &[("Idempotency-Key", "idem-1")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::UNAUTHORIZED);
    }

    #[tokio::test]
    async fn test_transfer_same_account_rejected_at_boundary() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/transfers",
                r#"{"origin":1,"destination":1,"amount":5}"#,
                &[("Idempotency-Key", "idem-1"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], types::error_codes::INVALID_PARAMETER);
        assert_eq!(t.ledger.call_count(), 0);
    }

    #[tokio::test]
    async fn test_transfer_failure_carries_error_type() {
        let t = test_app();
        t.ledger.reject(2, MovementKind::Credit, 400, "INACTIVE_ACCOUNT");

        let response = t
            .app
            .oneshot(post_json(
                "/v1/transfers",
                TRANSFER,
                &[("Idempotency-Key", "idem-2"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        let body = body_json(response).await;
        assert_eq!(body["code"], types::error_codes::TRANSFER_REJECTED);
        assert_eq!(body["errorType"], "REMOTE_ERROR");
        assert_eq!(body["msg"], "failed to credit destination");
    }

    #[tokio::test]
    async fn test_movement_debit_without_funds_is_rejected() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/accounts/movements",
                r#"{"accountNumber":1,"amount":"5.00","kind":"D"}"#,
                &[("X-Idempotency-Key", "m-1"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errorType"], "INSUFFICIENT_FUNDS");
    }

    #[tokio::test]
    async fn test_movement_credit_is_no_content() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/accounts/movements",
                r#"{"accountNumber":1,"amount":5,"kind":"C"}"#,
                &[("X-Idempotency-Key", "m-2"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::NO_CONTENT);
    }

    #[tokio::test]
    async fn test_movement_rejects_overlong_token() {
        let t = test_app();
        let token = "m".repeat(types::MAX_IDEMPOTENCY_KEY_LEN + 20);
        let response = t
            .app
            .oneshot(post_json(
                "/v1/accounts/movements",
                r#"{"accountNumber":1,"amount":5,"kind":"C"}"#,
                &[("X-Idempotency-Key", token.as_str()), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(
            body_json(response).await["code"],
            types::error_codes::INVALID_PARAMETER
        );
    }

    #[tokio::test]
    async fn test_movement_rejects_unknown_kind() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/accounts/movements",
                r#"{"accountNumber":1,"amount":5,"kind":"X"}"#,
                &[("X-Idempotency-Key", "m-3"), ("Authorization", "Bearer tok")],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_activate_unknown_account() {
        let t = test_app();
        let response = t
            .app
            .oneshot(post_json(
                "/v1/accounts/42/activate",
                r#"{"password":"password123"}"#,
                &[],
            ))
            .await
            .unwrap();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
        assert_eq!(body_json(response).await["errorType"], "INVALID_ACCOUNT");
    }
}
