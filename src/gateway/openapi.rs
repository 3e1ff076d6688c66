//! OpenAPI / Swagger UI Documentation
//!
//! - Swagger UI: `http://localhost:8080/docs`
//! - OpenAPI JSON: `http://localhost:8080/api-docs/openapi.json`

use utoipa::openapi::security::{HttpAuthScheme, HttpBuilder, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::account::{AccountPasswordRequest, CreateAccountRequest, CreateAccountResponse};
use crate::gateway::handlers::HealthResponse;
use crate::gateway::types::{ErrorBody, MovementApiRequest, TransferRequest};
use crate::transfer::{TransferErrorType, TransferResult};

/// Opaque bearer credential, forwarded to the movement ledger
struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        if let Some(components) = openapi.components.as_mut() {
            components.add_security_scheme(
                "bearer_auth",
                SecurityScheme::Http(
                    HttpBuilder::new()
                        .scheme(HttpAuthScheme::Bearer)
                        .description(Some(
                            "Caller credential; forwarded unmodified to the movement ledger",
                        ))
                        .build(),
                ),
            );
        }
    }
}

#[derive(OpenApi)]
#[openapi(
    info(
        title = "Ledger Saga API",
        version = "1.0.0",
        description = "Account lifecycle, movement recording and compensating cross-account transfers."
    ),
    servers(
        (url = "http://localhost:8080", description = "Development"),
    ),
    paths(
        crate::gateway::handlers::health::health_check,
        crate::gateway::handlers::transfer::create_transfer,
        crate::gateway::handlers::movement::create_movement,
        crate::gateway::handlers::account::create_account,
        crate::gateway::handlers::account::activate_account,
        crate::gateway::handlers::account::deactivate_account,
    ),
    components(
        schemas(
            HealthResponse,
            ErrorBody,
            TransferRequest,
            TransferResult,
            TransferErrorType,
            MovementApiRequest,
            CreateAccountRequest,
            CreateAccountResponse,
            AccountPasswordRequest,
        )
    ),
    modifiers(&SecurityAddon),
    tags(
        (name = "Transfer", description = "Cross-account transfers (bearer credential required)"),
        (name = "Movement", description = "Credit/debit recording (bearer credential required)"),
        (name = "Account", description = "Account lifecycle"),
        (name = "System", description = "Health checks")
    )
)]
pub struct ApiDoc;
