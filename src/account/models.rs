//! Data models for account lookup and lifecycle

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

/// Account number as stored in `accounts_tb`
pub type AccountNumber = i32;

/// Point-in-time view of an account used for transfer validation
///
/// Lookups never fail for a missing account; absence is `exists == false`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AccountSnapshot {
    pub exists: bool,
    pub number: AccountNumber,
    pub name: String,
    pub active: bool,
}

impl AccountSnapshot {
    pub fn found(number: AccountNumber, name: impl Into<String>, active: bool) -> Self {
        Self {
            exists: true,
            number,
            name: name.into(),
            active,
        }
    }

    pub fn missing(number: AccountNumber) -> Self {
        Self {
            exists: false,
            number,
            name: String::new(),
            active: false,
        }
    }
}

/// Stored credentials for activate/deactivate checks
#[derive(Debug, Clone)]
pub struct AccountCredentials {
    pub number: AccountNumber,
    pub active: bool,
    /// Argon2 PHC string (embeds the salt)
    pub password_hash: String,
}

/// Account creation request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct CreateAccountRequest {
    #[schema(example = "Maria Silva")]
    pub name: String,
    /// National identity document (CPF); punctuation is ignored
    #[schema(example = "52998224725")]
    pub document: String,
    #[schema(example = "password123")]
    pub password: String,
}

/// Account activate/deactivate request
#[derive(Debug, Clone, Deserialize, ToSchema)]
pub struct AccountPasswordRequest {
    pub password: String,
}

#[derive(Debug, Clone, Serialize, ToSchema)]
pub struct CreateAccountResponse {
    #[schema(example = 1)]
    pub number: AccountNumber,
}
