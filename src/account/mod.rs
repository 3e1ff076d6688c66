//! Account management module
//!
//! PostgreSQL-backed account storage, the read-only lookup consumed by
//! transfers and movements, and the create/activate/deactivate lifecycle.

pub mod error;
pub mod models;
pub mod repository;
pub mod service;
pub mod validation;

pub use error::AccountError;
pub use models::{
    AccountCredentials, AccountNumber, AccountPasswordRequest, AccountSnapshot,
    CreateAccountRequest, CreateAccountResponse,
};
pub use repository::{AccountLookup, AccountStore, PgAccountRepository};
pub use service::AccountService;

#[cfg(test)]
pub use repository::MockAccountLookup;
