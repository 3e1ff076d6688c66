//! Account lifecycle: create, activate, deactivate
//!
//! Credentials are Argon2 PHC strings; the salt travels inside the hash.

use std::sync::Arc;

use argon2::{
    Argon2,
    password_hash::{PasswordHash, PasswordHasher, PasswordVerifier, SaltString, rand_core::OsRng},
};
use tracing::{info, warn};

use super::error::AccountError;
use super::models::{AccountCredentials, AccountNumber, CreateAccountRequest};
use super::repository::AccountStore;
use super::validation::{Document, HolderName};
use crate::db::{StoreError, is_unique_violation};

const MIN_PASSWORD_LEN: usize = 8;

pub struct AccountService {
    store: Arc<dyn AccountStore>,
}

impl AccountService {
    pub fn new(store: Arc<dyn AccountStore>) -> Self {
        Self { store }
    }

    /// Open a new, active account and return its number
    pub async fn create(&self, req: CreateAccountRequest) -> Result<AccountNumber, AccountError> {
        let name = HolderName::new(&req.name)?;
        let document = Document::new(&req.document)?;
        if req.password.len() < MIN_PASSWORD_LEN {
            return Err(AccountError::InvalidValue(format!(
                "password must have at least {} characters",
                MIN_PASSWORD_LEN
            )));
        }

        if self.store.document_exists(document.as_str()).await? {
            return Err(AccountError::DuplicateDocument);
        }

        let password_hash = hash_password(&req.password)?;

        let created = self
            .store
            .create(name.as_str(), document.as_str(), &password_hash)
            .await;
        let number = match created {
            Ok(number) => number,
            // Lost a race with a concurrent registration of the same document
            Err(StoreError::Database(e)) if is_unique_violation(&e) => {
                return Err(AccountError::DuplicateDocument);
            }
            Err(e) => return Err(e.into()),
        };

        info!(account = number, "Account created");
        Ok(number)
    }

    pub async fn activate(
        &self,
        number: AccountNumber,
        password: &str,
    ) -> Result<(), AccountError> {
        let account = self
            .store
            .get_credentials(number)
            .await?
            .ok_or(AccountError::NotFound)?;

        if account.active {
            return Err(AccountError::AlreadyActive);
        }
        verify_password(&account, password)?;

        self.store.set_active(number, true).await?;
        info!(account = number, "Account activated");
        Ok(())
    }

    pub async fn deactivate(
        &self,
        number: AccountNumber,
        password: &str,
    ) -> Result<(), AccountError> {
        let account = match self.store.get_credentials(number).await? {
            Some(acc) if acc.active => acc,
            _ => return Err(AccountError::NotFoundOrInactive),
        };
        verify_password(&account, password)?;

        self.store.set_active(number, false).await?;
        info!(account = number, "Account deactivated");
        Ok(())
    }
}

fn hash_password(password: &str) -> Result<String, AccountError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| AccountError::Hashing(e.to_string()))
}

fn verify_password(account: &AccountCredentials, password: &str) -> Result<(), AccountError> {
    let parsed = PasswordHash::new(&account.password_hash).map_err(|e| {
        warn!(account = account.number, error = %e, "Stored password hash is malformed");
        AccountError::Unauthorized
    })?;

    Argon2::default()
        .verify_password(password.as_bytes(), &parsed)
        .map_err(|_| AccountError::Unauthorized)
}
