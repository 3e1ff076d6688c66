//! Idempotency Store
//!
//! Durable key → result cache keyed by a caller-supplied token. The first
//! writer for a key wins; every later lookup returns that stored result.
//!
//! `get_result` and `save` are two separate calls, so two concurrent
//! requests carrying the same key can both miss the cache. Backends MUST
//! enforce key uniqueness so that only one `save` lands; the loser gets
//! [`SaveOutcome::AlreadyExists`], which callers treat as "someone else
//! already completed this request".
//!
//! Transfers and movements share one table. Every stored key carries its
//! [`KeyScope`] prefix, so a caller token can only ever hit its own scope.

pub mod memory;
pub mod postgres;

pub use memory::InMemoryIdempotencyStore;
pub use postgres::PgIdempotencyStore;

use async_trait::async_trait;

use crate::db::StoreError;

/// Longest caller token accepted in any scope
///
/// `idempotency_tb.idempotency_key` holds 128 characters; the scope prefix
/// must still fit after the token.
pub const MAX_TOKEN_LEN: usize = 100;

/// Namespace of a cached result
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum KeyScope {
    Transfer,
    Movement,
}

impl KeyScope {
    pub fn prefix(self) -> &'static str {
        match self {
            KeyScope::Transfer => "transfer:",
            KeyScope::Movement => "movement:",
        }
    }

    /// Storage key for a caller-supplied token
    pub fn key(self, token: &str) -> String {
        format!("{}{}", self.prefix(), token)
    }
}

/// Result of an idempotency save attempt
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SaveOutcome {
    /// This call stored the result
    Saved,
    /// A result for the key was already stored; nothing was written
    AlreadyExists,
}

#[async_trait]
pub trait IdempotencyStore: Send + Sync {
    /// Cached result payload for `key`, or `None` when no result was stored
    async fn get_result(&self, key: &str) -> Result<Option<String>, StoreError>;

    /// Store `result_payload` under `key` unless a result is already stored
    async fn save(
        &self,
        key: &str,
        request_payload: &str,
        result_payload: &str,
    ) -> Result<SaveOutcome, StoreError>;
}
