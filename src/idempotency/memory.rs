//! In-memory idempotency backend
//!
//! Used by tests and by single-node deployments configured with
//! `idempotency_backend: memory`. Results do not survive a restart.

use async_trait::async_trait;
use dashmap::DashMap;
use dashmap::mapref::entry::Entry;

use super::{IdempotencyStore, SaveOutcome};
use crate::db::StoreError;

#[derive(Debug, Clone)]
struct IdempotencyRecord {
    #[allow(dead_code)]
    request: String,
    result: String,
}

#[derive(Debug, Default)]
pub struct InMemoryIdempotencyStore {
    records: DashMap<String, IdempotencyRecord>,
}

impl InMemoryIdempotencyStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}

#[async_trait]
impl IdempotencyStore for InMemoryIdempotencyStore {
    async fn get_result(&self, key: &str) -> Result<Option<String>, StoreError> {
        Ok(self
            .records
            .get(key)
            .map(|record| record.result.clone())
            .filter(|result| !result.trim().is_empty()))
    }

    async fn save(
        &self,
        key: &str,
        request_payload: &str,
        result_payload: &str,
    ) -> Result<SaveOutcome, StoreError> {
        // Entry API holds the shard lock, so check-and-insert is atomic
        match self.records.entry(key.to_string()) {
            Entry::Occupied(_) => Ok(SaveOutcome::AlreadyExists),
            Entry::Vacant(slot) => {
                slot.insert(IdempotencyRecord {
                    request: request_payload.to_string(),
                    result: result_payload.to_string(),
                });
                Ok(SaveOutcome::Saved)
            }
        }
    }
}
