//! PostgreSQL idempotency backend (`idempotency_tb`)

use async_trait::async_trait;
use sqlx::PgPool;

use super::{IdempotencyStore, SaveOutcome};
use crate::db::StoreError;

pub struct PgIdempotencyStore {
    pool: PgPool,
}

impl PgIdempotencyStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl IdempotencyStore for PgIdempotencyStore {
    async fn get_result(&self, key: &str) -> Result<Option<String>, StoreError> {
        let result: Option<Option<String>> = sqlx::query_scalar(
            "SELECT result FROM idempotency_tb WHERE idempotency_key = $1",
        )
        .bind(key)
        .fetch_optional(&self.pool)
        .await?;

        Ok(result.flatten().filter(|r| !r.trim().is_empty()))
    }

    async fn save(
        &self,
        key: &str,
        request_payload: &str,
        result_payload: &str,
    ) -> Result<SaveOutcome, StoreError> {
        let inserted = sqlx::query(
            r#"
            INSERT INTO idempotency_tb (idempotency_key, request, result)
            VALUES ($1, $2, $3)
            ON CONFLICT (idempotency_key) DO NOTHING
            "#,
        )
        .bind(key)
        .bind(request_payload)
        .bind(result_payload)
        .execute(&self.pool)
        .await?;

        if inserted.rows_affected() > 0 {
            Ok(SaveOutcome::Saved)
        } else {
            tracing::debug!(idempotency_key = %key, "Idempotency key already stored");
            Ok(SaveOutcome::AlreadyExists)
        }
    }
}
