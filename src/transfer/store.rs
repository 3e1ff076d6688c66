//! Transfer persistence (`transfers_tb`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::PgPool;

use crate::account::AccountNumber;
use crate::db::StoreError;
use crate::money::Amount;

#[async_trait]
pub trait TransferStore: Send + Sync {
    /// Append a committed transfer and return its id
    async fn add_transfer(
        &self,
        origin: AccountNumber,
        destination: AccountNumber,
        timestamp: DateTime<Utc>,
        amount: Amount,
    ) -> Result<i64, StoreError>;
}

pub struct PgTransferStore {
    pool: PgPool,
}

impl PgTransferStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl TransferStore for PgTransferStore {
    async fn add_transfer(
        &self,
        origin: AccountNumber,
        destination: AccountNumber,
        timestamp: DateTime<Utc>,
        amount: Amount,
    ) -> Result<i64, StoreError> {
        let id: i64 = sqlx::query_scalar(
            r#"
            INSERT INTO transfers_tb (origin_number, destination_number, moved_at, amount)
            VALUES ($1, $2, $3, $4)
            RETURNING id
            "#,
        )
        .bind(origin)
        .bind(destination)
        .bind(timestamp)
        .bind(amount.value())
        .fetch_one(&self.pool)
        .await?;

        Ok(id)
    }
}


#[cfg(test)]
pub use mock::MockTransferStore;
