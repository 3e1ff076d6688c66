//! Movement log storage (`movements_tb`, `fees_tb`)

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use sqlx::PgPool;

use super::types::MovementKind;
use crate::account::AccountNumber;
use crate::db::StoreError;
use crate::money::Amount;

#[async_trait]
pub trait MovementStore: Send + Sync {
    async fn append(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError>;

    /// Credits minus debits minus fees; zero for an account with no history
    async fn balance(&self, account: AccountNumber) -> Result<Decimal, StoreError>;
}

pub struct PgMovementStore {
    pool: PgPool,
}

impl PgMovementStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl MovementStore for PgMovementStore {
    async fn append(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        at: DateTime<Utc>,
    ) -> Result<(), StoreError> {
        sqlx::query(
            r#"
            INSERT INTO movements_tb (account_number, moved_at, kind, amount)
            VALUES ($1, $2, $3, $4)
            "#,
        )
        .bind(account)
        .bind(at)
        .bind(kind.code())
        .bind(amount.value())
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn balance(&self, account: AccountNumber) -> Result<Decimal, StoreError> {
        let balance: Decimal = sqlx::query_scalar(
            r#"
            SELECT
                COALESCE((SELECT SUM(amount) FROM movements_tb
                          WHERE account_number = $1 AND kind = 'C'), 0)
              - COALESCE((SELECT SUM(amount) FROM movements_tb
                          WHERE account_number = $1 AND kind = 'D'), 0)
              - COALESCE((SELECT SUM(amount) FROM fees_tb
                          WHERE account_number = $1), 0)
            "#,
        )
        .bind(account)
        .fetch_one(&self.pool)
        .await?;

        Ok(balance)
    }
}
