//! Movement recording service
//!
//! Records one credit or debit after checking the account and, for debits,
//! the available balance. Every outcome (including business rejections) is
//! cached under the request token, so a retried delivery never applies the
//! same movement twice. A token that could not be cached is refused before
//! anything is written.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, info, warn};

use super::error::{MovementError, codes};
use super::ledger::{LedgerFault, MovementLedger};
use super::store::MovementStore;
use super::types::{MoveOutcome, MovementCommand, MovementKind, MovementRequest, MovementResult};
use crate::account::{AccountLookup, AccountNumber};
use crate::clock::Clock;
use crate::idempotency::{IdempotencyStore, KeyScope, MAX_TOKEN_LEN, SaveOutcome};
use crate::money::Amount;

pub struct MovementService {
    accounts: Arc<dyn AccountLookup>,
    movements: Arc<dyn MovementStore>,
    idempotency: Arc<dyn IdempotencyStore>,
    clock: Arc<dyn Clock>,
}

impl MovementService {
    pub fn new(
        accounts: Arc<dyn AccountLookup>,
        movements: Arc<dyn MovementStore>,
        idempotency: Arc<dyn IdempotencyStore>,
        clock: Arc<dyn Clock>,
    ) -> Self {
        Self {
            accounts,
            movements,
            idempotency,
            clock,
        }
    }

    pub async fn record(&self, cmd: MovementCommand) -> Result<MovementResult, MovementError> {
        let token = cmd.request_token.trim();
        if token.is_empty() || token.len() > MAX_TOKEN_LEN {
            return Err(MovementError::InvalidToken {
                len: token.len(),
                max: MAX_TOKEN_LEN,
            });
        }
        let key = KeyScope::Movement.key(token);

        if let Some(cached) = self.cached(&key).await? {
            debug!(request_token = %cmd.request_token, "Movement replayed from cache");
            return Ok(cached);
        }

        let result = self.apply(&cmd).await?;

        let request = serde_json::to_string(&MovementRequest {
            account_number: cmd.account,
            amount: cmd.amount,
            kind: cmd.kind,
        })?;
        let payload = serde_json::to_string(&result)?;

        match self.idempotency.save(&key, &request, &payload).await? {
            SaveOutcome::Saved => Ok(result),
            SaveOutcome::AlreadyExists => {
                warn!(
                    request_token = %cmd.request_token,
                    "Concurrent movement with the same token completed first"
                );
                Ok(self.cached(&key).await?.unwrap_or(result))
            }
        }
    }

    async fn cached(&self, key: &str) -> Result<Option<MovementResult>, MovementError> {
        match self.idempotency.get_result(key).await? {
            Some(payload) => serde_json::from_str(&payload)
                .map(Some)
                .map_err(|e| MovementError::CorruptCache {
                    key: key.to_string(),
                    reason: e.to_string(),
                }),
            None => Ok(None),
        }
    }

    async fn apply(&self, cmd: &MovementCommand) -> Result<MovementResult, MovementError> {
        let account = self.accounts.get_account(cmd.account).await?;
        if !account.exists {
            return Ok(MovementResult::fail(codes::INVALID_ACCOUNT, "account not found"));
        }
        if !account.active {
            return Ok(MovementResult::fail(codes::INACTIVE_ACCOUNT, "account inactive"));
        }

        if cmd.kind == MovementKind::Debit {
            let balance = self.movements.balance(cmd.account).await?;
            if balance < cmd.amount.value() {
                info!(
                    account = cmd.account,
                    balance = %balance,
                    amount = %cmd.amount,
                    "Debit rejected: insufficient funds"
                );
                return Ok(MovementResult::fail(
                    codes::INSUFFICIENT_FUNDS,
                    "insufficient funds",
                ));
            }
        }

        self.movements
            .append(cmd.account, cmd.amount, cmd.kind, self.clock.now())
            .await?;

        info!(
            account = cmd.account,
            kind = %cmd.kind,
            amount = %cmd.amount,
            "Movement recorded"
        );
        Ok(MovementResult::ok())
    }
}

/// [`MovementLedger`] that records movements in-process
///
/// Used when the saga and the movement log live in the same deployment.
pub struct LocalMovementLedger {
    service: Arc<MovementService>,
}

impl LocalMovementLedger {
    pub fn new(service: Arc<MovementService>) -> Self {
        Self { service }
    }
}

#[async_trait]
impl MovementLedger for LocalMovementLedger {
    fn name(&self) -> &'static str {
        "local"
    }

    async fn move_funds(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        _credential: &str,
        request_token: &str,
    ) -> Result<MoveOutcome, LedgerFault> {
        let cmd = MovementCommand {
            account,
            amount,
            kind,
            request_token: request_token.to_string(),
        };

        match self.service.record(cmd).await {
            Ok(result) if result.success => Ok(MoveOutcome::accepted()),
            Ok(result) => Ok(MoveOutcome::rejected(
                400,
                result.error_type.unwrap_or_default(),
            )),
            Err(e) => Err(LedgerFault::Internal(e.to_string())),
        }
    }
}
