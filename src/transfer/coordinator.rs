//! Transfer Saga
//!
//! Executes one transfer as two movement legs (debit origin, credit
//! destination) followed by a transfer record, compensating whatever already
//! succeeded when a later step fails.
//!
//! # Ordering
//!
//! ```text
//! cache read → origin lookup → destination lookup → clock read
//!            → debit origin → credit destination → persist → cache write
//! ```
//!
//! Steps run strictly in this order and none is retried within a call.
//!
//! # Cancellation
//!
//! Forward steps race the caller's [`CancellationToken`]; a cancelled step is a
//! failure of that step. Compensations never observe the token and are each
//! bounded by the configured compensation timeout. The final cache write is
//! not cancellable.

use std::future::Future;
use std::sync::Arc;
use std::time::Duration;

use tokio_util::sync::CancellationToken;
use tracing::{debug, error, info, warn};
use ulid::Ulid;

use super::error::StepFault;
use super::state::SagaStage;
use super::store::TransferStore;
use super::types::{TransferCommand, TransferErrorType, TransferResult};
use crate::account::{AccountLookup, AccountNumber, AccountSnapshot};
use crate::clock::Clock;
use crate::config::SagaConfig;
use crate::db::StoreError;
use crate::idempotency::{IdempotencyStore, KeyScope, SaveOutcome};
use crate::money::Amount;
use crate::movement::{LedgerFault, MovementKind, MovementLedger, leg_succeeded};

/// Request payload stored next to each cached result
const REQUEST_PAYLOAD: &str = "";

/// Outcome of reading the idempotency cache
enum CacheLookup {
    Hit(TransferResult),
    Miss,
    Corrupt(String),
}

pub struct TransferSaga {
    accounts: Arc<dyn AccountLookup>,
    ledger: Arc<dyn MovementLedger>,
    transfers: Arc<dyn TransferStore>,
    idempotency: Arc<dyn IdempotencyStore>,
    clock: Arc<dyn Clock>,
    compensation_timeout: Duration,
}

impl TransferSaga {
    pub fn new(
        accounts: Arc<dyn AccountLookup>,
        ledger: Arc<dyn MovementLedger>,
        transfers: Arc<dyn TransferStore>,
        idempotency: Arc<dyn IdempotencyStore>,
        clock: Arc<dyn Clock>,
        config: &SagaConfig,
    ) -> Self {
        Self {
            accounts,
            ledger,
            transfers,
            idempotency,
            clock,
            compensation_timeout: config.compensation_timeout(),
        }
    }

    /// Execute one transfer, at most once per idempotency key
    ///
    /// Never fails: every fault is classified into a [`TransferResult`], and
    /// every result computed here is written to the idempotency cache before
    /// returning.
    pub async fn execute(
        &self,
        cmd: TransferCommand,
        cancel: &CancellationToken,
    ) -> TransferResult {
        let key = KeyScope::Transfer.key(&cmd.idempotency_key);

        let result = match self.read_cache(&key, cancel).await {
            Ok(CacheLookup::Hit(cached)) => {
                debug!(idempotency_key = %key, "Transfer replayed from cache");
                return cached;
            }
            Ok(CacheLookup::Corrupt(reason)) => {
                error!(
                    idempotency_key = %key,
                    reason = %reason,
                    "Cached transfer result is unreadable"
                );
                return TransferResult::fail(
                    TransferErrorType::UnexpectedError,
                    format!("cached result for key {} is unreadable: {}", key, reason),
                );
            }
            Ok(CacheLookup::Miss) => match self.run(&cmd, cancel).await {
                Ok(result) => result,
                Err(fault) => {
                    error!(
                        idempotency_key = %key,
                        origin = cmd.origin,
                        destination = cmd.destination,
                        error = %fault,
                        "Transfer failed unexpectedly"
                    );
                    TransferResult::fail(TransferErrorType::UnexpectedError, fault.to_string())
                }
            },
            Err(fault) => {
                error!(idempotency_key = %key, error = %fault, "Idempotency lookup failed");
                TransferResult::fail(TransferErrorType::UnexpectedError, fault.to_string())
            }
        };

        self.finalize(&key, result).await
    }

    async fn read_cache(
        &self,
        key: &str,
        cancel: &CancellationToken,
    ) -> Result<CacheLookup, StepFault> {
        let payload = cancellable(cancel, "idempotency lookup", self.idempotency.get_result(key))
            .await?;

        Ok(match payload {
            Some(payload) => match serde_json::from_str(&payload) {
                Ok(result) => CacheLookup::Hit(result),
                Err(e) => CacheLookup::Corrupt(e.to_string()),
            },
            None => CacheLookup::Miss,
        })
    }

    /// Validation, both legs and persistence
    ///
    /// Business outcomes come back as `Ok`; `Err` is reserved for faults no
    /// step classifies, which the caller maps to `UNEXPECTED_ERROR`.
    async fn run(
        &self,
        cmd: &TransferCommand,
        cancel: &CancellationToken,
    ) -> Result<TransferResult, StepFault> {
        let origin = cancellable(
            cancel,
            "origin lookup",
            self.accounts.get_account(cmd.origin),
        )
        .await?;
        if let Some(rejection) = check_account(&origin, "origin") {
            return Ok(rejection);
        }

        let destination = cancellable(
            cancel,
            "destination lookup",
            self.accounts.get_account(cmd.destination),
        )
        .await?;
        if let Some(rejection) = check_account(&destination, "destination") {
            return Ok(rejection);
        }

        let now = self.clock.now();

        if let Err(reason) = self
            .leg(cmd.origin, cmd.amount, MovementKind::Debit, &cmd.credential, cancel)
            .await
        {
            warn!(
                idempotency_key = %cmd.idempotency_key,
                origin = cmd.origin,
                amount = %cmd.amount,
                reason = %reason,
                "Origin debit failed"
            );
            return Ok(TransferResult::fail(
                TransferErrorType::RemoteError,
                "failed to debit origin",
            ));
        }
        let mut stage = SagaStage::OriginDebited;

        if let Err(reason) = self
            .leg(
                cmd.destination,
                cmd.amount,
                MovementKind::Credit,
                &cmd.credential,
                cancel,
            )
            .await
        {
            warn!(
                idempotency_key = %cmd.idempotency_key,
                destination = cmd.destination,
                amount = %cmd.amount,
                reason = %reason,
                "Destination credit failed, compensating origin debit"
            );
            self.compensate(cmd, stage).await;
            return Ok(TransferResult::fail(
                TransferErrorType::RemoteError,
                "failed to credit destination",
            ));
        }
        stage = SagaStage::DestinationCredited;

        let persisted = cancellable(
            cancel,
            "transfer persistence",
            self.transfers
                .add_transfer(cmd.origin, cmd.destination, now, cmd.amount),
        )
        .await;

        match persisted {
            Ok(transfer_id) => {
                stage = SagaStage::Committed;
                info!(
                    idempotency_key = %cmd.idempotency_key,
                    transfer_id = transfer_id,
                    origin = cmd.origin,
                    destination = cmd.destination,
                    amount = %cmd.amount,
                    stage = %stage,
                    "Transfer committed"
                );
                Ok(TransferResult::success())
            }
            Err(fault) => {
                error!(
                    idempotency_key = %cmd.idempotency_key,
                    error = %fault,
                    "Transfer persistence failed, compensating both legs"
                );
                self.compensate(cmd, stage).await;
                Ok(TransferResult::fail(
                    TransferErrorType::PersistenceError,
                    "failed to persist transfer",
                ))
            }
        }
    }

    /// One forward movement call with a fresh request token
    ///
    /// Rejections, transport faults and cancellation all collapse into `Err`.
    async fn leg(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        credential: &str,
        cancel: &CancellationToken,
    ) -> Result<(), String> {
        let request_token = Ulid::new().to_string();
        debug!(
            ledger = self.ledger.name(),
            account = account,
            kind = %kind,
            amount = %amount,
            request_token = %request_token,
            "Issuing movement"
        );

        let call = self
            .ledger
            .move_funds(account, amount, kind, credential, &request_token);
        let result = tokio::select! {
            biased;
            _ = cancel.cancelled() => Err(LedgerFault::Cancelled),
            result = call => result,
        };

        leg_succeeded(result)
    }

    /// Best-effort reversal of every leg confirmed at `stage`
    ///
    /// Failures are logged and never change the caller-visible result.
    async fn compensate(&self, cmd: &TransferCommand, stage: SagaStage) {
        for (account, kind) in stage.compensations(cmd.origin, cmd.destination) {
            let request_token = Ulid::new().to_string();
            let call = self.ledger.move_funds(
                account,
                cmd.amount,
                kind,
                &cmd.credential,
                &request_token,
            );

            match tokio::time::timeout(self.compensation_timeout, call).await {
                Ok(result) => match leg_succeeded(result) {
                    Ok(()) => info!(
                        idempotency_key = %cmd.idempotency_key,
                        account = account,
                        kind = %kind,
                        amount = %cmd.amount,
                        request_token = %request_token,
                        "Compensation applied"
                    ),
                    Err(reason) => error!(
                        ledger = self.ledger.name(),
                        idempotency_key = %cmd.idempotency_key,
                        account = account,
                        kind = %kind,
                        amount = %cmd.amount,
                        request_token = %request_token,
                        reason = %reason,
                        "Compensation failed, manual reconciliation required"
                    ),
                },
                Err(_) => error!(
                    ledger = self.ledger.name(),
                    idempotency_key = %cmd.idempotency_key,
                    account = account,
                    kind = %kind,
                    amount = %cmd.amount,
                    request_token = %request_token,
                    timeout_ms = self.compensation_timeout.as_millis() as u64,
                    "Compensation timed out, manual reconciliation required"
                ),
            }
        }
    }

    /// Cache `result` under `key`; a concurrent winner's result takes precedence
    async fn finalize(&self, key: &str, result: TransferResult) -> TransferResult {
        let payload = match serde_json::to_string(&result) {
            Ok(payload) => payload,
            Err(e) => {
                error!(idempotency_key = %key, error = %e, "Failed to encode transfer result");
                return result;
            }
        };

        match self.idempotency.save(key, REQUEST_PAYLOAD, &payload).await {
            Ok(SaveOutcome::Saved) => result,
            Ok(SaveOutcome::AlreadyExists) => {
                warn!(
                    idempotency_key = %key,
                    "Concurrent transfer with the same key completed first"
                );
                match self.idempotency.get_result(key).await {
                    Ok(Some(stored)) => serde_json::from_str(&stored).unwrap_or_else(|e| {
                        error!(
                            idempotency_key = %key,
                            error = %e,
                            "Winner's cached result is unreadable"
                        );
                        result
                    }),
                    Ok(None) => result,
                    Err(e) => {
                        error!(
                            idempotency_key = %key,
                            error = %e,
                            "Failed to read winner's result"
                        );
                        result
                    }
                }
            }
            Err(e) => {
                error!(
                    idempotency_key = %key,
                    error = %e,
                    "Failed to cache transfer result; a retry may re-execute"
                );
                result
            }
        }
    }
}

fn check_account(account: &AccountSnapshot, role: &str) -> Option<TransferResult> {
    if !account.exists {
        Some(TransferResult::fail(
            TransferErrorType::InvalidAccount,
            format!("{} not found", role),
        ))
    } else if !account.active {
        Some(TransferResult::fail(
            TransferErrorType::InactiveAccount,
            format!("{} inactive", role),
        ))
    } else {
        None
    }
}

/// Race a storage call against cancellation
async fn cancellable<T, F>(
    cancel: &CancellationToken,
    step: &'static str,
    fut: F,
) -> Result<T, StepFault>
where
    F: Future<Output = Result<T, StoreError>>,
{
    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(StepFault::Cancelled { step }),
        result = fut => result.map_err(StepFault::from),
    }
}
