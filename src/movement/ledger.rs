//! Movement ledger client seam
//!
//! The saga only ever talks to the ledger through [`MovementLedger`]. A call
//! can fail on two channels: a non-success [`MoveOutcome`] (the ledger
//! answered and said no) or a [`LedgerFault`] (the ledger could not be
//! reached or answered garbage). Callers that need a single signal use
//! [`leg_succeeded`].

use async_trait::async_trait;
use thiserror::Error;

use super::types::{MoveOutcome, MovementKind};
use crate::account::AccountNumber;
use crate::money::Amount;

/// Transport or protocol fault raised by a ledger call
#[derive(Debug, Error, Clone)]
pub enum LedgerFault {
    #[error("Movement API unreachable: {0}")]
    Transport(String),

    #[error("Movement API timed out")]
    Timeout,

    #[error("Movement API protocol error: {0}")]
    Protocol(String),

    #[error("Movement ledger internal error: {0}")]
    Internal(String),

    #[error("Movement call cancelled")]
    Cancelled,
}

#[async_trait]
pub trait MovementLedger: Send + Sync {
    /// Adapter name for logging
    fn name(&self) -> &'static str;

    /// Append one credit or debit to `account`'s movement log
    ///
    /// `request_token` deduplicates this single call on the ledger side and
    /// must be fresh for every logical movement.
    async fn move_funds(
        &self,
        account: AccountNumber,
        amount: Amount,
        kind: MovementKind,
        credential: &str,
        request_token: &str,
    ) -> Result<MoveOutcome, LedgerFault>;
}

/// Collapse both failure channels into one: `Ok(())` only for a confirmed move
pub fn leg_succeeded(result: Result<MoveOutcome, LedgerFault>) -> Result<(), String> {
    match result {
        Ok(outcome) if outcome.successful => Ok(()),
        Ok(outcome) => Err(format!(
            "rejected with status {}: {}",
            outcome.status_code, outcome.body
        )),
        Err(fault) => Err(fault.to_string()),
    }
}

/// Mock ledger for testing
#[cfg(test)]
pub mod mock {
    use super::*;
    use std::collections::HashSet;
    use std::sync::Mutex;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::time::Duration;

    /// One recorded `move_funds` call
    #[derive(Debug, Clone, PartialEq, Eq)]
    pub struct MoveCall {
        pub account: AccountNumber,
        pub amount: Amount,
        pub kind: MovementKind,
        pub credential: String,
        pub request_token: String,
    }

    /// Configured reaction to a call
    #[derive(Debug, Clone)]
    enum Behavior {
        Accept,
        Reject(u16, String),
        Fault(LedgerFault),
    }

    pub struct MockLedger {
        calls: Mutex<Vec<MoveCall>>,
        call_count: AtomicUsize,
        /// Behavior keyed by (account, kind); everything else is accepted
        behaviors: Mutex<Vec<((AccountNumber, MovementKind), Behavior)>>,
        /// Accounts whose calls never complete
        hanging: Mutex<HashSet<(AccountNumber, MovementKind)>>,
        delay: Mutex<Option<Duration>>,
    }

    impl Default for MockLedger {
        fn default() -> Self {
            Self::new()
        }
    }

    impl MockLedger {
        pub fn new() -> Self {
            Self {
                calls: Mutex::new(Vec::new()),
                call_count: AtomicUsize::new(0),
                behaviors: Mutex::new(Vec::new()),
                hanging: Mutex::new(HashSet::new()),
                delay: Mutex::new(None),
            }
        }

        fn set(&self, account: AccountNumber, kind: MovementKind, behavior: Behavior) {
            let mut behaviors = self.behaviors.lock().unwrap();
            behaviors.retain(|(k, _)| *k != (account, kind));
            behaviors.push(((account, kind), behavior));
        }

        /// Answer `kind` calls on `account` with a non-success outcome
        pub fn reject(&self, account: AccountNumber, kind: MovementKind, status: u16, body: &str) {
            self.set(account, kind, Behavior::Reject(status, body.to_string()));
        }

        /// Fail `kind` calls on `account` with a transport fault
        pub fn fault(&self, account: AccountNumber, kind: MovementKind) {
            self.set(
                account,
                kind,
                Behavior::Fault(LedgerFault::Transport("mock connection refused".to_string())),
            );
        }

        pub fn accept(&self, account: AccountNumber, kind: MovementKind) {
            self.set(account, kind, Behavior::Accept);
        }

        /// Make `kind` calls on `account` block forever
        pub fn hang(&self, account: AccountNumber, kind: MovementKind) {
            self.hanging.lock().unwrap().insert((account, kind));
        }

        /// Delay every call before answering
        pub fn set_delay(&self, delay: Duration) {
            *self.delay.lock().unwrap() = Some(delay);
        }

        pub fn call_count(&self) -> usize {
            self.call_count.load(Ordering::SeqCst)
        }

        pub fn calls(&self) -> Vec<MoveCall> {
            self.calls.lock().unwrap().clone()
        }

        /// `(account, kind, amount)` per call, in order
        pub fn legs(&self) -> Vec<(AccountNumber, MovementKind, Amount)> {
            self.calls()
                .into_iter()
                .map(|c| (c.account, c.kind, c.amount))
                .collect()
        }
    }

    #[async_trait]
    impl MovementLedger for MockLedger {
        fn name(&self) -> &'static str {
            "mock"
        }

        async fn move_funds(
            &self,
            account: AccountNumber,
            amount: Amount,
            kind: MovementKind,
            credential: &str,
            request_token: &str,
        ) -> Result<MoveOutcome, LedgerFault> {
            self.call_count.fetch_add(1, Ordering::SeqCst);
            self.calls.lock().unwrap().push(MoveCall {
                account,
                amount,
                kind,
                credential: credential.to_string(),
                request_token: request_token.to_string(),
            });

            let delay = *self.delay.lock().unwrap();
            if let Some(delay) = delay {
                tokio::time::sleep(delay).await;
            }

            let hangs = self.hanging.lock().unwrap().contains(&(account, kind));
            if hangs {
                std::future::pending::<()>().await;
            }

            let behavior = self
                .behaviors
                .lock()
                .unwrap()
                .iter()
                .find(|(k, _)| *k == (account, kind))
                .map(|(_, b)| b.clone())
                .unwrap_or(Behavior::Accept);

            match behavior {
                Behavior::Accept => Ok(MoveOutcome::accepted()),
                Behavior::Reject(status, body) => Ok(MoveOutcome::rejected(status, body)),
                Behavior::Fault(fault) => Err(fault),
            }
        }
    }

    #[cfg(test)]
    mod tests {
        use super::*;
        use rust_decimal::Decimal;

        fn ten() -> Amount {
            Amount::new(Decimal::TEN).unwrap()
        }

        #[tokio::test]
        async fn test_mock_ledger_records_calls() {
            let ledger = MockLedger::new();
            let outcome = ledger
                .move_funds(1, ten(), MovementKind::Debit, "tok", "r1")
                .await
                .unwrap();
            assert!(outcome.successful);
            assert_eq!(ledger.call_count(), 1);
            assert_eq!(ledger.legs(), vec![(1, MovementKind::Debit, ten())]);
            assert_eq!(ledger.calls()[0].request_token, "r1");
        }

        #[tokio::test]
        async fn test_mock_ledger_reject_and_fault() {
            let ledger = MockLedger::new();
            ledger.reject(2, MovementKind::Credit, 400, "INACTIVE_ACCOUNT");
            ledger.fault(3, MovementKind::Credit);

            let outcome = ledger
                .move_funds(2, ten(), MovementKind::Credit, "tok", "r1")
                .await
                .unwrap();
            assert!(!outcome.successful);
            assert_eq!(outcome.status_code, 400);

            let fault = ledger
                .move_funds(3, ten(), MovementKind::Credit, "tok", "r2")
                .await;
            assert!(matches!(fault, Err(LedgerFault::Transport(_))));

            // Other direction on the same account is unaffected
            let outcome = ledger
                .move_funds(2, ten(), MovementKind::Debit, "tok", "r3")
                .await
                .unwrap();
            assert!(outcome.successful);
        }
    }
}

#[cfg(test)]
pub use mock::MockLedger;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_leg_succeeded_normalizes_channels() {
        assert!(leg_succeeded(Ok(MoveOutcome::accepted())).is_ok());

        let rejected = leg_succeeded(Ok(MoveOutcome::rejected(400, "INSUFFICIENT_FUNDS")));
        assert_eq!(
            rejected.unwrap_err(),
            "rejected with status 400: INSUFFICIENT_FUNDS"
        );

        let fault = leg_succeeded(Err(LedgerFault::Timeout));
        assert_eq!(fault.unwrap_err(), "Movement API timed out");
    }
}
