//! Ledger Saga - multi-account ledger with compensating transfers
//!
//! # Modules
//!
//! - [`money`] - Strictly positive `Amount`
//! - [`account`] - Account lookup and create/activate/deactivate lifecycle
//! - [`movement`] - Append-only credit/debit log and the ledger client seam
//! - [`idempotency`] - First-writer-wins result cache
//! - [`transfer`] - The transfer saga (debit, credit, persist, compensate)
//! - [`gateway`] - axum HTTP boundary with OpenAPI docs
//! - [`config`] / [`logging`] / [`db`] - ambient infrastructure

// Core value types
pub mod clock;
pub mod money;

// Infrastructure
pub mod config;
pub mod db;
pub mod logging;

// Domain
pub mod account;
pub mod idempotency;
pub mod movement;
pub mod transfer;

// HTTP boundary
pub mod gateway;

// Convenient re-exports at crate root
pub use clock::{Clock, FixedClock, SystemClock};
pub use money::{Amount, MoneyError};
pub use transfer::{TransferCommand, TransferErrorType, TransferResult, TransferSaga};
