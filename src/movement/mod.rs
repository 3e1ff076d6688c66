//! Movement Module
//!
//! The append-only credit/debit log behind every balance, and the client
//! seam ([`MovementLedger`]) the transfer saga moves money through.
//!
//! Two ledger implementations ship:
//! - [`HttpMovementLedger`]: calls a remote movement API
//! - [`LocalMovementLedger`]: calls [`MovementService`] in-process

pub mod error;
pub mod http;
pub mod ledger;
pub mod service;
pub mod store;
pub mod types;

pub use error::MovementError;
pub use http::HttpMovementLedger;
pub use ledger::{LedgerFault, MovementLedger, leg_succeeded};
pub use service::{LocalMovementLedger, MovementService};
pub use store::{MovementStore, PgMovementStore};
pub use types::{MoveOutcome, MovementCommand, MovementKind, MovementRequest, MovementResult};

#[cfg(test)]
pub use ledger::MockLedger;
#[cfg(test)]
pub use service::mock::MemoryMovementStore;
