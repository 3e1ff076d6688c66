//! Transfer Saga
//!
//! Moves money between two accounts as a saga over the movement ledger:
//! a debit on the origin, a credit on the destination, then a durable
//! transfer record. There is no two-phase commit; a step that fails after
//! earlier steps succeeded triggers best-effort reversing movements.
//!
//! # Stages
//!
//! ```text
//! VALIDATING → ORIGIN_DEBITED → DESTINATION_CREDITED → COMMITTED
//!      ↓              ↓                   ↓
//!   (reject)   credit origin      debit destination, credit origin
//! ```
//!
//! # Safety Invariants
//!
//! 1. **At most one effective execution per idempotency key**: every terminal
//!    result is cached; a cache hit returns without side effects
//! 2. **Forward-only reversal**: compensation appends opposite movements and
//!    never deletes a movement
//! 3. **Original error wins**: a failed compensation is logged and never
//!    changes the reported error type

pub mod coordinator;
pub mod error;
pub mod state;
pub mod store;
pub mod types;

pub use coordinator::TransferSaga;
pub use error::StepFault;
pub use state::SagaStage;
pub use store::{PgTransferStore, TransferStore};
pub use types::{TransferCommand, TransferErrorType, TransferResult};
