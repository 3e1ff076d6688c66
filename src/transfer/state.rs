//! Saga progress tracking
//!
//! ```text
//! VALIDATING → ORIGIN_DEBITED → DESTINATION_CREDITED → COMMITTED
//! ```
//!
//! The stage reached when a step fails decides which legs a compensation
//! must reverse.

use std::fmt;

use crate::account::AccountNumber;
use crate::movement::MovementKind;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SagaStage {
    /// Nothing has moved yet
    Validating,

    /// Origin debit confirmed; funds are in flight
    OriginDebited,

    /// Both legs confirmed; transfer record not yet written
    DestinationCredited,

    /// Terminal: transfer record persisted
    Committed,
}

impl SagaStage {
    /// Reversing movements owed at this stage, in the order they are issued
    ///
    /// Each reversal is a fresh movement of the opposite kind on the same
    /// account; the most recent leg is undone first.
    pub fn compensations(
        &self,
        origin: AccountNumber,
        destination: AccountNumber,
    ) -> Vec<(AccountNumber, MovementKind)> {
        match self {
            SagaStage::Validating | SagaStage::Committed => Vec::new(),
            SagaStage::OriginDebited => vec![(origin, MovementKind::Debit.opposite())],
            SagaStage::DestinationCredited => vec![
                (destination, MovementKind::Credit.opposite()),
                (origin, MovementKind::Debit.opposite()),
            ],
        }
    }

    pub fn as_str(&self) -> &'static str {
        match self {
            SagaStage::Validating => "VALIDATING",
            SagaStage::OriginDebited => "ORIGIN_DEBITED",
            SagaStage::DestinationCredited => "DESTINATION_CREDITED",
            SagaStage::Committed => "COMMITTED",
        }
    }
}

impl fmt::Display for SagaStage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_no_compensation_before_debit_or_after_commit() {
        assert!(SagaStage::Validating.compensations(1, 2).is_empty());
        assert!(SagaStage::Committed.compensations(1, 2).is_empty());
    }

    #[test]
    fn test_origin_debited_reverses_debit() {
        assert_eq!(
            SagaStage::OriginDebited.compensations(1, 2),
            vec![(1, MovementKind::Credit)]
        );
    }

    #[test]
    fn test_both_legs_reversed_newest_first() {
        assert_eq!(
            SagaStage::DestinationCredited.compensations(1, 2),
            vec![(2, MovementKind::Debit), (1, MovementKind::Credit)]
        );
    }

    #[test]
    fn test_display() {
        assert_eq!(SagaStage::OriginDebited.to_string(), "ORIGIN_DEBITED");
        assert_eq!(SagaStage::Committed.to_string(), "COMMITTED");
    }
}
