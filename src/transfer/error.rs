//! Step faults inside one saga execution
//!
//! These never reach the caller: the saga classifies every fault into a
//! [`super::TransferResult`] before returning.

use thiserror::Error;

use crate::db::StoreError;

#[derive(Debug, Error)]
pub enum StepFault {
    #[error("Storage failure: {0}")]
    Store(#[from] StoreError),

    #[error("{step} cancelled")]
    Cancelled { step: &'static str },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_messages() {
        let fault = StepFault::Cancelled {
            step: "origin lookup",
        };
        assert_eq!(fault.to_string(), "origin lookup cancelled");

        let fault: StepFault = StoreError::CorruptRow("active".to_string()).into();
        assert_eq!(fault.to_string(), "Storage failure: Corrupt row: active");
    }
}
