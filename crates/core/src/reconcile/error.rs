//! Reconciliation errors.

use rust_decimal::Decimal;
use thiserror::Error;

/// Reasons a reconciliation cannot be committed.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ReconcileError {
    /// Recording usage needs explicit confirmation from the user.
    #[error("Recording usage of {quantity} requires confirmation")]
    ConfirmationRequired {
        /// Quantity that would be removed.
        quantity: Decimal,
    },

    /// The declared quantity is above the ledger; it must be entered as added stock.
    #[error("Declared quantity exceeds the ledger by {quantity}; record it as added stock")]
    DirectAdditionNotAllowed {
        /// Quantity missing from the ledger.
        quantity: Decimal,
    },

    /// The declared remaining quantity is negative.
    #[error("Remaining quantity cannot be negative, got {0}")]
    NegativeDeclaredQuantity(Decimal),
}

impl ReconcileError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::ConfirmationRequired { .. } => "CONFIRMATION_REQUIRED",
            Self::DirectAdditionNotAllowed { .. } => "DIRECT_ADDITION_NOT_ALLOWED",
            Self::NegativeDeclaredQuantity(_) => "NEGATIVE_DECLARED_QUANTITY",
        }
    }
}
