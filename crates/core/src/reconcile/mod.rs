//! Ending-inventory reconciliation.
//!
//! Compares a declared on-hand quantity with the ledger-computed ending
//! quantity and decides which adjustment, if any, may be written.

pub mod error;
pub mod service;

pub use error::ReconcileError;
pub use service::{
    AddStockPrefill, ReconciliationPlan, ReconciliationService, UsageEntry, UsageItem,
    reconcile_ending_inventory,
};
