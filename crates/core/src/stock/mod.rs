//! Per-item stock ledger and month rollups.

pub mod ledger;
pub mod types;

#[cfg(test)]
mod props;

pub use ledger::{StockLedger, history, ledger_rollup, validate_adjustment};
pub use types::{LedgerRollup, OperationKind, StockEntry};
