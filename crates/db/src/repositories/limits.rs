//! Insert-limit policy seam.
//!
//! Whether a create is allowed is decided outside this crate. Repositories ask
//! the oracle before every insert and skip the write when it says no.

use std::fmt;
use std::sync::Arc;

use tracing::warn;

use super::error::RepositoryError;

/// Resources whose creation can be capped.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LimitedResource {
    /// Inventory items.
    Items,
    /// Stock ledger entries.
    InventoryLogs,
    /// Item categories.
    Categories,
    /// Taxes.
    Taxes,
    /// Vendors.
    Vendors,
    /// Revenue groups.
    RevenueGroups,
    /// Monthly revenue rows.
    Revenues,
    /// Expense groups.
    ExpenseGroups,
    /// One-off expenses.
    Expenses,
    /// Recurring monthly expenses.
    MonthlyExpenses,
}

impl fmt::Display for LimitedResource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            Self::Items => "items",
            Self::InventoryLogs => "inventory entries",
            Self::Categories => "categories",
            Self::Taxes => "taxes",
            Self::Vendors => "vendors",
            Self::RevenueGroups => "revenue groups",
            Self::Revenues => "revenues",
            Self::ExpenseGroups => "expense groups",
            Self::Expenses => "expenses",
            Self::MonthlyExpenses => "monthly expenses",
        };
        f.write_str(name)
    }
}

/// External boolean policy consulted before inserts.
pub trait InsertLimitOracle: Send + Sync {
    /// Whether no more rows of `resource` may be created.
    fn limit_reached(&self, resource: LimitedResource) -> bool;
}

/// Oracle that never limits anything.
#[derive(Debug, Clone, Copy, Default)]
pub struct Unlimited;

impl InsertLimitOracle for Unlimited {
    fn limit_reached(&self, _resource: LimitedResource) -> bool {
        false
    }
}

/// Shared handle to an oracle.
pub type SharedLimits = Arc<dyn InsertLimitOracle>;

/// Default oracle handle.
#[must_use]
pub fn unlimited() -> SharedLimits {
    Arc::new(Unlimited)
}

/// Fails with `LimitReached` when the oracle vetoes `resource`.
pub(crate) fn ensure_within_limit(
    oracle: &dyn InsertLimitOracle,
    resource: LimitedResource,
) -> Result<(), RepositoryError> {
    if oracle.limit_reached(resource) {
        warn!(%resource, "Insert vetoed by limit policy");
        return Err(RepositoryError::LimitReached(resource));
    }
    Ok(())
}
