//! Repository abstractions for data access.
//!
//! Repositories provide a clean interface for database operations,
//! hiding the `SeaORM` implementation details from the rest of the application.
//! Every multi-row write runs in a single transaction.

pub mod category;
mod deduction;
pub mod error;
pub mod expense;
pub mod expense_group;
pub mod inventory_log;
pub mod item;
pub mod limits;
mod month;
pub mod monthly_expense;
pub mod reconciliation;
pub mod report;
pub mod revenue;
pub mod revenue_group;
pub mod tax;
pub mod vendor;

pub use category::CategoryRepository;
pub use error::RepositoryError;
pub use expense::{CreateExpenseInput, ExpenseRepository, ExpenseWithGroups, UpdateExpenseInput};
pub use expense_group::ExpenseGroupRepository;
pub use inventory_log::{
    INITIAL_STOCK_OPERATION_ID, InventoryLogRepository, LedgerRow, LogInput, LogUpdate,
    PURCHASE_OPERATION_ID, STOCK_USAGE_OPERATION_ID,
};
pub use item::{CreateItemInput, CreatedItem, ItemRepository, UpdateItemInput, usage_item};
pub use limits::{InsertLimitOracle, LimitedResource, SharedLimits, Unlimited, unlimited};
pub use monthly_expense::{
    CreateMonthlyExpenseInput, MonthlyExpenseRepository, MonthlyExpenseWithGroups,
    UpdateMonthlyExpenseInput,
};
pub use reconciliation::{
    RECONCILIATION_REMARKS, ReconcileInput, ReconcileOutcome, ReconciliationRepository,
};
pub use report::ReportRepository;
pub use revenue::{RevenueInput, RevenueRepository};
pub use revenue_group::{RevenueGroupInput, RevenueGroupRepository, RevenueGroupWithCategories};
pub use tax::{TaxInput, TaxRepository, tax_info};
pub use vendor::{VendorRepository, vendor_info};
