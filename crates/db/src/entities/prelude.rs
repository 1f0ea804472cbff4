//! Entity re-exports.

pub use super::categories::Entity as Categories;
pub use super::expense_groups::Entity as ExpenseGroups;
pub use super::expenses::Entity as Expenses;
pub use super::inventory_logs::Entity as InventoryLogs;
pub use super::inventory_operations::Entity as InventoryOperations;
pub use super::items::Entity as Items;
pub use super::monthly_expense_entries::Entity as MonthlyExpenseEntries;
pub use super::monthly_expenses::Entity as MonthlyExpenses;
pub use super::revenue_categories::Entity as RevenueCategories;
pub use super::revenue_deductions::Entity as RevenueDeductions;
pub use super::revenue_groups::Entity as RevenueGroups;
pub use super::revenues::Entity as Revenues;
pub use super::taxes::Entity as Taxes;
pub use super::vendors::Entity as Vendors;
