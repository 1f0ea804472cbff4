//! `SeaORM` entity definitions.

pub mod prelude;

pub mod categories;
pub mod decimal;
pub mod expense_groups;
pub mod expenses;
pub mod inventory_logs;
pub mod inventory_operations;
pub mod items;
pub mod monthly_expense_entries;
pub mod monthly_expenses;
pub mod revenue_categories;
pub mod revenue_deductions;
pub mod revenue_groups;
pub mod revenues;
pub mod taxes;
pub mod vendors;

pub use decimal::StoredDecimal;
