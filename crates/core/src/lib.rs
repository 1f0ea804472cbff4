//! Core business logic for the food-cost engine.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Every function takes plain data and returns plain data or a typed error; numeric
//! edge cases (zero quantity, zero revenue) resolve to zero instead of failing.
//!
//! # Modules
//!
//! - `cost` - Bidirectional unit/total cost derivation
//! - `tax` - Gross/net/tax decomposition and tax/vendor snapshot resolution
//! - `stock` - Per-item stock ledger and month rollups
//! - `reconcile` - Ending-inventory reconciliation
//! - `aggregation` - Monthly item, category, and revenue-group cost reports
//! - `allocation` - Revenue deduction validation and expense allocation
//! - `validation` - Boundary validation errors

pub mod aggregation;
pub mod allocation;
pub mod cost;
pub mod math;
pub mod reconcile;
pub mod stock;
pub mod tax;
pub mod validation;

pub use aggregation::aggregate_cost_report;
pub use allocation::{allocate_expense, validate_revenue_groups};
pub use cost::resolve_cost;
pub use reconcile::reconcile_ending_inventory;
pub use stock::ledger_rollup;
pub use tax::split_tax;
pub use validation::ValidationError;
