//! Revenue deduction validation and expense allocation.

pub mod deduction;
pub mod split;

#[cfg(test)]
mod props;

pub use deduction::{DeductionOwner, validate_revenue_groups};
pub use split::{AllocationUtil, ExpenseShare, allocate_expense};
