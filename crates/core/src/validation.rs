//! Boundary validation.
//!
//! Validation runs before any storage write; a failed check means nothing was
//! written.

use foodcost_shared::types::{CategoryId, ExpenseGroupId, ItemId, RevenueGroupId};
use rust_decimal::Decimal;
use thiserror::Error;

/// Field-level validation errors.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ValidationError {
    /// A required field is missing or blank.
    #[error("{field} is required")]
    Required {
        /// Field name.
        field: &'static str,
    },

    /// A quantity or amount that must be strictly positive is not.
    #[error("{field} must be greater than zero, got {value}")]
    NotPositive {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// A value that cannot be negative is negative.
    #[error("{field} cannot be negative, got {value}")]
    Negative {
        /// Field name.
        field: &'static str,
        /// Offending value.
        value: Decimal,
    },

    /// An expense must be charged against at least one revenue group.
    #[error("At least one revenue group is required")]
    EmptyRevenueGroups,

    /// A unique field collides with an existing row.
    #[error("{field} '{value}' already exists")]
    Duplicate {
        /// Field name.
        field: &'static str,
        /// The conflicting existing value.
        value: String,
    },

    /// The item still has stock ledger entries and cannot be deleted.
    #[error("Item {0} is referenced by stock ledger entries")]
    ItemInUse(ItemId),

    /// The category still owns items.
    #[error("Category {0} still has items")]
    CategoryInUse(CategoryId),

    /// Expenses are still charged against the revenue group.
    #[error("Revenue group {0} is referenced by expenses")]
    RevenueGroupInUse(RevenueGroupId),

    /// The expense group still owns expenses.
    #[error("Expense group {0} still has expenses")]
    ExpenseGroupInUse(ExpenseGroupId),
}

impl ValidationError {
    /// Returns the error code for callers.
    #[must_use]
    pub const fn error_code(&self) -> &'static str {
        match self {
            Self::Required { .. } => "REQUIRED_FIELD",
            Self::NotPositive { .. } => "NOT_POSITIVE",
            Self::Negative { .. } => "NEGATIVE_VALUE",
            Self::EmptyRevenueGroups => "EMPTY_REVENUE_GROUPS",
            Self::Duplicate { .. } => "DUPLICATE_NAME",
            Self::ItemInUse(_) => "ITEM_IN_USE",
            Self::CategoryInUse(_) => "CATEGORY_IN_USE",
            Self::RevenueGroupInUse(_) => "REVENUE_GROUP_IN_USE",
            Self::ExpenseGroupInUse(_) => "EXPENSE_GROUP_IN_USE",
        }
    }

    /// The form field the error belongs to, if any.
    #[must_use]
    pub const fn field(&self) -> Option<&'static str> {
        match self {
            Self::Required { field }
            | Self::NotPositive { field, .. }
            | Self::Negative { field, .. }
            | Self::Duplicate { field, .. } => Some(*field),
            Self::EmptyRevenueGroups => Some("revenue_group_ids"),
            Self::ItemInUse(_)
            | Self::CategoryInUse(_)
            | Self::RevenueGroupInUse(_)
            | Self::ExpenseGroupInUse(_) => None,
        }
    }
}

/// Trims a required text field, rejecting blank values.
///
/// # Errors
///
/// Returns `ValidationError::Required` when the trimmed value is empty.
pub fn require_text(field: &'static str, value: &str) -> Result<String, ValidationError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
        return Err(ValidationError::Required { field });
    }
    Ok(trimmed.to_string())
}

/// Rejects zero and negative values.
///
/// # Errors
///
/// Returns `ValidationError::NotPositive` when `value <= 0`.
pub fn require_positive(field: &'static str, value: Decimal) -> Result<Decimal, ValidationError> {
    if value <= Decimal::ZERO {
        return Err(ValidationError::NotPositive { field, value });
    }
    Ok(value)
}

/// Rejects negative values.
///
/// # Errors
///
/// Returns `ValidationError::Negative` when `value < 0`.
pub fn require_non_negative(
    field: &'static str,
    value: Decimal,
) -> Result<Decimal, ValidationError> {
    if value < Decimal::ZERO {
        return Err(ValidationError::Negative { field, value });
    }
    Ok(value)
}

/// Case-sensitive exact-match uniqueness check against existing names.
///
/// # Errors
///
/// Returns `ValidationError::Duplicate` naming the conflicting existing value.
pub fn require_unique_name<'a, I>(candidate: &str, existing: I) -> Result<(), ValidationError>
where
    I: IntoIterator<Item = &'a str>,
{
    match existing.into_iter().find(|name| *name == candidate) {
        Some(conflict) => Err(ValidationError::Duplicate {
            field: "name",
            value: conflict.to_string(),
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_require_text_trims() {
        assert_eq!(require_text("name", "  Rice ").unwrap(), "Rice");
        assert_eq!(
            require_text("name", "   "),
            Err(ValidationError::Required { field: "name" })
        );
    }

    #[test]
    fn test_require_positive() {
        assert_eq!(require_positive("qty", dec!(2)).unwrap(), dec!(2));
        assert!(matches!(
            require_positive("qty", Decimal::ZERO),
            Err(ValidationError::NotPositive { field: "qty", .. })
        ));
    }

    #[test]
    fn test_require_non_negative() {
        assert_eq!(require_non_negative("amount", Decimal::ZERO).unwrap(), Decimal::ZERO);
        assert!(require_non_negative("amount", dec!(-0.01)).is_err());
    }

    #[test]
    fn test_unique_name_is_case_sensitive() {
        let existing = ["Gas", "Rent"];
        assert!(require_unique_name("gas", existing).is_ok());
        assert_eq!(
            require_unique_name("Gas", existing),
            Err(ValidationError::Duplicate {
                field: "name",
                value: "Gas".to_string(),
            })
        );
    }

    #[test]
    fn test_error_fields_and_codes() {
        assert_eq!(
            ValidationError::EmptyRevenueGroups.field(),
            Some("revenue_group_ids")
        );
        assert_eq!(
            ValidationError::EmptyRevenueGroups.error_code(),
            "EMPTY_REVENUE_GROUPS"
        );
        assert_eq!(ValidationError::ItemInUse(ItemId::new()).field(), None);
        assert_eq!(
            ValidationError::Duplicate {
                field: "name",
                value: "Gas".into()
            }
            .to_string(),
            "name 'Gas' already exists"
        );
    }
}
