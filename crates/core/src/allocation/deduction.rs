//! Links between expenses and the revenue groups they are charged against.

use foodcost_shared::types::{ExpenseId, MonthlyExpenseId, RevenueGroupId};
use serde::{Deserialize, Serialize};

use crate::validation::ValidationError;

/// The row that owns a set of revenue deductions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "owner", content = "id", rename_all = "snake_case")]
pub enum DeductionOwner {
    /// A one-off expense.
    Expense(ExpenseId),
    /// A recurring monthly expense.
    MonthlyExpense(MonthlyExpenseId),
}

/// Checks a revenue-group selection and collapses duplicates, keeping the
/// first occurrence order.
///
/// # Errors
///
/// Returns `ValidationError::EmptyRevenueGroups` when `ids` is empty.
pub fn validate_revenue_groups(
    ids: &[RevenueGroupId],
) -> Result<Vec<RevenueGroupId>, ValidationError> {
    if ids.is_empty() {
        return Err(ValidationError::EmptyRevenueGroups);
    }

    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    Ok(unique)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_selection_is_rejected() {
        assert_eq!(
            validate_revenue_groups(&[]),
            Err(ValidationError::EmptyRevenueGroups)
        );
    }

    #[test]
    fn test_duplicates_are_collapsed() {
        let a = RevenueGroupId::new();
        let b = RevenueGroupId::new();
        assert_eq!(validate_revenue_groups(&[a, b, a, b]).unwrap(), vec![a, b]);
    }

    #[test]
    fn test_owner_serialization() {
        let id = ExpenseId::new();
        let json = serde_json::to_value(DeductionOwner::Expense(id)).unwrap();
        assert_eq!(json["owner"], "expense");
        assert_eq!(json["id"], id.to_string());
    }
}
