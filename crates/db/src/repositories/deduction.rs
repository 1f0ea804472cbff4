//! Revenue deduction links.
//!
//! A deduction row charges one expense (one-off or monthly) against one
//! revenue group. The set for an owner is always replaced as a whole.

use std::collections::HashMap;

use foodcost_core::allocation::DeductionOwner;
use foodcost_shared::types::RevenueGroupId;
use sea_orm::{ColumnTrait, ConnectionTrait, EntityTrait, QueryFilter, Set};
use uuid::Uuid;

use super::error::RepositoryError;
use crate::entities::{revenue_deductions, revenue_groups};

fn owner_filter(owner: DeductionOwner) -> sea_orm::Condition {
    match owner {
        DeductionOwner::Expense(id) => sea_orm::Condition::all()
            .add(revenue_deductions::Column::ExpenseId.eq(id.into_inner())),
        DeductionOwner::MonthlyExpense(id) => sea_orm::Condition::all()
            .add(revenue_deductions::Column::MonthlyExpenseId.eq(id.into_inner())),
    }
}

/// Fails with `NotFound` for the first revenue group that does not exist.
pub(crate) async fn ensure_revenue_groups_exist<C: ConnectionTrait>(
    conn: &C,
    ids: &[RevenueGroupId],
) -> Result<(), RepositoryError> {
    for id in ids {
        if revenue_groups::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found("revenue_group", id));
        }
    }
    Ok(())
}

/// Replaces the deduction set of `owner` with `ids`.
pub(crate) async fn replace_deductions<C: ConnectionTrait>(
    conn: &C,
    owner: DeductionOwner,
    ids: &[RevenueGroupId],
) -> Result<(), RepositoryError> {
    delete_deductions(conn, owner).await?;
    if ids.is_empty() {
        return Ok(());
    }
    let (expense_id, monthly_expense_id) = match owner {
        DeductionOwner::Expense(id) => (Some(id.into_inner()), None),
        DeductionOwner::MonthlyExpense(id) => (None, Some(id.into_inner())),
    };
    revenue_deductions::Entity::insert_many(ids.iter().map(|id| {
        revenue_deductions::ActiveModel {
            id: Set(Uuid::now_v7()),
            revenue_group_id: Set(id.into_inner()),
            expense_id: Set(expense_id),
            monthly_expense_id: Set(monthly_expense_id),
        }
    }))
    .exec(conn)
    .await?;
    Ok(())
}

/// Removes every deduction row of `owner`.
pub(crate) async fn delete_deductions<C: ConnectionTrait>(
    conn: &C,
    owner: DeductionOwner,
) -> Result<(), RepositoryError> {
    revenue_deductions::Entity::delete_many()
        .filter(owner_filter(owner))
        .exec(conn)
        .await?;
    Ok(())
}

/// Revenue groups charged by `owner`, sorted.
pub(crate) async fn load_deductions<C: ConnectionTrait>(
    conn: &C,
    owner: DeductionOwner,
) -> Result<Vec<RevenueGroupId>, RepositoryError> {
    let mut ids: Vec<RevenueGroupId> = revenue_deductions::Entity::find()
        .filter(owner_filter(owner))
        .all(conn)
        .await?
        .into_iter()
        .map(|row| RevenueGroupId::from_uuid(row.revenue_group_id))
        .collect();
    ids.sort();
    Ok(ids)
}

/// Every deduction row grouped by owner.
pub(crate) async fn all_deductions<C: ConnectionTrait>(
    conn: &C,
) -> Result<HashMap<DeductionOwner, Vec<RevenueGroupId>>, RepositoryError> {
    let mut grouped: HashMap<DeductionOwner, Vec<RevenueGroupId>> = HashMap::new();
    for row in revenue_deductions::Entity::find().all(conn).await? {
        let owner = match (row.expense_id, row.monthly_expense_id) {
            (Some(id), None) => DeductionOwner::Expense(id.into()),
            (None, Some(id)) => DeductionOwner::MonthlyExpense(id.into()),
            _ => {
                return Err(RepositoryError::CorruptRow {
                    entity: "revenue_deduction",
                    reason: format!("deduction {} must have exactly one owner", row.id),
                });
            }
        };
        grouped
            .entry(owner)
            .or_default()
            .push(RevenueGroupId::from_uuid(row.revenue_group_id));
    }
    for ids in grouped.values_mut() {
        ids.sort();
    }
    Ok(grouped)
}
