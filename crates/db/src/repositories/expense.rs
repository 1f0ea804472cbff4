//! One-off expense repository.
//!
//! An expense belongs to an expense group and a month and is charged against
//! one or more revenue groups.

use foodcost_core::allocation::{DeductionOwner, validate_revenue_groups};
use foodcost_core::validation::{require_non_negative, require_text, require_unique_name};
use foodcost_shared::types::{ExpenseGroupId, ExpenseId, MonthKey, RevenueGroupId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait, QueryFilter,
    QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::deduction::{
    all_deductions, delete_deductions, ensure_revenue_groups_exist, load_deductions,
    replace_deductions,
};
use super::error::RepositoryError;
use super::expense_group::ensure_expense_group;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use super::month::{in_month, to_columns};
use crate::entities::expenses;

/// Input for creating an expense.
#[derive(Debug, Clone)]
pub struct CreateExpenseInput {
    /// Owning expense group.
    pub expense_group_id: ExpenseGroupId,
    /// Month the expense belongs to.
    pub month: MonthKey,
    /// Name, unique within the group and month.
    pub name: String,
    /// Amount.
    pub amount: Decimal,
    /// Revenue groups charged.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

/// Input for editing an expense.
#[derive(Debug, Clone)]
pub struct UpdateExpenseInput {
    /// Name.
    pub name: String,
    /// Amount.
    pub amount: Decimal,
    /// Revenue groups charged; replaces the previous set.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

/// An expense with the revenue groups it is charged against.
#[derive(Debug, Clone, PartialEq)]
pub struct ExpenseWithGroups {
    /// Stored expense.
    pub expense: expenses::Model,
    /// Charged revenue groups.
    pub revenue_group_ids: Vec<RevenueGroupId>,
}

async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    expense_group_id: Uuid,
    year: i32,
    month: i32,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = expenses::Entity::find()
        .filter(expenses::Column::ExpenseGroupId.eq(expense_group_id))
        .filter(expenses::Column::ExpenseYear.eq(year))
        .filter(expenses::Column::ExpenseMonth.eq(month))
        .filter(expenses::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(expenses::Column::Id.ne(id));
    }
    let clashes = query.all(conn).await?;
    require_unique_name(name, clashes.iter().map(|e| e.name.as_str()))?;
    Ok(())
}

/// Expense repository.
#[derive(Clone)]
pub struct ExpenseRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl ExpenseRepository {
    /// Creates a new expense repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new expense repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates an expense with its deductions.
    ///
    /// An empty revenue-group selection is rejected before anything else.
    pub async fn create(
        &self,
        input: CreateExpenseInput,
    ) -> Result<ExpenseWithGroups, RepositoryError> {
        let revenue_group_ids = validate_revenue_groups(&input.revenue_group_ids)?;
        let name = require_text("name", &input.name)?;
        let amount = require_non_negative("amount", input.amount)?;
        ensure_within_limit(self.limits.as_ref(), LimitedResource::Expenses)?;

        let (year, month) = to_columns(input.month);
        let txn = self.db.begin().await?;
        let group = ensure_expense_group(&txn, input.expense_group_id).await?;
        ensure_revenue_groups_exist(&txn, &revenue_group_ids).await?;
        ensure_unique_name(&txn, group.id, year, month, &name, None).await?;

        let expense = expenses::ActiveModel {
            id: Set(ExpenseId::new().into_inner()),
            expense_group_id: Set(group.id),
            expense_year: Set(year),
            expense_month: Set(month),
            name: Set(name),
            amount: Set(amount.into()),
        }
        .insert(&txn)
        .await?;
        let owner = DeductionOwner::Expense(ExpenseId::from_uuid(expense.id));
        replace_deductions(&txn, owner, &revenue_group_ids).await?;
        txn.commit().await?;

        info!(
            expense_id = %expense.id,
            month = %input.month,
            revenue_groups = revenue_group_ids.len(),
            "Expense created"
        );
        Ok(ExpenseWithGroups {
            expense,
            revenue_group_ids,
        })
    }

    /// Edits an expense and replaces its deductions.
    pub async fn update(
        &self,
        id: ExpenseId,
        input: UpdateExpenseInput,
    ) -> Result<ExpenseWithGroups, RepositoryError> {
        let revenue_group_ids = validate_revenue_groups(&input.revenue_group_ids)?;
        let name = require_text("name", &input.name)?;
        let amount = require_non_negative("amount", input.amount)?;

        let txn = self.db.begin().await?;
        let existing = expenses::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("expense", id))?;
        ensure_revenue_groups_exist(&txn, &revenue_group_ids).await?;
        ensure_unique_name(
            &txn,
            existing.expense_group_id,
            existing.expense_year,
            existing.expense_month,
            &name,
            Some(existing.id),
        )
        .await?;

        let mut expense: expenses::ActiveModel = existing.into();
        expense.name = Set(name);
        expense.amount = Set(amount.into());
        let expense = expense.update(&txn).await?;
        replace_deductions(&txn, DeductionOwner::Expense(id), &revenue_group_ids).await?;
        txn.commit().await?;

        info!(expense_id = %expense.id, "Expense updated");
        Ok(ExpenseWithGroups {
            expense,
            revenue_group_ids,
        })
    }

    /// Deletes an expense and its deductions.
    pub async fn delete(&self, id: ExpenseId) -> Result<(), RepositoryError> {
        let txn = self.db.begin().await?;
        delete_deductions(&txn, DeductionOwner::Expense(id)).await?;
        let result = expenses::Entity::delete_by_id(id.into_inner())
            .exec(&txn)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("expense", id));
        }
        txn.commit().await?;

        info!(expense_id = %id, "Expense deleted");
        Ok(())
    }

    /// Finds an expense with its deductions.
    pub async fn find_by_id(
        &self,
        id: ExpenseId,
    ) -> Result<Option<ExpenseWithGroups>, RepositoryError> {
        let Some(expense) = expenses::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let revenue_group_ids = load_deductions(&self.db, DeductionOwner::Expense(id)).await?;
        Ok(Some(ExpenseWithGroups {
            expense,
            revenue_group_ids,
        }))
    }

    /// Lists the expenses of a month, optionally within one expense group.
    pub async fn list_for_month(
        &self,
        month: MonthKey,
        expense_group_id: Option<ExpenseGroupId>,
    ) -> Result<Vec<ExpenseWithGroups>, RepositoryError> {
        let mut query = expenses::Entity::find().filter(in_month(
            expenses::Column::ExpenseYear,
            expenses::Column::ExpenseMonth,
            month,
        ));
        if let Some(group) = expense_group_id {
            query = query.filter(expenses::Column::ExpenseGroupId.eq(group.into_inner()));
        }
        let rows = query
            .order_by_asc(expenses::Column::Name)
            .all(&self.db)
            .await?;
        let mut deductions = all_deductions(&self.db).await?;
        debug!(%month, count = rows.len(), "Listed expenses");
        Ok(rows
            .into_iter()
            .map(|expense| ExpenseWithGroups {
                revenue_group_ids: deductions
                    .remove(&DeductionOwner::Expense(ExpenseId::from_uuid(expense.id)))
                    .unwrap_or_default(),
                expense,
            })
            .collect())
    }
}
