//! Expense group repository.

use foodcost_core::validation::{ValidationError, require_text, require_unique_name};
use foodcost_shared::types::ExpenseGroupId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{info, warn};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{expense_groups, expenses, monthly_expenses};

async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = expense_groups::Entity::find().filter(expense_groups::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(expense_groups::Column::Id.ne(id));
    }
    let clashes = query.all(conn).await?;
    require_unique_name(name, clashes.iter().map(|g| g.name.as_str()))?;
    Ok(())
}

/// Ensures an expense group exists.
pub(crate) async fn ensure_expense_group<C: ConnectionTrait>(
    conn: &C,
    id: ExpenseGroupId,
) -> Result<expense_groups::Model, RepositoryError> {
    expense_groups::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("expense_group", id))
}

/// Expense group repository.
#[derive(Clone)]
pub struct ExpenseGroupRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl ExpenseGroupRepository {
    /// Creates a new expense group repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new expense group repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates an expense group.
    pub async fn create(&self, name: &str) -> Result<expense_groups::Model, RepositoryError> {
        let name = require_text("name", name)?;
        ensure_within_limit(self.limits.as_ref(), LimitedResource::ExpenseGroups)?;

        let txn = self.db.begin().await?;
        ensure_unique_name(&txn, &name, None).await?;
        let group = expense_groups::ActiveModel {
            id: Set(ExpenseGroupId::new().into_inner()),
            name: Set(name),
        }
        .insert(&txn)
        .await?;
        txn.commit().await?;

        info!(expense_group_id = %group.id, name = %group.name, "Expense group created");
        Ok(group)
    }

    /// Renames an expense group.
    pub async fn rename(
        &self,
        id: ExpenseGroupId,
        name: &str,
    ) -> Result<expense_groups::Model, RepositoryError> {
        let name = require_text("name", name)?;

        let txn = self.db.begin().await?;
        let existing = ensure_expense_group(&txn, id).await?;
        ensure_unique_name(&txn, &name, Some(existing.id)).await?;
        let mut group: expense_groups::ActiveModel = existing.into();
        group.name = Set(name);
        let group = group.update(&txn).await?;
        txn.commit().await?;

        info!(expense_group_id = %group.id, "Expense group renamed");
        Ok(group)
    }

    /// Deletes an expense group that owns no expenses.
    pub async fn delete(&self, id: ExpenseGroupId) -> Result<(), RepositoryError> {
        let uuid = id.into_inner();
        let txn = self.db.begin().await?;

        let one_off = expenses::Entity::find()
            .filter(expenses::Column::ExpenseGroupId.eq(uuid))
            .count(&txn)
            .await?;
        let recurring = monthly_expenses::Entity::find()
            .filter(monthly_expenses::Column::ExpenseGroupId.eq(uuid))
            .count(&txn)
            .await?;
        if one_off + recurring > 0 {
            warn!(expense_group_id = %uuid, one_off, recurring, "Refusing to delete expense group in use");
            return Err(ValidationError::ExpenseGroupInUse(id).into());
        }

        let result = expense_groups::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("expense_group", id));
        }
        txn.commit().await?;

        info!(expense_group_id = %uuid, "Expense group deleted");
        Ok(())
    }

    /// Finds an expense group by ID.
    pub async fn find_by_id(
        &self,
        id: ExpenseGroupId,
    ) -> Result<Option<expense_groups::Model>, RepositoryError> {
        Ok(expense_groups::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Lists expense groups by name.
    pub async fn list(&self) -> Result<Vec<expense_groups::Model>, RepositoryError> {
        Ok(expense_groups::Entity::find()
            .order_by_asc(expense_groups::Column::Name)
            .all(&self.db)
            .await?)
    }
}
