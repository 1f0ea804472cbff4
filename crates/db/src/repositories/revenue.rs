//! Monthly revenue repository.
//!
//! There is at most one revenue row per group and month. Recording a second
//! amount for the same month updates the existing row.

use foodcost_core::validation::require_non_negative;
use foodcost_shared::types::{MonthKey, RevenueGroupId, RevenueId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use super::month::{in_month, to_columns};
use crate::entities::{revenue_groups, revenues};

/// Input for recording revenue.
#[derive(Debug, Clone)]
pub struct RevenueInput {
    /// Revenue group.
    pub revenue_group_id: RevenueGroupId,
    /// Month.
    pub month: MonthKey,
    /// Amount.
    pub amount: Decimal,
}

/// Revenue repository.
#[derive(Clone)]
pub struct RevenueRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl RevenueRepository {
    /// Creates a new revenue repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new revenue repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Records the revenue of a group for a month, inserting or updating.
    pub async fn record(&self, input: RevenueInput) -> Result<revenues::Model, RepositoryError> {
        let amount = require_non_negative("amount", input.amount)?;
        let group_uuid = input.revenue_group_id.into_inner();

        let txn = self.db.begin().await?;
        if revenue_groups::Entity::find_by_id(group_uuid)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(
                "revenue_group",
                input.revenue_group_id,
            ));
        }

        let existing = revenues::Entity::find()
            .filter(revenues::Column::RevenueGroupId.eq(group_uuid))
            .filter(in_month(
                revenues::Column::RevenueYear,
                revenues::Column::RevenueMonth,
                input.month,
            ))
            .one(&txn)
            .await?;

        let revenue = if let Some(existing) = existing {
            let mut revenue: revenues::ActiveModel = existing.into();
            revenue.amount = Set(amount.into());
            let revenue = revenue.update(&txn).await?;
            info!(revenue_id = %revenue.id, month = %input.month, "Revenue updated");
            revenue
        } else {
            ensure_within_limit(self.limits.as_ref(), LimitedResource::Revenues)?;
            let (year, month) = to_columns(input.month);
            let revenue = revenues::ActiveModel {
                id: Set(RevenueId::new().into_inner()),
                revenue_group_id: Set(group_uuid),
                revenue_year: Set(year),
                revenue_month: Set(month),
                amount: Set(amount.into()),
            }
            .insert(&txn)
            .await?;
            info!(revenue_id = %revenue.id, month = %input.month, "Revenue created");
            revenue
        };

        txn.commit().await?;
        Ok(revenue)
    }

    /// Revenue of a group for a month.
    pub async fn find(
        &self,
        revenue_group_id: RevenueGroupId,
        month: MonthKey,
    ) -> Result<Option<revenues::Model>, RepositoryError> {
        Ok(revenues::Entity::find()
            .filter(revenues::Column::RevenueGroupId.eq(revenue_group_id.into_inner()))
            .filter(in_month(
                revenues::Column::RevenueYear,
                revenues::Column::RevenueMonth,
                month,
            ))
            .one(&self.db)
            .await?)
    }

    /// All revenue rows of a month.
    pub async fn list_for_month(
        &self,
        month: MonthKey,
    ) -> Result<Vec<revenues::Model>, RepositoryError> {
        let rows = revenues::Entity::find()
            .filter(in_month(
                revenues::Column::RevenueYear,
                revenues::Column::RevenueMonth,
                month,
            ))
            .order_by_asc(revenues::Column::RevenueGroupId)
            .all(&self.db)
            .await?;
        debug!(%month, count = rows.len(), "Listed revenues");
        Ok(rows)
    }

    /// Deletes a revenue row.
    pub async fn delete(&self, id: RevenueId) -> Result<(), RepositoryError> {
        let result = revenues::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("revenue", id));
        }
        info!(revenue_id = %id, "Revenue deleted");
        Ok(())
    }
}
