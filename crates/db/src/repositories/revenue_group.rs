//! Revenue group repository.
//!
//! A revenue group owns the set of categories whose stock usage is measured
//! against its revenue. The link set is replaced wholesale on update.

use std::collections::HashMap;

use foodcost_core::validation::{ValidationError, require_text, require_unique_name};
use foodcost_shared::types::{CategoryId, RevenueGroupId};
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{categories, revenue_categories, revenue_deductions, revenue_groups, revenues};

/// Input for creating or updating a revenue group.
#[derive(Debug, Clone)]
pub struct RevenueGroupInput {
    /// Unique name.
    pub name: String,
    /// Linked categories.
    pub category_ids: Vec<CategoryId>,
}

/// A revenue group with its linked categories.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RevenueGroupWithCategories {
    /// Stored group.
    pub group: revenue_groups::Model,
    /// Linked categories.
    pub category_ids: Vec<CategoryId>,
}

fn dedupe(ids: &[CategoryId]) -> Vec<CategoryId> {
    let mut unique = Vec::with_capacity(ids.len());
    for id in ids {
        if !unique.contains(id) {
            unique.push(*id);
        }
    }
    unique
}

async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = revenue_groups::Entity::find().filter(revenue_groups::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(revenue_groups::Column::Id.ne(id));
    }
    let clashes = query.all(conn).await?;
    require_unique_name(name, clashes.iter().map(|g| g.name.as_str()))?;
    Ok(())
}

async fn replace_categories<C: ConnectionTrait>(
    conn: &C,
    group_id: Uuid,
    category_ids: &[CategoryId],
) -> Result<(), RepositoryError> {
    for id in category_ids {
        if categories::Entity::find_by_id(id.into_inner())
            .one(conn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found("category", id));
        }
    }

    revenue_categories::Entity::delete_many()
        .filter(revenue_categories::Column::RevenueGroupId.eq(group_id))
        .exec(conn)
        .await?;
    if category_ids.is_empty() {
        return Ok(());
    }
    revenue_categories::Entity::insert_many(category_ids.iter().map(|id| {
        revenue_categories::ActiveModel {
            revenue_group_id: Set(group_id),
            category_id: Set(id.into_inner()),
        }
    }))
    .exec(conn)
    .await?;
    Ok(())
}

/// Category links of every revenue group.
pub(crate) async fn category_links<C: ConnectionTrait>(
    conn: &C,
) -> Result<HashMap<Uuid, Vec<CategoryId>>, RepositoryError> {
    let mut links: HashMap<Uuid, Vec<CategoryId>> = HashMap::new();
    for link in revenue_categories::Entity::find().all(conn).await? {
        links
            .entry(link.revenue_group_id)
            .or_default()
            .push(CategoryId::from_uuid(link.category_id));
    }
    for ids in links.values_mut() {
        ids.sort();
    }
    Ok(links)
}

/// Revenue group repository.
#[derive(Clone)]
pub struct RevenueGroupRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl RevenueGroupRepository {
    /// Creates a new revenue group repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new revenue group repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates a revenue group with its category links.
    pub async fn create(
        &self,
        input: RevenueGroupInput,
    ) -> Result<RevenueGroupWithCategories, RepositoryError> {
        let name = require_text("name", &input.name)?;
        let category_ids = dedupe(&input.category_ids);
        ensure_within_limit(self.limits.as_ref(), LimitedResource::RevenueGroups)?;

        let txn = self.db.begin().await?;
        ensure_unique_name(&txn, &name, None).await?;
        let group = revenue_groups::ActiveModel {
            id: Set(RevenueGroupId::new().into_inner()),
            name: Set(name),
        }
        .insert(&txn)
        .await?;
        replace_categories(&txn, group.id, &category_ids).await?;
        txn.commit().await?;

        info!(
            revenue_group_id = %group.id,
            categories = category_ids.len(),
            "Revenue group created"
        );
        Ok(RevenueGroupWithCategories {
            group,
            category_ids,
        })
    }

    /// Renames a revenue group and replaces its category links.
    pub async fn update(
        &self,
        id: RevenueGroupId,
        input: RevenueGroupInput,
    ) -> Result<RevenueGroupWithCategories, RepositoryError> {
        let name = require_text("name", &input.name)?;
        let category_ids = dedupe(&input.category_ids);

        let txn = self.db.begin().await?;
        let existing = revenue_groups::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("revenue_group", id))?;
        ensure_unique_name(&txn, &name, Some(existing.id)).await?;

        let mut group: revenue_groups::ActiveModel = existing.into();
        group.name = Set(name);
        let group = group.update(&txn).await?;
        replace_categories(&txn, group.id, &category_ids).await?;
        txn.commit().await?;

        info!(revenue_group_id = %group.id, "Revenue group updated");
        Ok(RevenueGroupWithCategories {
            group,
            category_ids,
        })
    }

    /// Deletes a revenue group that no expense is charged against, with its
    /// links and revenues.
    pub async fn delete(&self, id: RevenueGroupId) -> Result<(), RepositoryError> {
        let uuid = id.into_inner();
        let txn = self.db.begin().await?;

        let charged = revenue_deductions::Entity::find()
            .filter(revenue_deductions::Column::RevenueGroupId.eq(uuid))
            .count(&txn)
            .await?;
        if charged > 0 {
            warn!(revenue_group_id = %uuid, charged, "Refusing to delete charged revenue group");
            return Err(ValidationError::RevenueGroupInUse(id).into());
        }

        revenue_categories::Entity::delete_many()
            .filter(revenue_categories::Column::RevenueGroupId.eq(uuid))
            .exec(&txn)
            .await?;
        revenues::Entity::delete_many()
            .filter(revenues::Column::RevenueGroupId.eq(uuid))
            .exec(&txn)
            .await?;
        let result = revenue_groups::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("revenue_group", id));
        }
        txn.commit().await?;

        info!(revenue_group_id = %uuid, "Revenue group deleted");
        Ok(())
    }

    /// Finds a revenue group with its links.
    pub async fn find_by_id(
        &self,
        id: RevenueGroupId,
    ) -> Result<Option<RevenueGroupWithCategories>, RepositoryError> {
        let Some(group) = revenue_groups::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
        else {
            return Ok(None);
        };
        let mut category_ids: Vec<CategoryId> = revenue_categories::Entity::find()
            .filter(revenue_categories::Column::RevenueGroupId.eq(group.id))
            .all(&self.db)
            .await?
            .into_iter()
            .map(|link| CategoryId::from_uuid(link.category_id))
            .collect();
        category_ids.sort();
        Ok(Some(RevenueGroupWithCategories {
            group,
            category_ids,
        }))
    }

    /// Lists revenue groups by name with their links.
    pub async fn list(&self) -> Result<Vec<RevenueGroupWithCategories>, RepositoryError> {
        let groups = revenue_groups::Entity::find()
            .order_by_asc(revenue_groups::Column::Name)
            .all(&self.db)
            .await?;
        let mut links = category_links(&self.db).await?;
        debug!(count = groups.len(), "Listed revenue groups");
        Ok(groups
            .into_iter()
            .map(|group| RevenueGroupWithCategories {
                category_ids: links.remove(&group.id).unwrap_or_default(),
                group,
            })
            .collect())
    }
}
