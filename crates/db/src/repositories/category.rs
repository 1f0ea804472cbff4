//! Category repository.

use foodcost_core::validation::{ValidationError, require_text, require_unique_name};
use foodcost_shared::types::CategoryId;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{categories, items, revenue_categories};

/// Rejects `name` when another category already uses it.
async fn ensure_unique_name<C: ConnectionTrait>(
    conn: &C,
    name: &str,
    except: Option<Uuid>,
) -> Result<(), RepositoryError> {
    let mut query = categories::Entity::find().filter(categories::Column::Name.eq(name));
    if let Some(id) = except {
        query = query.filter(categories::Column::Id.ne(id));
    }
    let clashes = query.all(conn).await?;
    require_unique_name(name, clashes.iter().map(|c| c.name.as_str()))?;
    Ok(())
}

/// Category repository.
#[derive(Clone)]
pub struct CategoryRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl CategoryRepository {
    /// Creates a new category repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new category repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates a category with a unique name.
    pub async fn create(&self, name: &str) -> Result<categories::Model, RepositoryError> {
        ensure_within_limit(self.limits.as_ref(), LimitedResource::Categories)?;
        let name = require_text("name", name)?;
        ensure_unique_name(&self.db, &name, None).await?;

        let category = categories::ActiveModel {
            id: Set(CategoryId::new().into_inner()),
            name: Set(name),
        }
        .insert(&self.db)
        .await?;

        info!(category_id = %category.id, name = %category.name, "Category created");
        Ok(category)
    }

    /// Renames a category.
    pub async fn rename(
        &self,
        id: CategoryId,
        name: &str,
    ) -> Result<categories::Model, RepositoryError> {
        let name = require_text("name", name)?;
        let existing = categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("category", id))?;
        ensure_unique_name(&self.db, &name, Some(existing.id)).await?;

        let mut category: categories::ActiveModel = existing.into();
        category.name = Set(name);
        let category = category.update(&self.db).await?;

        info!(category_id = %category.id, "Category renamed");
        Ok(category)
    }

    /// Deletes an empty category and its revenue-group links.
    pub async fn delete(&self, id: CategoryId) -> Result<(), RepositoryError> {
        let uuid = id.into_inner();
        let txn = self.db.begin().await?;

        let members = items::Entity::find()
            .filter(items::Column::CategoryId.eq(uuid))
            .count(&txn)
            .await?;
        if members > 0 {
            warn!(category_id = %uuid, members, "Refusing to delete category with items");
            return Err(ValidationError::CategoryInUse(id).into());
        }

        revenue_categories::Entity::delete_many()
            .filter(revenue_categories::Column::CategoryId.eq(uuid))
            .exec(&txn)
            .await?;
        let result = categories::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("category", id));
        }

        txn.commit().await?;
        info!(category_id = %uuid, "Category deleted");
        Ok(())
    }

    /// Finds a category by ID.
    pub async fn find_by_id(
        &self,
        id: CategoryId,
    ) -> Result<Option<categories::Model>, RepositoryError> {
        Ok(categories::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Lists categories by name.
    pub async fn list(&self) -> Result<Vec<categories::Model>, RepositoryError> {
        let rows = categories::Entity::find()
            .order_by_asc(categories::Column::Name)
            .all(&self.db)
            .await?;
        debug!(count = rows.len(), "Listed categories");
        Ok(rows)
    }
}
