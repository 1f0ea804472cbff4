//! Vendor repository.

use foodcost_core::tax::VendorInfo;
use foodcost_core::validation::require_text;
use foodcost_shared::types::VendorId;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{inventory_logs, items, vendors};

/// Live vendor data in domain form.
#[must_use]
pub fn vendor_info(model: &vendors::Model) -> VendorInfo {
    VendorInfo {
        id: VendorId::from_uuid(model.id),
        display_name: model.vendor_display_name.clone(),
    }
}

/// Vendor repository.
#[derive(Clone)]
pub struct VendorRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl VendorRepository {
    /// Creates a new vendor repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new vendor repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates a vendor.
    pub async fn create(&self, display_name: &str) -> Result<vendors::Model, RepositoryError> {
        ensure_within_limit(self.limits.as_ref(), LimitedResource::Vendors)?;
        let display_name = require_text("vendor_display_name", display_name)?;

        let vendor = vendors::ActiveModel {
            id: Set(VendorId::new().into_inner()),
            vendor_display_name: Set(display_name),
        }
        .insert(&self.db)
        .await?;

        info!(vendor_id = %vendor.id, "Vendor created");
        Ok(vendor)
    }

    /// Renames a vendor.
    pub async fn rename(
        &self,
        id: VendorId,
        display_name: &str,
    ) -> Result<vendors::Model, RepositoryError> {
        let display_name = require_text("vendor_display_name", display_name)?;
        let existing = vendors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("vendor", id))?;

        let mut vendor: vendors::ActiveModel = existing.into();
        vendor.vendor_display_name = Set(display_name);
        let vendor = vendor.update(&self.db).await?;

        info!(vendor_id = %vendor.id, "Vendor renamed");
        Ok(vendor)
    }

    /// Deletes a vendor, clearing item and ledger references to it.
    pub async fn delete(&self, id: VendorId) -> Result<(), RepositoryError> {
        let uuid: Uuid = id.into_inner();
        let txn = self.db.begin().await?;

        items::Entity::update_many()
            .col_expr(
                items::Column::PreferredVendorId,
                Expr::value(Option::<Uuid>::None),
            )
            .filter(items::Column::PreferredVendorId.eq(uuid))
            .exec(&txn)
            .await?;
        inventory_logs::Entity::update_many()
            .col_expr(
                inventory_logs::Column::RefVendorId,
                Expr::value(Option::<Uuid>::None),
            )
            .filter(inventory_logs::Column::RefVendorId.eq(uuid))
            .exec(&txn)
            .await?;

        let result = vendors::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("vendor", id));
        }

        txn.commit().await?;
        info!(vendor_id = %uuid, "Vendor deleted");
        Ok(())
    }

    /// Finds a vendor by ID.
    pub async fn find_by_id(&self, id: VendorId) -> Result<Option<vendors::Model>, RepositoryError> {
        Ok(vendors::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Lists vendors by name.
    pub async fn list(&self) -> Result<Vec<vendors::Model>, RepositoryError> {
        let rows = vendors::Entity::find()
            .order_by_asc(vendors::Column::VendorDisplayName)
            .all(&self.db)
            .await?;
        debug!(count = rows.len(), "Listed vendors");
        Ok(rows)
    }
}
