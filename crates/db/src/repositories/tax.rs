//! Tax repository.
//!
//! Taxes may be deleted while ledger rows still point at them. The rows keep
//! the name and rate copied at write time and render from that copy.

use foodcost_core::tax::TaxInfo;
use foodcost_core::validation::{require_non_negative, require_text};
use foodcost_shared::types::TaxId;
use rust_decimal::Decimal;
use sea_orm::sea_query::Expr;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, DatabaseConnection, EntityTrait, QueryFilter, QueryOrder, Set,
    TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{inventory_logs, items, taxes};

/// Input for creating or updating a tax.
#[derive(Debug, Clone)]
pub struct TaxInput {
    /// Display name.
    pub name: String,
    /// Rate in percent.
    pub rate_percentage: Decimal,
}

/// Live tax data in domain form.
#[must_use]
pub fn tax_info(model: &taxes::Model) -> TaxInfo {
    TaxInfo {
        id: TaxId::from_uuid(model.id),
        name: model.name.clone(),
        rate_percentage: model.rate_percentage.get(),
    }
}

/// Tax repository.
#[derive(Clone)]
pub struct TaxRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl TaxRepository {
    /// Creates a new tax repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new tax repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    fn validate(input: TaxInput) -> Result<TaxInput, RepositoryError> {
        Ok(TaxInput {
            name: require_text("name", &input.name)?,
            rate_percentage: require_non_negative("rate_percentage", input.rate_percentage)?,
        })
    }

    /// Creates a tax.
    pub async fn create(&self, input: TaxInput) -> Result<taxes::Model, RepositoryError> {
        ensure_within_limit(self.limits.as_ref(), LimitedResource::Taxes)?;
        let input = Self::validate(input)?;

        let tax = taxes::ActiveModel {
            id: Set(TaxId::new().into_inner()),
            name: Set(input.name),
            rate_percentage: Set(input.rate_percentage.into()),
        }
        .insert(&self.db)
        .await?;

        info!(tax_id = %tax.id, name = %tax.name, "Tax created");
        Ok(tax)
    }

    /// Updates a tax. Existing ledger snapshots are left untouched.
    pub async fn update(&self, id: TaxId, input: TaxInput) -> Result<taxes::Model, RepositoryError> {
        let input = Self::validate(input)?;
        let existing = taxes::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?
            .ok_or_else(|| RepositoryError::not_found("tax", id))?;

        let mut tax: taxes::ActiveModel = existing.into();
        tax.name = Set(input.name);
        tax.rate_percentage = Set(input.rate_percentage.into());
        let tax = tax.update(&self.db).await?;

        info!(tax_id = %tax.id, "Tax updated");
        Ok(tax)
    }

    /// Deletes a tax, clearing item and ledger references to it.
    pub async fn delete(&self, id: TaxId) -> Result<(), RepositoryError> {
        let uuid: Uuid = id.into_inner();
        let txn = self.db.begin().await?;

        items::Entity::update_many()
            .col_expr(items::Column::TaxId, Expr::value(Option::<Uuid>::None))
            .filter(items::Column::TaxId.eq(uuid))
            .exec(&txn)
            .await?;
        inventory_logs::Entity::update_many()
            .col_expr(inventory_logs::Column::RefTaxId, Expr::value(Option::<Uuid>::None))
            .filter(inventory_logs::Column::RefTaxId.eq(uuid))
            .exec(&txn)
            .await?;

        let result = taxes::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("tax", id));
        }

        txn.commit().await?;
        info!(tax_id = %uuid, "Tax deleted");
        Ok(())
    }

    /// Finds a tax by ID.
    pub async fn find_by_id(&self, id: TaxId) -> Result<Option<taxes::Model>, RepositoryError> {
        Ok(taxes::Entity::find_by_id(id.into_inner()).one(&self.db).await?)
    }

    /// Lists taxes by name.
    pub async fn list(&self) -> Result<Vec<taxes::Model>, RepositoryError> {
        let rows = taxes::Entity::find()
            .order_by_asc(taxes::Column::Name)
            .all(&self.db)
            .await?;
        debug!(count = rows.len(), "Listed taxes");
        Ok(rows)
    }
}
