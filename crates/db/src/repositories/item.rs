//! Item repository.

use chrono::{NaiveDate, Utc};
use foodcost_core::cost::{CostService, CostSource, ResolvedCost};
use foodcost_core::reconcile::UsageItem;
use foodcost_core::tax::{LineTaxSplit, split_line};
use foodcost_core::validation::{
    ValidationError, require_non_negative, require_positive, require_text,
};
use foodcost_shared::types::{CategoryId, ItemId, TaxId, VendorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, EntityTrait,
    PaginatorTrait, QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info, warn};

use super::error::RepositoryError;
use super::inventory_log::{INITIAL_STOCK_OPERATION_ID, NewLog, insert_log, load_tax, load_vendor};
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{StoredDecimal, categories, inventory_logs, items, taxes};

/// Input for creating an item.
#[derive(Debug, Clone)]
pub struct CreateItemInput {
    /// Item name.
    pub name: String,
    /// Primary unit abbreviation.
    pub uom_abbrev: String,
    /// Secondary unit abbreviation.
    pub uom_abbrev_per_piece: Option<String>,
    /// Secondary units per primary unit.
    pub qty_per_piece: Option<Decimal>,
    /// Owning category.
    pub category_id: CategoryId,
    /// Default tax.
    pub tax_id: Option<TaxId>,
    /// Preferred vendor.
    pub preferred_vendor_id: Option<VendorId>,
    /// Low-stock threshold; zero disables the flag.
    pub low_stock_level: Decimal,
    /// Opening quantity; zero writes no ledger row.
    pub initial_stock_qty: Decimal,
    /// Gross unit cost as entered.
    pub unit_cost: Decimal,
    /// Gross total cost of the opening quantity as entered.
    pub total_cost: Decimal,
    /// Which cost field was entered.
    pub cost_source: CostSource,
    /// Date of the opening row.
    pub created_on: NaiveDate,
}

/// Input for editing an item.
#[derive(Debug, Clone)]
pub struct UpdateItemInput {
    /// Item name.
    pub name: String,
    /// Primary unit abbreviation.
    pub uom_abbrev: String,
    /// Secondary unit abbreviation.
    pub uom_abbrev_per_piece: Option<String>,
    /// Secondary units per primary unit.
    pub qty_per_piece: Option<Decimal>,
    /// Owning category.
    pub category_id: CategoryId,
    /// Default tax.
    pub tax_id: Option<TaxId>,
    /// Preferred vendor.
    pub preferred_vendor_id: Option<VendorId>,
    /// Low-stock threshold.
    pub low_stock_level: Decimal,
    /// Gross unit cost.
    pub unit_cost: Decimal,
}

/// Result of creating an item.
#[derive(Debug, Clone)]
pub struct CreatedItem {
    /// The stored item.
    pub item: items::Model,
    /// The "Initial Stock" row, when an opening quantity was given.
    pub initial_log: Option<inventory_logs::Model>,
    /// Resolved opening cost.
    pub cost: ResolvedCost,
    /// Gross/net/tax split of the opening cost.
    pub split: LineTaxSplit,
}

/// Pricing data a reconciliation usage row is written with.
#[must_use]
pub fn usage_item(item: &items::Model, tax: Option<&taxes::Model>) -> UsageItem {
    UsageItem {
        item_id: ItemId::from_uuid(item.id),
        unit_cost: item.unit_cost.get(),
        tax_rate_percentage: tax.map_or(Decimal::ZERO, |t| t.rate_percentage.get()),
    }
}

fn validate_qty_per_piece(value: Option<Decimal>) -> Result<Option<Decimal>, ValidationError> {
    value
        .map(|qty| require_positive("qty_per_piece", qty))
        .transpose()
}

fn optional_text(value: Option<String>) -> Option<String> {
    value
        .map(|v| v.trim().to_string())
        .filter(|v| !v.is_empty())
}

async fn ensure_category<C: ConnectionTrait>(
    conn: &C,
    id: CategoryId,
) -> Result<(), RepositoryError> {
    categories::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(|_| ())
        .ok_or_else(|| RepositoryError::not_found("category", id))
}

/// Item repository.
#[derive(Clone)]
pub struct ItemRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl ItemRepository {
    /// Creates a new item repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new item repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Creates an item and, for a positive opening quantity, its
    /// "Initial Stock" ledger row in the same transaction.
    pub async fn create(&self, input: CreateItemInput) -> Result<CreatedItem, RepositoryError> {
        let name = require_text("name", &input.name)?;
        let uom_abbrev = require_text("uom_abbrev", &input.uom_abbrev)?;
        let initial_qty = require_non_negative("initial_stock_qty", input.initial_stock_qty)?;
        let low_stock_level = require_non_negative("low_stock_level", input.low_stock_level)?;
        let qty_per_piece = validate_qty_per_piece(input.qty_per_piece)?;
        // Without an opening quantity an entered total implies no unit price.
        let cost_source = if initial_qty.is_zero() {
            CostSource::Unit
        } else {
            input.cost_source
        };
        let cost = CostService::resolve_decimal(
            initial_qty,
            input.unit_cost,
            input.total_cost,
            cost_source,
        );
        require_non_negative("unit_cost", cost.unit_cost)?;

        ensure_within_limit(self.limits.as_ref(), LimitedResource::Items)?;
        if initial_qty > Decimal::ZERO {
            ensure_within_limit(self.limits.as_ref(), LimitedResource::InventoryLogs)?;
        }

        let txn = self.db.begin().await?;
        ensure_category(&txn, input.category_id).await?;
        let tax = load_tax(&txn, input.tax_id).await?;
        let vendor = load_vendor(&txn, input.preferred_vendor_id).await?;

        let now = Utc::now();
        let item = items::ActiveModel {
            id: Set(ItemId::new().into_inner()),
            name: Set(name),
            uom_abbrev: Set(uom_abbrev),
            uom_abbrev_per_piece: Set(optional_text(input.uom_abbrev_per_piece)),
            qty_per_piece: Set(qty_per_piece.map(StoredDecimal::from)),
            unit_cost: Set(cost.unit_cost.into()),
            tax_id: Set(tax.as_ref().map(|t| t.id)),
            category_id: Set(input.category_id.into_inner()),
            preferred_vendor_id: Set(vendor.as_ref().map(|v| v.id)),
            low_stock_level: Set(low_stock_level.into()),
            created_at: Set(now),
            updated_at: Set(now),
        }
        .insert(&txn)
        .await?;

        let initial_log = if initial_qty > Decimal::ZERO {
            Some(
                insert_log(
                    &txn,
                    NewLog {
                        item_id: item.id,
                        operation_id: INITIAL_STOCK_OPERATION_ID,
                        quantity: initial_qty,
                        unit_cost: cost.unit_cost,
                        tax: tax.as_ref(),
                        vendor: vendor.as_ref(),
                        date: input.created_on,
                        remarks: None,
                        official_receipt_number: None,
                    },
                )
                .await?,
            )
        } else {
            None
        };

        txn.commit().await?;

        let rate = tax.as_ref().map_or(Decimal::ZERO, |t| t.rate_percentage.get());
        info!(
            item_id = %item.id,
            name = %item.name,
            initial_stock_qty = %initial_qty,
            "Item created"
        );
        Ok(CreatedItem {
            item,
            initial_log,
            cost,
            split: split_line(cost.unit_cost, initial_qty, rate),
        })
    }

    /// Edits an item's master data. Ledger rows are not touched.
    pub async fn update(
        &self,
        id: ItemId,
        input: UpdateItemInput,
    ) -> Result<items::Model, RepositoryError> {
        let name = require_text("name", &input.name)?;
        let uom_abbrev = require_text("uom_abbrev", &input.uom_abbrev)?;
        let low_stock_level = require_non_negative("low_stock_level", input.low_stock_level)?;
        let unit_cost = require_non_negative("unit_cost", input.unit_cost)?;
        let qty_per_piece = validate_qty_per_piece(input.qty_per_piece)?;

        let txn = self.db.begin().await?;
        let existing = items::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("item", id))?;
        ensure_category(&txn, input.category_id).await?;
        let tax = load_tax(&txn, input.tax_id).await?;
        let vendor = load_vendor(&txn, input.preferred_vendor_id).await?;

        let mut item: items::ActiveModel = existing.into();
        item.name = Set(name);
        item.uom_abbrev = Set(uom_abbrev);
        item.uom_abbrev_per_piece = Set(optional_text(input.uom_abbrev_per_piece));
        item.qty_per_piece = Set(qty_per_piece.map(StoredDecimal::from));
        item.category_id = Set(input.category_id.into_inner());
        item.tax_id = Set(tax.map(|t| t.id));
        item.preferred_vendor_id = Set(vendor.map(|v| v.id));
        item.low_stock_level = Set(low_stock_level.into());
        item.unit_cost = Set(unit_cost.into());
        item.updated_at = Set(Utc::now());
        let item = item.update(&txn).await?;
        txn.commit().await?;

        info!(item_id = %item.id, "Item updated");
        Ok(item)
    }

    /// Deletes an item that has no ledger rows.
    pub async fn delete(&self, id: ItemId) -> Result<(), RepositoryError> {
        let uuid = id.into_inner();
        let txn = self.db.begin().await?;

        let references = inventory_logs::Entity::find()
            .filter(inventory_logs::Column::ItemId.eq(uuid))
            .count(&txn)
            .await?;
        if references > 0 {
            warn!(item_id = %uuid, references, "Refusing to delete item with ledger rows");
            return Err(ValidationError::ItemInUse(id).into());
        }

        let result = items::Entity::delete_by_id(uuid).exec(&txn).await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("item", id));
        }
        txn.commit().await?;

        info!(item_id = %uuid, "Item deleted");
        Ok(())
    }

    /// Finds an item by ID.
    pub async fn find_by_id(&self, id: ItemId) -> Result<Option<items::Model>, RepositoryError> {
        Ok(items::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Lists items by name, optionally within one category.
    pub async fn list(
        &self,
        category_id: Option<CategoryId>,
    ) -> Result<Vec<items::Model>, RepositoryError> {
        let mut query = items::Entity::find();
        if let Some(category_id) = category_id {
            query = query.filter(items::Column::CategoryId.eq(category_id.into_inner()));
        }
        let rows = query.order_by_asc(items::Column::Name).all(&self.db).await?;
        debug!(count = rows.len(), "Listed items");
        Ok(rows)
    }
}
