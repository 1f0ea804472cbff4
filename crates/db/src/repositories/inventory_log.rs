//! Stock ledger repository.
//!
//! Rows are appended by purchases, item creation, and reconciliation. The only
//! in-place change is the explicit edit flow, which re-derives the total cost
//! and refreshes the tax and vendor snapshots.

use std::collections::HashMap;

use chrono::{NaiveDate, Utc};
use foodcost_core::cost::{CostService, CostSource};
use foodcost_core::stock::{LedgerRollup, OperationKind, StockEntry, StockLedger, validate_adjustment};
use foodcost_core::tax::{
    LineTaxSplit, ResolvedTax, ResolvedVendor, resolve_tax, resolve_vendor, split_line,
};
use foodcost_shared::types::{InventoryLogId, ItemId, MonthKey, TaxId, VendorId};
use rust_decimal::Decimal;
use sea_orm::{
    ActiveModelTrait, ColumnTrait, ConnectionTrait, DatabaseConnection, DbErr, EntityTrait,
    QueryFilter, QueryOrder, Set, TransactionTrait,
};
use tracing::{debug, info};
use uuid::Uuid;

use super::error::RepositoryError;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use super::month::{from_columns, in_month, through_month, to_columns};
use super::tax::tax_info;
use super::vendor::vendor_info;
use crate::entities::{
    StoredDecimal, inventory_logs, inventory_operations, items, taxes, vendors,
};

/// Catalog ID of "Purchase".
pub const PURCHASE_OPERATION_ID: i32 = 1;
/// Catalog ID of "Initial Stock".
pub const INITIAL_STOCK_OPERATION_ID: i32 = 2;
/// Catalog ID of "Stock Usage".
pub const STOCK_USAGE_OPERATION_ID: i32 = 4;

/// Input for appending a ledger row.
#[derive(Debug, Clone)]
pub struct LogInput {
    /// Item adjusted.
    pub item_id: ItemId,
    /// Catalog operation.
    pub operation_id: i32,
    /// Quantity, must be positive.
    pub quantity: Decimal,
    /// Gross unit cost as entered.
    pub unit_cost: Decimal,
    /// Gross total cost as entered.
    pub total_cost: Decimal,
    /// Which cost field was entered.
    pub cost_source: CostSource,
    /// Tax applied.
    pub tax_id: Option<TaxId>,
    /// Vendor supplied by.
    pub vendor_id: Option<VendorId>,
    /// Adjustment date.
    pub date: NaiveDate,
    /// Free-text remarks.
    pub remarks: Option<String>,
    /// Receipt reference.
    pub official_receipt_number: Option<String>,
}

/// Replacement values for the edit flow.
#[derive(Debug, Clone)]
pub struct LogUpdate {
    /// Quantity, must be positive.
    pub quantity: Decimal,
    /// Gross unit cost as entered.
    pub unit_cost: Decimal,
    /// Gross total cost as entered.
    pub total_cost: Decimal,
    /// Which cost field was entered.
    pub cost_source: CostSource,
    /// Tax applied.
    pub tax_id: Option<TaxId>,
    /// Vendor supplied by.
    pub vendor_id: Option<VendorId>,
}

/// A ledger row ready for display.
#[derive(Debug, Clone)]
pub struct LedgerRow {
    /// Stored row.
    pub log: inventory_logs::Model,
    /// Catalog operation.
    pub operation: inventory_operations::Model,
    /// Direction of the operation.
    pub kind: OperationKind,
    /// Tax, live or from the snapshot.
    pub tax: ResolvedTax,
    /// Vendor, live or from the snapshot.
    pub vendor: ResolvedVendor,
    /// Unit and line split at the resolved rate.
    pub split: LineTaxSplit,
}

/// Values for a new ledger row.
pub(crate) struct NewLog<'a> {
    pub item_id: Uuid,
    pub operation_id: i32,
    pub quantity: Decimal,
    pub unit_cost: Decimal,
    pub tax: Option<&'a taxes::Model>,
    pub vendor: Option<&'a vendors::Model>,
    pub date: NaiveDate,
    pub remarks: Option<String>,
    pub official_receipt_number: Option<String>,
}

/// Inserts a ledger row, deriving the total, month key, and snapshots.
pub(crate) async fn insert_log<C: ConnectionTrait>(
    conn: &C,
    log: NewLog<'_>,
) -> Result<inventory_logs::Model, DbErr> {
    let (year, month) = to_columns(MonthKey::from_date(log.date));
    inventory_logs::ActiveModel {
        id: Set(InventoryLogId::new().into_inner()),
        item_id: Set(log.item_id),
        operation_id: Set(log.operation_id),
        adjustment_qty: Set(log.quantity.into()),
        adjustment_unit_cost: Set(log.unit_cost.into()),
        adjustment_total_cost: Set(CostService::line_total(log.unit_cost, log.quantity).into()),
        ref_tax_id: Set(log.tax.map(|t| t.id)),
        ref_vendor_id: Set(log.vendor.map(|v| v.id)),
        adjustment_tax_name: Set(log.tax.map(|t| t.name.clone())),
        adjustment_tax_rate_percentage: Set(log.tax.map(|t| t.rate_percentage)),
        vendor_display_name: Set(log.vendor.map(|v| v.vendor_display_name.clone())),
        adjustment_date: Set(log.date),
        adjustment_year: Set(year),
        adjustment_month: Set(month),
        remarks: Set(log.remarks),
        official_receipt_number: Set(log.official_receipt_number),
        created_at: Set(Utc::now()),
    }
    .insert(conn)
    .await
}

/// Loads a referenced tax, failing when the ID is unknown.
pub(crate) async fn load_tax<C: ConnectionTrait>(
    conn: &C,
    id: Option<TaxId>,
) -> Result<Option<taxes::Model>, RepositoryError> {
    let Some(id) = id else {
        return Ok(None);
    };
    taxes::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(Some)
        .ok_or_else(|| RepositoryError::not_found("tax", id))
}

/// Loads a referenced vendor, failing when the ID is unknown.
pub(crate) async fn load_vendor<C: ConnectionTrait>(
    conn: &C,
    id: Option<VendorId>,
) -> Result<Option<vendors::Model>, RepositoryError> {
    let Some(id) = id else {
        return Ok(None);
    };
    vendors::Entity::find_by_id(id.into_inner())
        .one(conn)
        .await?
        .map(Some)
        .ok_or_else(|| RepositoryError::not_found("vendor", id))
}

/// Direction of a catalog operation.
pub(crate) fn operation_kind(
    operation: &inventory_operations::Model,
) -> Result<OperationKind, RepositoryError> {
    operation
        .operation_type
        .parse()
        .map_err(|reason| RepositoryError::CorruptRow {
            entity: "inventory_operation",
            reason,
        })
}

async fn tax_map<C: ConnectionTrait>(conn: &C) -> Result<HashMap<Uuid, taxes::Model>, DbErr> {
    Ok(taxes::Entity::find()
        .all(conn)
        .await?
        .into_iter()
        .map(|t| (t.id, t))
        .collect())
}

fn resolved_tax(log: &inventory_logs::Model, taxes: &HashMap<Uuid, taxes::Model>) -> ResolvedTax {
    let live = log
        .ref_tax_id
        .and_then(|id| taxes.get(&id))
        .map(tax_info);
    resolve_tax(
        live.as_ref(),
        log.adjustment_tax_name.as_deref(),
        log.adjustment_tax_rate_percentage.map(StoredDecimal::get),
    )
}

/// Ledger entries dated in or before `through`, optionally for one item.
pub(crate) async fn stock_entries<C: ConnectionTrait>(
    conn: &C,
    item_id: Option<Uuid>,
    through: MonthKey,
) -> Result<Vec<StockEntry>, RepositoryError> {
    let mut query = inventory_logs::Entity::find()
        .find_also_related(inventory_operations::Entity)
        .filter(through_month(
            inventory_logs::Column::AdjustmentYear,
            inventory_logs::Column::AdjustmentMonth,
            through,
        ));
    if let Some(id) = item_id {
        query = query.filter(inventory_logs::Column::ItemId.eq(id));
    }
    let rows = query.all(conn).await?;
    let taxes = tax_map(conn).await?;

    let mut entries = Vec::with_capacity(rows.len());
    for (log, operation) in rows {
        let operation = operation.ok_or_else(|| RepositoryError::CorruptRow {
            entity: "inventory_log",
            reason: format!("unknown operation {}", log.operation_id),
        })?;
        entries.push(StockEntry {
            item_id: ItemId::from_uuid(log.item_id),
            kind: operation_kind(&operation)?,
            quantity: log.adjustment_qty.get(),
            unit_cost: log.adjustment_unit_cost.get(),
            tax_rate_percentage: resolved_tax(&log, &taxes).rate_percentage,
            month: from_columns(
                "inventory_log",
                log.adjustment_year,
                log.adjustment_month,
            )?,
        });
    }

    debug!(count = entries.len(), %through, "Loaded stock entries");
    Ok(entries)
}

/// Stock ledger repository.
#[derive(Clone)]
pub struct InventoryLogRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl InventoryLogRepository {
    /// Creates a new ledger repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new ledger repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// The static operation catalog in display order.
    pub async fn operations(&self) -> Result<Vec<inventory_operations::Model>, RepositoryError> {
        Ok(inventory_operations::Entity::find()
            .order_by_asc(inventory_operations::Column::DisplayOrder)
            .all(&self.db)
            .await?)
    }

    /// Appends a ledger row.
    pub async fn append(&self, input: LogInput) -> Result<inventory_logs::Model, RepositoryError> {
        let quantity = validate_adjustment(input.quantity)?;
        ensure_within_limit(self.limits.as_ref(), LimitedResource::InventoryLogs)?;
        let cost = CostService::resolve_decimal(
            quantity,
            input.unit_cost,
            input.total_cost,
            input.cost_source,
        );

        let txn = self.db.begin().await?;
        let item_uuid = input.item_id.into_inner();
        if items::Entity::find_by_id(item_uuid).one(&txn).await?.is_none() {
            return Err(RepositoryError::not_found("item", input.item_id));
        }
        if inventory_operations::Entity::find_by_id(input.operation_id)
            .one(&txn)
            .await?
            .is_none()
        {
            return Err(RepositoryError::not_found(
                "inventory_operation",
                input.operation_id,
            ));
        }
        let tax = load_tax(&txn, input.tax_id).await?;
        let vendor = load_vendor(&txn, input.vendor_id).await?;

        let log = insert_log(
            &txn,
            NewLog {
                item_id: item_uuid,
                operation_id: input.operation_id,
                quantity,
                unit_cost: cost.unit_cost,
                tax: tax.as_ref(),
                vendor: vendor.as_ref(),
                date: input.date,
                remarks: input.remarks,
                official_receipt_number: input.official_receipt_number,
            },
        )
        .await?;
        txn.commit().await?;

        info!(
            log_id = %log.id,
            item_id = %log.item_id,
            operation_id = log.operation_id,
            quantity = %log.adjustment_qty,
            "Ledger row appended"
        );
        Ok(log)
    }

    /// Replaces quantity, cost, tax, and vendor of an existing row.
    pub async fn update_log(
        &self,
        id: InventoryLogId,
        update: LogUpdate,
    ) -> Result<inventory_logs::Model, RepositoryError> {
        let quantity = validate_adjustment(update.quantity)?;
        let cost = CostService::resolve_decimal(
            quantity,
            update.unit_cost,
            update.total_cost,
            update.cost_source,
        );

        let txn = self.db.begin().await?;
        let existing = inventory_logs::Entity::find_by_id(id.into_inner())
            .one(&txn)
            .await?
            .ok_or_else(|| RepositoryError::not_found("inventory_log", id))?;
        let tax = load_tax(&txn, update.tax_id).await?;
        let vendor = load_vendor(&txn, update.vendor_id).await?;

        let mut log: inventory_logs::ActiveModel = existing.into();
        log.adjustment_qty = Set(quantity.into());
        log.adjustment_unit_cost = Set(cost.unit_cost.into());
        log.adjustment_total_cost =
            Set(CostService::line_total(cost.unit_cost, quantity).into());
        log.ref_tax_id = Set(tax.as_ref().map(|t| t.id));
        log.adjustment_tax_name = Set(tax.as_ref().map(|t| t.name.clone()));
        log.adjustment_tax_rate_percentage = Set(tax.as_ref().map(|t| t.rate_percentage));
        log.ref_vendor_id = Set(vendor.as_ref().map(|v| v.id));
        log.vendor_display_name = Set(vendor.as_ref().map(|v| v.vendor_display_name.clone()));
        let log = log.update(&txn).await?;
        txn.commit().await?;

        info!(log_id = %log.id, quantity = %log.adjustment_qty, "Ledger row updated");
        Ok(log)
    }

    /// Deletes a ledger row.
    pub async fn delete_log(&self, id: InventoryLogId) -> Result<(), RepositoryError> {
        let result = inventory_logs::Entity::delete_by_id(id.into_inner())
            .exec(&self.db)
            .await?;
        if result.rows_affected == 0 {
            return Err(RepositoryError::not_found("inventory_log", id));
        }
        info!(log_id = %id, "Ledger row deleted");
        Ok(())
    }

    /// Finds a stored row by ID.
    pub async fn find_by_id(
        &self,
        id: InventoryLogId,
    ) -> Result<Option<inventory_logs::Model>, RepositoryError> {
        Ok(inventory_logs::Entity::find_by_id(id.into_inner())
            .one(&self.db)
            .await?)
    }

    /// Rows of one item, oldest first, optionally restricted to one month.
    pub async fn list_for_item(
        &self,
        item_id: ItemId,
        month: Option<MonthKey>,
    ) -> Result<Vec<LedgerRow>, RepositoryError> {
        let mut query = inventory_logs::Entity::find()
            .find_also_related(inventory_operations::Entity)
            .filter(inventory_logs::Column::ItemId.eq(item_id.into_inner()));
        if let Some(month) = month {
            query = query.filter(in_month(
                inventory_logs::Column::AdjustmentYear,
                inventory_logs::Column::AdjustmentMonth,
                month,
            ));
        }
        let rows = query
            .order_by_asc(inventory_logs::Column::AdjustmentDate)
            .order_by_asc(inventory_logs::Column::CreatedAt)
            .all(&self.db)
            .await?;

        let taxes = tax_map(&self.db).await?;
        let vendors: HashMap<Uuid, vendors::Model> = vendors::Entity::find()
            .all(&self.db)
            .await?
            .into_iter()
            .map(|v| (v.id, v))
            .collect();

        let mut ledger = Vec::with_capacity(rows.len());
        for (log, operation) in rows {
            let operation = operation.ok_or_else(|| RepositoryError::CorruptRow {
                entity: "inventory_log",
                reason: format!("unknown operation {}", log.operation_id),
            })?;
            let kind = operation_kind(&operation)?;
            let tax = resolved_tax(&log, &taxes);
            let live_vendor = log
                .ref_vendor_id
                .and_then(|id| vendors.get(&id))
                .map(vendor_info);
            let vendor = resolve_vendor(live_vendor.as_ref(), log.vendor_display_name.as_deref());
            let split = split_line(
                log.adjustment_unit_cost.get(),
                log.adjustment_qty.get(),
                tax.rate_percentage,
            );
            ledger.push(LedgerRow {
                log,
                operation,
                kind,
                tax,
                vendor,
                split,
            });
        }

        debug!(item_id = %item_id, count = ledger.len(), "Listed ledger rows");
        Ok(ledger)
    }

    /// Quantity rollup of one item for `month`.
    pub async fn rollup(
        &self,
        item_id: ItemId,
        month: MonthKey,
    ) -> Result<LedgerRollup, RepositoryError> {
        let entries = stock_entries(&self.db, Some(item_id.into_inner()), month).await?;
        Ok(StockLedger::for_item(&entries, item_id).rollup(month))
    }

    /// Month-by-month rollups of one item from `from` through `to`.
    pub async fn history(
        &self,
        item_id: ItemId,
        from: MonthKey,
        to: MonthKey,
    ) -> Result<Vec<(MonthKey, LedgerRollup)>, RepositoryError> {
        let entries = stock_entries(&self.db, Some(item_id.into_inner()), to).await?;
        Ok(StockLedger::for_item(&entries, item_id).history(from, to))
    }
}
