//! Ending-inventory reconciliation against the stored ledger.
//!
//! Reading the ledger, planning, and appending the usage row happen inside a
//! single transaction so the plan is based on exactly the rows it amends.

use chrono::NaiveDate;
use foodcost_core::reconcile::{AddStockPrefill, ReconciliationPlan, ReconciliationService};
use foodcost_core::stock::StockLedger;
use foodcost_shared::types::{ItemId, MonthKey};
use rust_decimal::Decimal;
use sea_orm::{ConnectionTrait, DatabaseConnection, EntityTrait, TransactionTrait};
use tracing::{debug, info, warn};

use super::error::RepositoryError;
use super::inventory_log::{STOCK_USAGE_OPERATION_ID, NewLog, insert_log, stock_entries};
use super::item::usage_item;
use super::limits::{LimitedResource, SharedLimits, ensure_within_limit, unlimited};
use crate::entities::{inventory_logs, items, taxes};

/// Remarks written on reconciliation usage rows.
pub const RECONCILIATION_REMARKS: &str = "Ending inventory reconciliation";

/// A reconciliation request.
#[derive(Debug, Clone)]
pub struct ReconcileInput {
    /// Item counted.
    pub item_id: ItemId,
    /// Month being closed.
    pub month: MonthKey,
    /// Quantity the user counted on hand.
    pub declared_remaining_qty: Decimal,
    /// Whether the user confirmed recording usage.
    pub confirmed: bool,
    /// Today's date, used to date the usage row.
    pub today: NaiveDate,
}

/// What a reconciliation did or would do.
#[derive(Debug, Clone)]
pub struct ReconcileOutcome {
    /// Ledger ending quantity before the reconciliation.
    pub current_ending_qty: Decimal,
    /// The plan.
    pub plan: ReconciliationPlan,
    /// The usage row written, if any.
    pub log: Option<inventory_logs::Model>,
    /// Add-stock form contents when the plan is a redirect.
    pub prefill: Option<AddStockPrefill>,
}

struct Planned {
    item: items::Model,
    tax: Option<taxes::Model>,
    current_ending_qty: Decimal,
    plan: ReconciliationPlan,
}

async fn plan_for<C: ConnectionTrait>(
    conn: &C,
    item_id: ItemId,
    month: MonthKey,
    declared_remaining_qty: Decimal,
) -> Result<Planned, RepositoryError> {
    let item = items::Entity::find_by_id(item_id.into_inner())
        .one(conn)
        .await?
        .ok_or_else(|| RepositoryError::not_found("item", item_id))?;
    let tax = match item.tax_id {
        Some(tax_id) => taxes::Entity::find_by_id(tax_id).one(conn).await?,
        None => None,
    };

    let entries = stock_entries(conn, Some(item.id), month).await?;
    let current_ending_qty = StockLedger::for_item(&entries, item_id).ending_qty(month);
    let plan = ReconciliationService::plan(current_ending_qty, declared_remaining_qty)?;

    Ok(Planned {
        item,
        tax,
        current_ending_qty,
        plan,
    })
}

/// Reconciliation repository.
#[derive(Clone)]
pub struct ReconciliationRepository {
    db: DatabaseConnection,
    limits: SharedLimits,
}

impl ReconciliationRepository {
    /// Creates a new reconciliation repository without insert limits.
    #[must_use]
    pub fn new(db: DatabaseConnection) -> Self {
        Self::with_limits(db, unlimited())
    }

    /// Creates a new reconciliation repository consulting `limits` before inserts.
    #[must_use]
    pub fn with_limits(db: DatabaseConnection, limits: SharedLimits) -> Self {
        Self { db, limits }
    }

    /// Plans a reconciliation without writing anything.
    pub async fn preview(
        &self,
        item_id: ItemId,
        month: MonthKey,
        declared_remaining_qty: Decimal,
        today: NaiveDate,
    ) -> Result<ReconcileOutcome, RepositoryError> {
        let planned = plan_for(&self.db, item_id, month, declared_remaining_qty).await?;
        debug!(item_id = %item_id, %month, plan = ?planned.plan, "Reconciliation previewed");
        Ok(ReconcileOutcome {
            current_ending_qty: planned.current_ending_qty,
            plan: planned.plan,
            log: None,
            prefill: ReconciliationService::add_stock_prefill(
                planned.plan,
                &usage_item(&planned.item, planned.tax.as_ref()),
                month,
                today,
            ),
        })
    }

    /// Reconciles the declared quantity against the ledger.
    ///
    /// - balanced: nothing is written
    /// - declared above ledger: nothing is written; the outcome carries the
    ///   add-stock prefill
    /// - declared below ledger: one "Stock Usage" row is appended when
    ///   `confirmed`, otherwise `ConfirmationRequired` is returned
    pub async fn reconcile(
        &self,
        input: ReconcileInput,
    ) -> Result<ReconcileOutcome, RepositoryError> {
        let txn = self.db.begin().await?;
        let planned = plan_for(
            &txn,
            input.item_id,
            input.month,
            input.declared_remaining_qty,
        )
        .await?;
        let pricing = usage_item(&planned.item, planned.tax.as_ref());

        let outcome = ReconcileOutcome {
            current_ending_qty: planned.current_ending_qty,
            plan: planned.plan,
            log: None,
            prefill: None,
        };

        match planned.plan {
            ReconciliationPlan::Balanced => {
                debug!(item_id = %input.item_id, month = %input.month, "Ledger already balanced");
                Ok(outcome)
            }
            ReconciliationPlan::RedirectToAddStock { quantity } => {
                warn!(
                    item_id = %input.item_id,
                    %quantity,
                    "Declared quantity exceeds ledger; redirecting to add stock"
                );
                Ok(ReconcileOutcome {
                    prefill: ReconciliationService::add_stock_prefill(
                        planned.plan,
                        &pricing,
                        input.month,
                        input.today,
                    ),
                    ..outcome
                })
            }
            ReconciliationPlan::RecordUsage { quantity } => {
                let entry = match ReconciliationService::usage_entry(
                    planned.plan,
                    input.confirmed,
                    &pricing,
                    input.month,
                    input.today,
                ) {
                    Ok(Some(entry)) => entry,
                    Ok(None) => return Ok(outcome),
                    Err(err) => {
                        warn!(item_id = %input.item_id, %quantity, "Usage not confirmed");
                        return Err(err.into());
                    }
                };
                ensure_within_limit(self.limits.as_ref(), LimitedResource::InventoryLogs)?;

                let log = insert_log(
                    &txn,
                    NewLog {
                        item_id: planned.item.id,
                        operation_id: STOCK_USAGE_OPERATION_ID,
                        quantity: entry.quantity,
                        unit_cost: entry.unit_cost,
                        tax: planned.tax.as_ref(),
                        vendor: None,
                        date: entry.date,
                        remarks: Some(RECONCILIATION_REMARKS.to_string()),
                        official_receipt_number: None,
                    },
                )
                .await?;
                txn.commit().await?;

                info!(
                    item_id = %input.item_id,
                    month = %input.month,
                    log_id = %log.id,
                    %quantity,
                    "Stock usage recorded from reconciliation"
                );
                Ok(ReconcileOutcome {
                    log: Some(log),
                    ..outcome
                })
            }
        }
    }
}
