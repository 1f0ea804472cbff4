//! Shared setup for repository integration tests.

#![allow(dead_code)]

use std::collections::HashSet;
use std::sync::Arc;

use chrono::NaiveDate;
use foodcost_core::cost::CostSource;
use foodcost_db::entities::{categories, items};
use foodcost_db::migration::Migrator;
use foodcost_db::repositories::{
    CategoryRepository, CreateItemInput, InsertLimitOracle, ItemRepository, LimitedResource,
    SharedLimits,
};
use foodcost_shared::types::{CategoryId, MonthKey, TaxId};
use rust_decimal::Decimal;
use sea_orm::{Database, DatabaseConnection};
use sea_orm_migration::MigratorTrait;

/// Fresh in-memory database with the schema applied.
pub async fn setup() -> DatabaseConnection {
    let db = Database::connect("sqlite::memory:")
        .await
        .expect("Failed to connect to database");
    Migrator::up(&db, None)
        .await
        .expect("Failed to apply migrations");
    db
}

pub fn month(year: i32, month: u32) -> MonthKey {
    MonthKey::new(year, month).expect("valid month")
}

pub fn date(year: i32, month: u32, day: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(year, month, day).expect("valid date")
}

pub async fn create_category(db: &DatabaseConnection, name: &str) -> categories::Model {
    CategoryRepository::new(db.clone())
        .create(name)
        .await
        .expect("Failed to create category")
}

/// Item with an opening stock row dated `created_on`.
pub async fn create_item(
    db: &DatabaseConnection,
    category: &categories::Model,
    name: &str,
    initial_stock_qty: Decimal,
    unit_cost: Decimal,
    tax_id: Option<TaxId>,
    created_on: NaiveDate,
) -> items::Model {
    ItemRepository::new(db.clone())
        .create(CreateItemInput {
            name: name.to_string(),
            uom_abbrev: "kg".to_string(),
            uom_abbrev_per_piece: None,
            qty_per_piece: None,
            category_id: CategoryId::from_uuid(category.id),
            tax_id,
            preferred_vendor_id: None,
            low_stock_level: Decimal::ZERO,
            initial_stock_qty,
            unit_cost,
            total_cost: Decimal::ZERO,
            cost_source: CostSource::Unit,
            created_on,
        })
        .await
        .expect("Failed to create item")
        .item
}

/// Oracle that vetoes the listed resources.
pub struct Deny(pub HashSet<LimitedResource>);

impl InsertLimitOracle for Deny {
    fn limit_reached(&self, resource: LimitedResource) -> bool {
        self.0.contains(&resource)
    }
}

pub fn deny(resources: &[LimitedResource]) -> SharedLimits {
    Arc::new(Deny(resources.iter().copied().collect()))
}
