//! `SeaORM` Entity for inventory_logs table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StoredDecimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "inventory_logs")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub item_id: Uuid,
    pub operation_id: i32,
    #[sea_orm(column_type = "Text")]
    pub adjustment_qty: StoredDecimal,
    #[sea_orm(column_type = "Text")]
    pub adjustment_unit_cost: StoredDecimal,
    #[sea_orm(column_type = "Text")]
    pub adjustment_total_cost: StoredDecimal,
    pub ref_tax_id: Option<Uuid>,
    pub ref_vendor_id: Option<Uuid>,
    pub adjustment_tax_name: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub adjustment_tax_rate_percentage: Option<StoredDecimal>,
    pub vendor_display_name: Option<String>,
    pub adjustment_date: Date,
    pub adjustment_year: i32,
    pub adjustment_month: i32,
    pub remarks: Option<String>,
    pub official_receipt_number: Option<String>,
    pub created_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::items::Entity",
        from = "Column::ItemId",
        to = "super::items::Column::Id"
    )]
    Items,
    #[sea_orm(
        belongs_to = "super::inventory_operations::Entity",
        from = "Column::OperationId",
        to = "super::inventory_operations::Column::Id"
    )]
    InventoryOperations,
}

impl Related<super::items::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Items.def()
    }
}

impl Related<super::inventory_operations::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryOperations.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
