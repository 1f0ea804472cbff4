//! `SeaORM` Entity for items table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StoredDecimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "items")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub name: String,
    pub uom_abbrev: String,
    pub uom_abbrev_per_piece: Option<String>,
    #[sea_orm(column_type = "Text", nullable)]
    pub qty_per_piece: Option<StoredDecimal>,
    #[sea_orm(column_type = "Text")]
    pub unit_cost: StoredDecimal,
    pub tax_id: Option<Uuid>,
    pub category_id: Uuid,
    pub preferred_vendor_id: Option<Uuid>,
    #[sea_orm(column_type = "Text")]
    pub low_stock_level: StoredDecimal,
    pub created_at: DateTimeUtc,
    pub updated_at: DateTimeUtc,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
    #[sea_orm(
        belongs_to = "super::taxes::Entity",
        from = "Column::TaxId",
        to = "super::taxes::Column::Id"
    )]
    Taxes,
    #[sea_orm(has_many = "super::inventory_logs::Entity")]
    InventoryLogs,
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl Related<super::taxes::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Taxes.def()
    }
}

impl Related<super::inventory_logs::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::InventoryLogs.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
