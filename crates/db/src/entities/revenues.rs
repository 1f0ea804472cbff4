//! `SeaORM` Entity for revenues table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StoredDecimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "revenues")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub revenue_group_id: Uuid,
    pub revenue_year: i32,
    pub revenue_month: i32,
    #[sea_orm(column_type = "Text")]
    pub amount: StoredDecimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::revenue_groups::Entity",
        from = "Column::RevenueGroupId",
        to = "super::revenue_groups::Column::Id"
    )]
    RevenueGroups,
}

impl Related<super::revenue_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueGroups.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
