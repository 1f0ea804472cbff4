//! `SeaORM` Entity for the revenue_categories junction table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_categories")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub revenue_group_id: Uuid,
    #[sea_orm(primary_key, auto_increment = false)]
    pub category_id: Uuid,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::revenue_groups::Entity",
        from = "Column::RevenueGroupId",
        to = "super::revenue_groups::Column::Id"
    )]
    RevenueGroups,
    #[sea_orm(
        belongs_to = "super::categories::Entity",
        from = "Column::CategoryId",
        to = "super::categories::Column::Id"
    )]
    Categories,
}

impl Related<super::revenue_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueGroups.def()
    }
}

impl Related<super::categories::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Categories.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
