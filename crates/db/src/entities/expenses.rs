//! `SeaORM` Entity for expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StoredDecimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_group_id: Uuid,
    pub expense_year: i32,
    pub expense_month: i32,
    pub name: String,
    #[sea_orm(column_type = "Text")]
    pub amount: StoredDecimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_groups::Entity",
        from = "Column::ExpenseGroupId",
        to = "super::expense_groups::Column::Id"
    )]
    ExpenseGroups,
    #[sea_orm(has_many = "super::revenue_deductions::Entity")]
    RevenueDeductions,
}

impl Related<super::expense_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseGroups.def()
    }
}

impl Related<super::revenue_deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueDeductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
