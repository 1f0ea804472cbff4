//! `SeaORM` Entity for monthly_expenses table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_expenses")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub expense_group_id: Uuid,
    pub name: String,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::expense_groups::Entity",
        from = "Column::ExpenseGroupId",
        to = "super::expense_groups::Column::Id"
    )]
    ExpenseGroups,
    #[sea_orm(has_many = "super::monthly_expense_entries::Entity")]
    MonthlyExpenseEntries,
    #[sea_orm(has_many = "super::revenue_deductions::Entity")]
    RevenueDeductions,
}

impl Related<super::expense_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::ExpenseGroups.def()
    }
}

impl Related<super::monthly_expense_entries::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyExpenseEntries.def()
    }
}

impl Related<super::revenue_deductions::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueDeductions.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
