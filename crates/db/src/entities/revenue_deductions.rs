//! `SeaORM` Entity for revenue_deductions table.
//!
//! Exactly one of `expense_id` and `monthly_expense_id` is set.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "revenue_deductions")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub revenue_group_id: Uuid,
    pub expense_id: Option<Uuid>,
    pub monthly_expense_id: Option<Uuid>,
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
        belongs_to = "super::expenses::Entity",
        from = "Column::ExpenseId",
        to = "super::expenses::Column::Id"
    )]
    Expenses,
    #[sea_orm(
        belongs_to = "super::monthly_expenses::Entity",
        from = "Column::MonthlyExpenseId",
        to = "super::monthly_expenses::Column::Id"
    )]
    MonthlyExpenses,
}

impl Related<super::revenue_groups::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::RevenueGroups.def()
    }
}

impl Related<super::expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::Expenses.def()
    }
}

impl Related<super::monthly_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
