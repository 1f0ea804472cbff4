//! `SeaORM` Entity for monthly_expense_entries table.

use sea_orm::entity::prelude::*;
use serde::{Deserialize, Serialize};

use super::StoredDecimal;

#[derive(Clone, Debug, PartialEq, DeriveEntityModel, Eq, Serialize, Deserialize)]
#[sea_orm(table_name = "monthly_expense_entries")]
pub struct Model {
    #[sea_orm(primary_key, auto_increment = false)]
    pub id: Uuid,
    pub monthly_expense_id: Uuid,
    pub entry_year: i32,
    pub entry_month: i32,
    #[sea_orm(column_type = "Text")]
    pub amount: StoredDecimal,
}

#[derive(Copy, Clone, Debug, EnumIter, DeriveRelation)]
pub enum Relation {
    #[sea_orm(
        belongs_to = "super::monthly_expenses::Entity",
        from = "Column::MonthlyExpenseId",
        to = "super::monthly_expenses::Column::Id"
    )]
    MonthlyExpenses,
}

impl Related<super::monthly_expenses::Entity> for Entity {
    fn to() -> RelationDef {
        Relation::MonthlyExpenses.def()
    }
}

impl ActiveModelBehavior for ActiveModel {}
