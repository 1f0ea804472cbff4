//! Integration tests for revenue groups, revenues, and expenses.

mod common;

use std::collections::HashSet;

use common::{create_category, deny, month, setup};
use foodcost_core::validation::ValidationError;
use foodcost_db::entities::{expenses, revenue_deductions, revenues};
use foodcost_db::repositories::{
    CreateExpenseInput, CreateMonthlyExpenseInput, ExpenseGroupRepository, ExpenseRepository,
    LimitedResource, MonthlyExpenseRepository, RepositoryError, RevenueGroupInput,
    RevenueGroupRepository, RevenueInput, RevenueRepository, UpdateExpenseInput,
    UpdateMonthlyExpenseInput,
};
use foodcost_shared::types::{
    CategoryId, ExpenseGroupId, ExpenseId, MonthlyExpenseId, RevenueGroupId,
};
use rust_decimal_macros::dec;
use sea_orm::{ColumnTrait, DatabaseConnection, EntityTrait, PaginatorTrait, QueryFilter};

async fn revenue_group(db: &DatabaseConnection, name: &str) -> RevenueGroupId {
    let group = RevenueGroupRepository::new(db.clone())
        .create(RevenueGroupInput {
            name: name.to_string(),
            category_ids: vec![],
        })
        .await
        .expect("Failed to create revenue group");
    RevenueGroupId::from_uuid(group.group.id)
}

async fn expense_group(db: &DatabaseConnection, name: &str) -> ExpenseGroupId {
    let group = ExpenseGroupRepository::new(db.clone())
        .create(name)
        .await
        .expect("Failed to create expense group");
    ExpenseGroupId::from_uuid(group.id)
}

async fn deduction_groups(db: &DatabaseConnection) -> HashSet<RevenueGroupId> {
    revenue_deductions::Entity::find()
        .all(db)
        .await
        .unwrap()
        .into_iter()
        .map(|row| RevenueGroupId::from_uuid(row.revenue_group_id))
        .collect()
}

#[tokio::test]
async fn test_create_expense_without_revenue_groups_writes_nothing() {
    let db = setup().await;
    let group = expense_group(&db, "Utilities").await;

    let err = ExpenseRepository::new(db.clone())
        .create(CreateExpenseInput {
            expense_group_id: group,
            month: month(2024, 3),
            name: "Electricity".to_string(),
            amount: dec!(500),
            revenue_group_ids: vec![],
        })
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        RepositoryError::Validation(ValidationError::EmptyRevenueGroups)
    ));
    assert_eq!(expenses::Entity::find().count(&db).await.unwrap(), 0);
    assert_eq!(revenue_deductions::Entity::find().count(&db).await.unwrap(), 0);
}

#[tokio::test]
async fn test_update_expense_replaces_deduction_set() {
    let db = setup().await;
    let group = expense_group(&db, "Utilities").await;
    let first = revenue_group(&db, "Kitchen").await;
    let second = revenue_group(&db, "Bar").await;
    let third = revenue_group(&db, "Catering").await;
    let repo = ExpenseRepository::new(db.clone());

    let created = repo
        .create(CreateExpenseInput {
            expense_group_id: group,
            month: month(2024, 3),
            name: "Water".to_string(),
            amount: dec!(120),
            revenue_group_ids: vec![first, second, first],
        })
        .await
        .unwrap();
    assert_eq!(created.revenue_group_ids, vec![first, second]);
    assert_eq!(deduction_groups(&db).await, HashSet::from([first, second]));

    let id = ExpenseId::from_uuid(created.expense.id);
    let updated = repo
        .update(
            id,
            UpdateExpenseInput {
                name: "Water".to_string(),
                amount: dec!(150),
                revenue_group_ids: vec![third],
            },
        )
        .await
        .unwrap();

    assert_eq!(updated.revenue_group_ids, vec![third]);
    assert_eq!(deduction_groups(&db).await, HashSet::from([third]));
    let stored = repo.find_by_id(id).await.unwrap().expect("expense");
    assert_eq!(stored.expense.amount, dec!(150));
    assert_eq!(stored.revenue_group_ids, vec![third]);
}

#[tokio::test]
async fn test_failed_update_keeps_previous_deductions() {
    let db = setup().await;
    let group = expense_group(&db, "Utilities").await;
    let kitchen = revenue_group(&db, "Kitchen").await;
    let repo = ExpenseRepository::new(db.clone());
    let created = repo
        .create(CreateExpenseInput {
            expense_group_id: group,
            month: month(2024, 3),
            name: "Gas".to_string(),
            amount: dec!(80),
            revenue_group_ids: vec![kitchen],
        })
        .await
        .unwrap();

    let missing = RevenueGroupId::new();
    let err = repo
        .update(
            ExpenseId::from_uuid(created.expense.id),
            UpdateExpenseInput {
                name: "Gas".to_string(),
                amount: dec!(80),
                revenue_group_ids: vec![missing],
            },
        )
        .await
        .unwrap_err();

    assert_eq!(err.error_code(), "NOT_FOUND");
    assert_eq!(deduction_groups(&db).await, HashSet::from([kitchen]));
}

#[tokio::test]
async fn test_expense_name_unique_within_group_and_month() {
    let db = setup().await;
    let group = expense_group(&db, "Utilities").await;
    let kitchen = revenue_group(&db, "Kitchen").await;
    let repo = ExpenseRepository::new(db.clone());
    let input = |m| CreateExpenseInput {
        expense_group_id: group,
        month: m,
        name: "Gas".to_string(),
        amount: dec!(80),
        revenue_group_ids: vec![kitchen],
    };

    repo.create(input(month(2024, 3))).await.unwrap();
    let err = repo.create(input(month(2024, 3))).await.unwrap_err();
    assert_eq!(err.error_code(), "DUPLICATE_NAME");

    // The same name is fine in another month.
    repo.create(input(month(2024, 4))).await.unwrap();
    let march = repo.list_for_month(month(2024, 3), None).await.unwrap();
    assert_eq!(march.len(), 1);
    assert_eq!(march[0].revenue_group_ids, vec![kitchen]);
}

#[tokio::test]
async fn test_revenue_record_upserts_per_month() {
    let db = setup().await;
    let kitchen = revenue_group(&db, "Kitchen").await;
    let repo = RevenueRepository::new(db.clone());

    let first = repo
        .record(RevenueInput {
            revenue_group_id: kitchen,
            month: month(2024, 3),
            amount: dec!(1000),
        })
        .await
        .unwrap();
    let second = repo
        .record(RevenueInput {
            revenue_group_id: kitchen,
            month: month(2024, 3),
            amount: dec!(1500),
        })
        .await
        .unwrap();

    assert_eq!(first.id, second.id);
    assert_eq!(revenues::Entity::find().count(&db).await.unwrap(), 1);
    let stored = repo.find(kitchen, month(2024, 3)).await.unwrap().unwrap();
    assert_eq!(stored.amount, dec!(1500));
    assert!(repo.find(kitchen, month(2024, 4)).await.unwrap().is_none());
}

#[tokio::test]
async fn test_revenue_update_ignores_insert_limit() {
    let db = setup().await;
    let kitchen = revenue_group(&db, "Kitchen").await;
    RevenueRepository::new(db.clone())
        .record(RevenueInput {
            revenue_group_id: kitchen,
            month: month(2024, 3),
            amount: dec!(1000),
        })
        .await
        .unwrap();

    let limited = RevenueRepository::with_limits(db.clone(), deny(&[LimitedResource::Revenues]));
    let updated = limited
        .record(RevenueInput {
            revenue_group_id: kitchen,
            month: month(2024, 3),
            amount: dec!(900),
        })
        .await
        .unwrap();
    assert_eq!(updated.amount, dec!(900));

    let err = limited
        .record(RevenueInput {
            revenue_group_id: kitchen,
            month: month(2024, 4),
            amount: dec!(900),
        })
        .await
        .unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::LimitReached(LimitedResource::Revenues)
    ));
}

#[tokio::test]
async fn test_revenue_group_links_and_delete_guard() {
    let db = setup().await;
    let meat = create_category(&db, "Meat").await;
    let produce = create_category(&db, "Produce").await;
    let repo = RevenueGroupRepository::new(db.clone());

    let group = repo
        .create(RevenueGroupInput {
            name: "Kitchen".to_string(),
            category_ids: vec![CategoryId::from_uuid(meat.id)],
        })
        .await
        .unwrap();
    let id = RevenueGroupId::from_uuid(group.group.id);

    let updated = repo
        .update(
            id,
            RevenueGroupInput {
                name: "Main Kitchen".to_string(),
                category_ids: vec![CategoryId::from_uuid(produce.id)],
            },
        )
        .await
        .unwrap();
    assert_eq!(updated.category_ids, vec![CategoryId::from_uuid(produce.id)]);

    let utilities = expense_group(&db, "Utilities").await;
    ExpenseRepository::new(db.clone())
        .create(CreateExpenseInput {
            expense_group_id: utilities,
            month: month(2024, 3),
            name: "Gas".to_string(),
            amount: dec!(80),
            revenue_group_ids: vec![id],
        })
        .await
        .unwrap();

    let err = repo.delete(id).await.unwrap_err();
    assert!(matches!(
        err,
        RepositoryError::Validation(ValidationError::RevenueGroupInUse(_))
    ));

    let err = ExpenseGroupRepository::new(db.clone())
        .delete(utilities)
        .await
        .unwrap_err();
    assert_eq!(err.error_code(), "EXPENSE_GROUP_IN_USE");
}

#[tokio::test]
async fn test_monthly_expense_entries_upsert() {
    let db = setup().await;
    let group = expense_group(&db, "Fixed").await;
    let kitchen = revenue_group(&db, "Kitchen").await;
    let bar = revenue_group(&db, "Bar").await;
    let repo = MonthlyExpenseRepository::new(db.clone());

    let rent = repo
        .create(CreateMonthlyExpenseInput {
            expense_group_id: group,
            name: "Rent".to_string(),
            revenue_group_ids: vec![kitchen],
        })
        .await
        .unwrap();
    let id = MonthlyExpenseId::from_uuid(rent.monthly_expense.id);

    repo.set_amount(id, month(2024, 3), dec!(300)).await.unwrap();
    repo.set_amount(id, month(2024, 3), dec!(350)).await.unwrap();
    repo.set_amount(id, month(2024, 4), dec!(300)).await.unwrap();

    let entries = repo.entries(id).await.unwrap();
    assert_eq!(entries.len(), 2);
    assert_eq!((entries[0].entry_month, entries[0].amount.get()), (3, dec!(350)));
    assert_eq!((entries[1].entry_month, entries[1].amount.get()), (4, dec!(300)));

    repo.update(
        id,
        UpdateMonthlyExpenseInput {
            name: "Rent".to_string(),
            revenue_group_ids: vec![bar],
        },
    )
    .await
    .unwrap();
    let remaining = revenue_deductions::Entity::find()
        .filter(revenue_deductions::Column::MonthlyExpenseId.eq(rent.monthly_expense.id))
        .all(&db)
        .await
        .unwrap();
    assert_eq!(remaining.len(), 1);
    assert_eq!(remaining[0].revenue_group_id, bar.into_inner());

    repo.delete(id).await.unwrap();
    assert!(repo.entries(id).await.unwrap().is_empty());
    assert_eq!(revenue_deductions::Entity::find().count(&db).await.unwrap(), 0);
}
