//! Integration tests for the monthly cost report.

mod common;

use common::{create_category, create_item, date, month, setup};
use foodcost_core::cost::CostSource;
use foodcost_db::repositories::{
    CreateExpenseInput, CreateMonthlyExpenseInput, ExpenseGroupRepository, ExpenseRepository,
    InventoryLogRepository, LogInput, MonthlyExpenseRepository, PURCHASE_OPERATION_ID,
    ReconcileInput, ReconciliationRepository, ReportRepository, RevenueGroupInput,
    RevenueGroupRepository, RevenueInput, RevenueRepository,
};
use foodcost_shared::types::{
    CategoryId, ExpenseGroupId, ItemId, MonthlyExpenseId, RevenueGroupId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

#[tokio::test]
async fn test_cost_report_for_month() {
    let db = setup().await;
    let meat = create_category(&db, "Meat").await;
    let beef = create_item(&db, &meat, "Beef", dec!(10), dec!(100), None, date(2024, 3, 1)).await;
    let beef_id = ItemId::from_uuid(beef.id);

    InventoryLogRepository::new(db.clone())
        .append(LogInput {
            item_id: beef_id,
            operation_id: PURCHASE_OPERATION_ID,
            quantity: dec!(2),
            unit_cost: dec!(100),
            total_cost: Decimal::ZERO,
            cost_source: CostSource::Unit,
            tax_id: None,
            vendor_id: None,
            date: date(2024, 4, 2),
            remarks: None,
            official_receipt_number: None,
        })
        .await
        .unwrap();
    ReconciliationRepository::new(db.clone())
        .reconcile(ReconcileInput {
            item_id: beef_id,
            month: month(2024, 3),
            declared_remaining_qty: dec!(6),
            confirmed: true,
            today: date(2024, 6, 1),
        })
        .await
        .unwrap();

    let groups = RevenueGroupRepository::new(db.clone());
    let kitchen = groups
        .create(RevenueGroupInput {
            name: "Kitchen".to_string(),
            category_ids: vec![CategoryId::from_uuid(meat.id)],
        })
        .await
        .unwrap();
    let kitchen_id = RevenueGroupId::from_uuid(kitchen.group.id);
    let bar = groups
        .create(RevenueGroupInput {
            name: "Bar".to_string(),
            category_ids: vec![],
        })
        .await
        .unwrap();
    let bar_id = RevenueGroupId::from_uuid(bar.group.id);

    RevenueRepository::new(db.clone())
        .record(RevenueInput {
            revenue_group_id: kitchen_id,
            month: month(2024, 3),
            amount: dec!(2000),
        })
        .await
        .unwrap();

    let utilities = ExpenseGroupRepository::new(db.clone())
        .create("Utilities")
        .await
        .unwrap();
    let utilities_id = ExpenseGroupId::from_uuid(utilities.id);
    ExpenseRepository::new(db.clone())
        .create(CreateExpenseInput {
            expense_group_id: utilities_id,
            month: month(2024, 3),
            name: "Gas".to_string(),
            amount: dec!(100),
            revenue_group_ids: vec![kitchen_id, bar_id],
        })
        .await
        .unwrap();
    let monthly = MonthlyExpenseRepository::new(db.clone());
    let rent = monthly
        .create(CreateMonthlyExpenseInput {
            expense_group_id: utilities_id,
            name: "Rent".to_string(),
            revenue_group_ids: vec![kitchen_id],
        })
        .await
        .unwrap();
    monthly
        .set_amount(
            MonthlyExpenseId::from_uuid(rent.monthly_expense.id),
            month(2024, 3),
            dec!(300),
        )
        .await
        .unwrap();

    let report = ReportRepository::new(db.clone())
        .cost_report(month(2024, 3))
        .await
        .unwrap();

    assert_eq!(report.items.len(), 1);
    let item = &report.items[0];
    assert_eq!(item.ledger.previous_ending_qty, Decimal::ZERO);
    assert_eq!(item.ledger.added_qty, dec!(10));
    assert_eq!(item.ledger.removed_qty, dec!(4));
    assert_eq!(item.ledger.ending_qty, dec!(6));
    assert_eq!(item.grand_total.gross, dec!(600));
    assert_eq!(item.removed_cost.net, dec!(400));
    assert_eq!(item.revenue_amount, dec!(2000));
    assert_eq!(item.cost_percentage, dec!(20.00));

    assert_eq!(report.categories.len(), 1);
    assert_eq!(report.categories[0].item_count, 1);
    assert_eq!(report.categories[0].removed_cost.net, dec!(400));

    let kitchen_row = report
        .revenue_groups
        .iter()
        .find(|g| g.revenue_group_id == kitchen_id)
        .expect("kitchen rollup");
    assert_eq!(kitchen_row.category_cost, dec!(400));
    assert_eq!(kitchen_row.expense_amount, dec!(350));
    assert_eq!(kitchen_row.total_cost, dec!(750));
    assert_eq!(kitchen_row.total_cost_percentage, dec!(37.50));

    let bar_row = report
        .revenue_groups
        .iter()
        .find(|g| g.revenue_group_id == bar_id)
        .expect("bar rollup");
    assert_eq!(bar_row.expense_amount, dec!(50));
    assert_eq!(bar_row.revenue_amount, Decimal::ZERO);
    assert_eq!(bar_row.total_cost_percentage, Decimal::ZERO);
}

#[tokio::test]
async fn test_cost_report_for_empty_month() {
    let db = setup().await;
    let report = ReportRepository::new(db.clone())
        .cost_report(month(2024, 1))
        .await
        .unwrap();

    assert!(report.items.is_empty());
    assert!(report.categories.is_empty());
    assert!(report.revenue_groups.is_empty());
}
