//! Property-based tests for the stock ledger.
//!
//! - ending(M) == ending(M-1) + added(M) - removed(M)
//! - entry order does not affect any rollup

use foodcost_shared::types::{ItemId, MonthKey};
use proptest::prelude::*;
use rust_decimal::Decimal;

use super::ledger::StockLedger;
use super::types::{OperationKind, StockEntry};

type Row = (OperationKind, i64, u32);

fn kind() -> impl Strategy<Value = OperationKind> {
    prop_oneof![Just(OperationKind::AddStock), Just(OperationKind::RemoveStock)]
}

/// Rows spread over 2023-01 .. 2024-12.
fn rows() -> impl Strategy<Value = Vec<Row>> {
    prop::collection::vec((kind(), 1i64..100_000i64, 0u32..24u32), 0..30)
}

fn any_month() -> impl Strategy<Value = MonthKey> {
    (2022i32..2026i32, 1u32..=12u32).prop_map(|(year, month)| MonthKey { year, month })
}

fn to_entries(item_id: ItemId, rows: &[Row]) -> Vec<StockEntry> {
    rows.iter()
        .map(|&(kind, qty, offset)| StockEntry {
            item_id,
            kind,
            quantity: Decimal::new(qty, 2),
            unit_cost: Decimal::ONE,
            tax_rate_percentage: Decimal::ZERO,
            month: MonthKey {
                year: if offset < 12 { 2023 } else { 2024 },
                month: offset % 12 + 1,
            },
        })
        .collect()
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    #[test]
    fn prop_ending_qty_recurrence(rows in rows(), month in any_month()) {
        let item = ItemId::new();
        let entries = to_entries(item, &rows);
        let ledger = StockLedger::for_item(&entries, item);

        let expected = ledger.ending_qty(month.previous())
            + ledger.added_qty(month)
            - ledger.removed_qty(month);
        prop_assert_eq!(ledger.ending_qty(month), expected);

        let rollup = ledger.rollup(month);
        prop_assert_eq!(
            rollup.ending_qty,
            rollup.previous_ending_qty + rollup.added_qty - rollup.removed_qty
        );
    }

    #[test]
    fn prop_order_does_not_matter(rows in rows(), month in any_month()) {
        let item = ItemId::new();
        let entries = to_entries(item, &rows);
        let mut reversed = entries.clone();
        reversed.reverse();

        let forward = StockLedger::for_item(&entries, item).rollup(month);
        let backward = StockLedger::for_item(&reversed, item).rollup(month);
        prop_assert_eq!(forward, backward);
    }
}
