//! Property-based tests for cost resolution.
//!
//! - unit_cost * quantity == total_cost regardless of the edited field

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::resolver::{CostService, CostSource};

/// Strategy for positive quantities (0.001 to 10,000.000).
fn positive_quantity() -> impl Strategy<Value = Decimal> {
    (1i64..10_000_000i64).prop_map(|n| Decimal::new(n, 3))
}

/// Strategy for non-negative money amounts (0.00 to 1,000,000.00).
fn amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

fn source_strategy() -> impl Strategy<Value = CostSource> {
    prop_oneof![Just(CostSource::Unit), Just(CostSource::Total)]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// Unit and total stay consistent whichever field was edited.
    #[test]
    fn prop_unit_times_quantity_equals_total(
        quantity in positive_quantity(),
        entered in amount(),
        source in source_strategy(),
    ) {
        let resolved = match source {
            CostSource::Unit => CostService::resolve_decimal(quantity, entered, Decimal::ZERO, source),
            CostSource::Total => CostService::resolve_decimal(quantity, Decimal::ZERO, entered, source),
        };

        let diff = (resolved.unit_cost * resolved.quantity - resolved.total_cost).abs();
        prop_assert!(diff <= dec!(0.000001), "diff {} too large", diff);
    }

    /// The entered field is never modified.
    #[test]
    fn prop_entered_field_is_preserved(
        quantity in positive_quantity(),
        unit in amount(),
        total in amount(),
    ) {
        let by_unit = CostService::resolve_decimal(quantity, unit, total, CostSource::Unit);
        prop_assert_eq!(by_unit.unit_cost, unit);

        let by_total = CostService::resolve_decimal(quantity, unit, total, CostSource::Total);
        prop_assert_eq!(by_total.total_cost, total);
    }

    /// Zero quantity never divides.
    #[test]
    fn prop_zero_quantity_yields_zero_unit(total in amount()) {
        let resolved = CostService::resolve_decimal(Decimal::ZERO, dec!(5), total, CostSource::Total);
        prop_assert_eq!(resolved.unit_cost, Decimal::ZERO);
    }
}
