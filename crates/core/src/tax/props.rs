//! Property-based tests for tax splitting.

use proptest::prelude::*;
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use super::splitter::TaxService;

fn gross_amount() -> impl Strategy<Value = Decimal> {
    (0i64..100_000_000i64).prop_map(|cents| Decimal::new(cents, 2))
}

/// Rates from 0.00% to 100.00%.
fn rate() -> impl Strategy<Value = Decimal> {
    (0i64..10_000i64).prop_map(|bp| Decimal::new(bp, 2))
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(200))]

    /// net * (1 + r/100) reproduces gross.
    #[test]
    fn prop_net_grossed_up_equals_gross(gross in gross_amount(), r in rate()) {
        let split = TaxService::split(gross, r);
        let rebuilt = split.net * (Decimal::ONE + r / Decimal::ONE_HUNDRED);
        prop_assert!((rebuilt - gross).abs() <= dec!(0.000001));
    }

    /// net + tax == gross.
    #[test]
    fn prop_net_plus_tax_is_gross(gross in gross_amount(), r in rate()) {
        let split = TaxService::split(gross, r);
        prop_assert!((split.net + split.tax - gross).abs() <= dec!(0.0000000001));
    }

    /// Zero rate leaves everything net.
    #[test]
    fn prop_zero_rate_has_no_tax(gross in gross_amount()) {
        let split = TaxService::split(gross, Decimal::ZERO);
        prop_assert_eq!(split.net, gross);
        prop_assert_eq!(split.tax, Decimal::ZERO);
    }

    /// Tax is never negative for a non-negative gross.
    #[test]
    fn prop_tax_non_negative(gross in gross_amount(), r in rate()) {
        let split = TaxService::split(gross, r);
        prop_assert!(split.tax >= Decimal::ZERO);
        prop_assert!(split.net <= gross);
    }
}
