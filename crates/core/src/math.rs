//! Guarded decimal arithmetic.
//!
//! Division by zero and unparsable input never fail; both resolve to zero.

use std::str::FromStr;

use rust_decimal::Decimal;
use rust_decimal::prelude::*;

/// Divides `numerator` by `denominator`, returning zero when the denominator
/// is zero or the quotient overflows.
#[must_use]
pub fn guarded_div(numerator: Decimal, denominator: Decimal) -> Decimal {
    if denominator.is_zero() {
        return Decimal::ZERO;
    }
    numerator.checked_div(denominator).unwrap_or(Decimal::ZERO)
}

/// `part / whole * 100`, rounded to 2 decimal places with Banker's Rounding.
/// Zero when `whole` is zero.
#[must_use]
pub fn percentage(part: Decimal, whole: Decimal) -> Decimal {
    (guarded_div(part, whole) * Decimal::ONE_HUNDRED)
        .round_dp_with_strategy(2, RoundingStrategy::MidpointNearestEven)
}

/// Parses user-entered decimal text. Blank or malformed input is zero.
///
/// Thousands separators (`,`) and surrounding whitespace are tolerated.
#[must_use]
pub fn parse_decimal_or_zero(input: &str) -> Decimal {
    let cleaned: String = input.trim().chars().filter(|c| *c != ',').collect();
    if cleaned.is_empty() {
        return Decimal::ZERO;
    }
    Decimal::from_str(&cleaned)
        .or_else(|_| Decimal::from_scientific(&cleaned))
        .unwrap_or(Decimal::ZERO)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[test]
    fn test_guarded_div_by_zero() {
        assert_eq!(guarded_div(dec!(100), Decimal::ZERO), Decimal::ZERO);
    }

    #[test]
    fn test_guarded_div_regular() {
        assert_eq!(guarded_div(dec!(100), dec!(8)), dec!(12.5));
    }

    #[test]
    fn test_percentage_rounds_to_two_places() {
        assert_eq!(percentage(dec!(1), dec!(3)), dec!(33.33));
        assert_eq!(percentage(dec!(250), dec!(1000)), dec!(25.00));
        assert_eq!(percentage(dec!(250), Decimal::ZERO), Decimal::ZERO);
    }

    #[rstest]
    #[case("12.5", dec!(12.5))]
    #[case("  7 ", dec!(7))]
    #[case("1,250.75", dec!(1250.75))]
    #[case("", dec!(0))]
    #[case("abc", dec!(0))]
    #[case("1.2.3", dec!(0))]
    #[case("-4", dec!(-4))]
    fn test_parse_decimal_or_zero(#[case] input: &str, #[case] expected: Decimal) {
        assert_eq!(parse_decimal_or_zero(input), expected);
    }
}
