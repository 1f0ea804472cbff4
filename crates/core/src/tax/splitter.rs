//! Gross to net/tax splitting.
//!
//! Stored costs are gross (tax-inclusive). The net portion is
//! `gross / (1 + rate / 100)` and tax is the difference, so
//! `net + tax == gross` holds exactly for every split.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::math::guarded_div;

/// A gross amount decomposed into net and tax.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TaxSplit {
    /// Tax-inclusive amount.
    pub gross: Decimal,
    /// Tax-exclusive amount.
    pub net: Decimal,
    /// `gross - net`.
    pub tax: Decimal,
    /// Rate applied, after clamping.
    pub rate_percentage: Decimal,
}

impl TaxSplit {
    /// Negates every amount, keeping the rate. Used for remove-stock rows.
    #[must_use]
    pub fn negated(self) -> Self {
        Self {
            gross: -self.gross,
            net: -self.net,
            tax: -self.tax,
            rate_percentage: self.rate_percentage,
        }
    }
}

/// Unit-level and line-level split of one ledger row.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineTaxSplit {
    /// Quantity on the line.
    pub quantity: Decimal,
    /// Split of one unit.
    pub unit: TaxSplit,
    /// Split of `unit_gross * quantity`.
    pub line: TaxSplit,
}

/// Tax splitting service.
pub struct TaxService;

impl TaxService {
    /// Negative rates are treated as zero.
    #[must_use]
    pub fn clamp_rate(rate_percentage: Decimal) -> Decimal {
        rate_percentage.max(Decimal::ZERO)
    }

    /// Splits `gross` at `rate_percentage`.
    #[must_use]
    pub fn split(gross: Decimal, rate_percentage: Decimal) -> TaxSplit {
        let rate = Self::clamp_rate(rate_percentage);
        if rate.is_zero() {
            return TaxSplit {
                gross,
                net: gross,
                tax: Decimal::ZERO,
                rate_percentage: rate,
            };
        }

        let divisor = Decimal::ONE + rate / Decimal::ONE_HUNDRED;
        let net = guarded_div(gross, divisor);
        TaxSplit {
            gross,
            net,
            tax: gross - net,
            rate_percentage: rate,
        }
    }

    /// Splits a unit price and the line total it produces with `quantity`.
    #[must_use]
    pub fn split_line(unit_gross: Decimal, quantity: Decimal, rate_percentage: Decimal) -> LineTaxSplit {
        LineTaxSplit {
            quantity,
            unit: Self::split(unit_gross, rate_percentage),
            line: Self::split(unit_gross.saturating_mul(quantity), rate_percentage),
        }
    }
}

/// Splits `gross` at `rate_percentage`. See [`TaxService::split`].
#[must_use]
pub fn split_tax(gross: Decimal, rate_percentage: Decimal) -> TaxSplit {
    TaxService::split(gross, rate_percentage)
}

/// See [`TaxService::split_line`].
#[must_use]
pub fn split_line(unit_gross: Decimal, quantity: Decimal, rate_percentage: Decimal) -> LineTaxSplit {
    TaxService::split_line(unit_gross, quantity, rate_percentage)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_zero_rate_is_all_net() {
        let split = split_tax(dec!(1000), Decimal::ZERO);
        assert_eq!(split.net, dec!(1000));
        assert_eq!(split.tax, Decimal::ZERO);
    }

    #[test]
    fn test_twelve_percent() {
        let split = split_tax(dec!(112), dec!(12));
        assert_eq!(split.net, dec!(100));
        assert_eq!(split.tax, dec!(12));
        assert_eq!(split.rate_percentage, dec!(12));
    }

    #[test]
    fn test_negative_rate_is_clamped() {
        let split = split_tax(dec!(50), dec!(-5));
        assert_eq!(split.net, dec!(50));
        assert_eq!(split.tax, Decimal::ZERO);
        assert_eq!(split.rate_percentage, Decimal::ZERO);
    }

    #[test]
    fn test_line_split_uses_same_formula() {
        let line = split_line(dec!(11.2), dec!(10), dec!(12));
        assert_eq!(line.unit.net, dec!(10));
        assert_eq!(line.line.gross, dec!(112));
        assert_eq!(line.line.net, dec!(100));
        assert_eq!(line.line.tax, dec!(12));
    }

    #[test]
    fn test_negated_keeps_rate() {
        let split = split_tax(dec!(112), dec!(12)).negated();
        assert_eq!(split.gross, dec!(-112));
        assert_eq!(split.net, dec!(-100));
        assert_eq!(split.tax, dec!(-12));
        assert_eq!(split.rate_percentage, dec!(12));
    }
}
