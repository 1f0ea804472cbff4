//! Cost input resolution.
//!
//! A cost form has three fields: quantity, unit cost, and total cost. The user
//! edits either the unit cost or the total cost; the other one is re-derived
//! from the quantity. `CostSource` records which one was edited last.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::math::{guarded_div, parse_decimal_or_zero};

/// The cost field the user edited last.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum CostSource {
    /// Unit cost was entered; total cost is derived.
    #[default]
    #[serde(rename = "unit_cost")]
    Unit,
    /// Total cost was entered; unit cost is derived.
    #[serde(rename = "total_cost")]
    Total,
}

/// Raw form input, exactly as typed.
#[derive(Debug, Clone, Copy)]
pub struct CostInput<'a> {
    /// Quantity text.
    pub quantity: &'a str,
    /// Unit cost text.
    pub unit_cost: &'a str,
    /// Total cost text.
    pub total_cost: &'a str,
    /// Which cost field drives the other.
    pub source: CostSource,
}

/// Resolved cost figures.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedCost {
    /// Parsed quantity (zero when unparsable).
    pub quantity: Decimal,
    /// Unit cost, entered or derived.
    pub unit_cost: Decimal,
    /// Total cost, entered or derived.
    pub total_cost: Decimal,
    /// The field that was treated as entered.
    pub source: CostSource,
}

/// Cost derivation service.
pub struct CostService;

impl CostService {
    /// Resolves textual form input. Parse failures count as zero.
    #[must_use]
    pub fn resolve(input: &CostInput<'_>) -> ResolvedCost {
        Self::resolve_decimal(
            parse_decimal_or_zero(input.quantity),
            parse_decimal_or_zero(input.unit_cost),
            parse_decimal_or_zero(input.total_cost),
            input.source,
        )
    }

    /// Resolves already-parsed figures.
    ///
    /// - `Unit`: `total = unit * quantity`
    /// - `Total`: `unit = total / quantity`, zero when quantity is zero
    #[must_use]
    pub fn resolve_decimal(
        quantity: Decimal,
        unit_cost: Decimal,
        total_cost: Decimal,
        source: CostSource,
    ) -> ResolvedCost {
        match source {
            CostSource::Unit => ResolvedCost {
                quantity,
                unit_cost,
                total_cost: unit_cost.saturating_mul(quantity),
                source,
            },
            CostSource::Total => ResolvedCost {
                quantity,
                unit_cost: guarded_div(total_cost, quantity),
                total_cost,
                source,
            },
        }
    }

    /// Line total for a stored ledger row.
    #[must_use]
    pub fn line_total(unit_cost: Decimal, quantity: Decimal) -> Decimal {
        unit_cost.saturating_mul(quantity)
    }
}

/// Resolves a cost form. See [`CostService::resolve`].
#[must_use]
pub fn resolve_cost(input: &CostInput<'_>) -> ResolvedCost {
    CostService::resolve(input)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    fn input<'a>(qty: &'a str, unit: &'a str, total: &'a str, source: CostSource) -> CostInput<'a> {
        CostInput {
            quantity: qty,
            unit_cost: unit,
            total_cost: total,
            source,
        }
    }

    #[test]
    fn test_unit_source_derives_total() {
        let resolved = resolve_cost(&input("10", "100", "", CostSource::Unit));
        assert_eq!(resolved.total_cost, dec!(1000));
        assert_eq!(resolved.unit_cost, dec!(100));
    }

    #[test]
    fn test_total_source_derives_unit() {
        let resolved = resolve_cost(&input("8", "", "100", CostSource::Total));
        assert_eq!(resolved.unit_cost, dec!(12.5));
        assert_eq!(resolved.total_cost, dec!(100));
    }

    #[rstest]
    #[case("0")]
    #[case("")]
    #[case("two")]
    fn test_total_source_with_unusable_quantity(#[case] qty: &str) {
        let resolved = resolve_cost(&input(qty, "55", "100", CostSource::Total));
        assert_eq!(resolved.unit_cost, Decimal::ZERO);
        assert_eq!(resolved.quantity, Decimal::ZERO);
    }

    #[test]
    fn test_garbage_costs_are_zero() {
        let resolved = resolve_cost(&input("3", "n/a", "", CostSource::Unit));
        assert_eq!(resolved.unit_cost, Decimal::ZERO);
        assert_eq!(resolved.total_cost, Decimal::ZERO);
    }

    #[test]
    fn test_switching_source_only_rederives_other_field() {
        // Entered as total first.
        let first = resolve_cost(&input("4", "", "10", CostSource::Total));
        assert_eq!(first.unit_cost, dec!(2.5));

        // User switches to unit cost and changes quantity; total follows unit.
        let unit = first.unit_cost.to_string();
        let total = first.total_cost.to_string();
        let second = resolve_cost(&input("6", &unit, &total, CostSource::Unit));
        assert_eq!(second.unit_cost, dec!(2.5));
        assert_eq!(second.total_cost, dec!(15));
    }

    #[test]
    fn test_source_serde_names() {
        assert_eq!(
            serde_json::to_string(&CostSource::Unit).unwrap(),
            "\"unit_cost\""
        );
        assert_eq!(
            serde_json::from_str::<CostSource>("\"total_cost\"").unwrap(),
            CostSource::Total
        );
    }
}
