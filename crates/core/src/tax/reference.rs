//! Tax and vendor reference resolution.
//!
//! Ledger rows keep a nullable reference to a tax and a vendor plus a copy of
//! their display data taken when the row was written. Rendering prefers the
//! live row, falls back to the copy, and finally to [`UNKNOWN_REFERENCE`].

use foodcost_shared::types::{TaxId, VendorId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// Display name used when neither the live row nor a snapshot is available.
pub const UNKNOWN_REFERENCE: &str = "Unknown";

/// Live tax data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxInfo {
    /// Tax ID.
    pub id: TaxId,
    /// Tax name.
    pub name: String,
    /// Rate in percent.
    pub rate_percentage: Decimal,
}

/// Live vendor data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct VendorInfo {
    /// Vendor ID.
    pub id: VendorId,
    /// Display name.
    pub display_name: String,
}

/// Where resolved display data came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReferenceSource {
    /// The referenced row still exists.
    Live,
    /// The referenced row is gone; the write-time copy was used.
    Snapshot,
    /// Nothing is known.
    Unknown,
}

/// Resolved tax display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedTax {
    /// Name to display.
    pub name: String,
    /// Rate to apply.
    pub rate_percentage: Decimal,
    /// Origin of the data.
    pub source: ReferenceSource,
}

/// Resolved vendor display data.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ResolvedVendor {
    /// Name to display.
    pub display_name: String,
    /// Origin of the data.
    pub source: ReferenceSource,
}

/// Resolves a tax reference: live, then snapshot, then unknown with rate 0.
#[must_use]
pub fn resolve_tax(
    live: Option<&TaxInfo>,
    snapshot_name: Option<&str>,
    snapshot_rate: Option<Decimal>,
) -> ResolvedTax {
    if let Some(tax) = live {
        return ResolvedTax {
            name: tax.name.clone(),
            rate_percentage: tax.rate_percentage,
            source: ReferenceSource::Live,
        };
    }

    if snapshot_name.is_none() && snapshot_rate.is_none() {
        return ResolvedTax {
            name: UNKNOWN_REFERENCE.to_string(),
            rate_percentage: Decimal::ZERO,
            source: ReferenceSource::Unknown,
        };
    }

    ResolvedTax {
        name: snapshot_name.unwrap_or(UNKNOWN_REFERENCE).to_string(),
        rate_percentage: snapshot_rate.unwrap_or(Decimal::ZERO),
        source: ReferenceSource::Snapshot,
    }
}

/// Resolves a vendor reference in the same order as [`resolve_tax`].
#[must_use]
pub fn resolve_vendor(live: Option<&VendorInfo>, snapshot_name: Option<&str>) -> ResolvedVendor {
    match (live, snapshot_name) {
        (Some(vendor), _) => ResolvedVendor {
            display_name: vendor.display_name.clone(),
            source: ReferenceSource::Live,
        },
        (None, Some(name)) => ResolvedVendor {
            display_name: name.to_string(),
            source: ReferenceSource::Snapshot,
        },
        (None, None) => ResolvedVendor {
            display_name: UNKNOWN_REFERENCE.to_string(),
            source: ReferenceSource::Unknown,
        },
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn vat() -> TaxInfo {
        TaxInfo {
            id: TaxId::new(),
            name: "VAT".to_string(),
            rate_percentage: dec!(12),
        }
    }

    #[test]
    fn test_live_tax_wins_over_snapshot() {
        let live = vat();
        let resolved = resolve_tax(Some(&live), Some("Old VAT"), Some(dec!(10)));
        assert_eq!(resolved.name, "VAT");
        assert_eq!(resolved.rate_percentage, dec!(12));
        assert_eq!(resolved.source, ReferenceSource::Live);
    }

    #[test]
    fn test_deleted_tax_falls_back_to_snapshot() {
        let resolved = resolve_tax(None, Some("VAT"), Some(dec!(12)));
        assert_eq!(resolved.name, "VAT");
        assert_eq!(resolved.rate_percentage, dec!(12));
        assert_eq!(resolved.source, ReferenceSource::Snapshot);
    }

    #[test]
    fn test_partial_snapshot() {
        let resolved = resolve_tax(None, None, Some(dec!(5)));
        assert_eq!(resolved.name, UNKNOWN_REFERENCE);
        assert_eq!(resolved.rate_percentage, dec!(5));
        assert_eq!(resolved.source, ReferenceSource::Snapshot);
    }

    #[test]
    fn test_unknown_tax_has_zero_rate() {
        let resolved = resolve_tax(None, None, None);
        assert_eq!(resolved.name, "Unknown");
        assert_eq!(resolved.rate_percentage, Decimal::ZERO);
        assert_eq!(resolved.source, ReferenceSource::Unknown);
    }

    #[test]
    fn test_vendor_resolution_order() {
        let live = VendorInfo {
            id: VendorId::new(),
            display_name: "Fresh Farms".to_string(),
        };
        assert_eq!(
            resolve_vendor(Some(&live), Some("Old Farms")).display_name,
            "Fresh Farms"
        );
        assert_eq!(
            resolve_vendor(None, Some("Old Farms")).source,
            ReferenceSource::Snapshot
        );
        assert_eq!(
            resolve_vendor(None, None).display_name,
            UNKNOWN_REFERENCE
        );
    }
}
