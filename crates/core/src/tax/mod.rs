//! Tax decomposition and tax/vendor reference resolution.

pub mod reference;
pub mod splitter;

#[cfg(test)]
mod props;

pub use reference::{
    ReferenceSource, ResolvedTax, ResolvedVendor, TaxInfo, UNKNOWN_REFERENCE, VendorInfo,
    resolve_tax, resolve_vendor,
};
pub use splitter::{LineTaxSplit, TaxService, TaxSplit, split_line, split_tax};
