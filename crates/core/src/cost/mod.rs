//! Bidirectional unit/total cost derivation.

pub mod resolver;

#[cfg(test)]
mod props;

pub use resolver::{CostInput, CostService, CostSource, ResolvedCost, resolve_cost};
