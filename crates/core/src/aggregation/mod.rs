//! Monthly cost rollups per item, category, and revenue group.

pub mod service;
pub mod types;


pub use service::{CostAggregationService, aggregate_cost_report};
pub use types::{
    CategoryCostRollup, CategoryProfile, CostFigures, CostReport, CostReportInput, ExpenseCharge,
    ItemCostRollup, ItemProfile, RevenueFigure, RevenueGroupProfile, RevenueGroupRollup,
};
