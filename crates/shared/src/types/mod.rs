//! Common types used across the application.

pub mod id;
pub mod month;

#[cfg(test)]
mod id_tests;

pub use id::*;
pub use month::{MonthKey, MonthKeyError};
