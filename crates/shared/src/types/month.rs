//! Integer month keys.
//!
//! Every month-bucketed figure (ledger rollups, revenues, expenses) is keyed by
//! a `(year, month)` pair derived once from a date at write time and compared
//! as integers, never as formatted strings.

use chrono::{Datelike, NaiveDate};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Errors produced when building a month key.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum MonthKeyError {
    /// Month number outside 1..=12.
    #[error("Invalid month number: {0}")]
    InvalidMonth(u32),

    /// Text is not in `YYYY-MM` form.
    #[error("Invalid month key '{0}', expected YYYY-MM")]
    InvalidFormat(String),
}

/// A calendar month, ordered chronologically.
///
/// Deserialization goes through [`MonthKey::new`], so a stored or transmitted
/// key always carries a month in 1..=12.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "MonthKeyFields")]
pub struct MonthKey {
    /// Calendar year.
    pub year: i32,
    /// Month number, 1-based.
    pub month: u32,
}

#[derive(Deserialize)]
struct MonthKeyFields {
    year: i32,
    month: u32,
}

impl TryFrom<MonthKeyFields> for MonthKey {
    type Error = MonthKeyError;

    fn try_from(fields: MonthKeyFields) -> Result<Self, Self::Error> {
        Self::new(fields.year, fields.month)
    }
}

impl MonthKey {
    /// Creates a month key, validating the month number.
    ///
    /// # Errors
    ///
    /// Returns `MonthKeyError::InvalidMonth` if `month` is not in 1..=12.
    pub fn new(year: i32, month: u32) -> Result<Self, MonthKeyError> {
        if !(1..=12).contains(&month) {
            return Err(MonthKeyError::InvalidMonth(month));
        }
        Ok(Self { year, month })
    }

    /// Derives the month key of a date.
    #[must_use]
    pub fn from_date(date: NaiveDate) -> Self {
        Self {
            year: date.year(),
            month: date.month(),
        }
    }

    /// The month immediately before this one.
    #[must_use]
    pub const fn previous(self) -> Self {
        if self.month == 1 {
            Self {
                year: self.year - 1,
                month: 12,
            }
        } else {
            Self {
                year: self.year,
                month: self.month - 1,
            }
        }
    }

    /// The month immediately after this one.
    #[must_use]
    pub const fn next(self) -> Self {
        if self.month == 12 {
            Self {
                year: self.year + 1,
                month: 1,
            }
        } else {
            Self {
                year: self.year,
                month: self.month + 1,
            }
        }
    }

    /// First calendar day of the month.
    #[must_use]
    pub fn first_day(self) -> NaiveDate {
        NaiveDate::from_ymd_opt(self.year, self.month, 1).unwrap_or(NaiveDate::MIN)
    }

    /// Last calendar day of the month.
    #[must_use]
    pub fn last_day(self) -> NaiveDate {
        self.next()
            .first_day()
            .pred_opt()
            .unwrap_or_else(|| self.first_day())
    }

    /// Whether `date` falls inside this month.
    #[must_use]
    pub fn contains(self, date: NaiveDate) -> bool {
        Self::from_date(date) == self
    }

    /// Months from `self` through `end`, inclusive. Empty when `end < self`.
    #[must_use]
    pub fn through(self, end: Self) -> Vec<Self> {
        let mut months = Vec::new();
        let mut current = self;
        while current <= end {
            months.push(current);
            current = current.next();
        }
        months
    }
}

impl std::fmt::Display for MonthKey {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{:04}-{:02}", self.year, self.month)
    }
}

impl std::str::FromStr for MonthKey {
    type Err = MonthKeyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (year, month) = s
            .trim()
            .split_once('-')
            .ok_or_else(|| MonthKeyError::InvalidFormat(s.to_string()))?;
        let year = year
            .parse::<i32>()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        let month = month
            .parse::<u32>()
            .map_err(|_| MonthKeyError::InvalidFormat(s.to_string()))?;
        Self::new(year, month)
    }
}
