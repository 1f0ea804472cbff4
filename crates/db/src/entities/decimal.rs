//! Lossless decimal column type.

use std::fmt;
use std::str::FromStr;

use rust_decimal::Decimal;
use sea_orm::sea_query::{ArrayType, ColumnType, Nullable, Value, ValueType, ValueTypeErr};
use sea_orm::{ColIdx, DbErr, QueryResult, TryGetError, TryGetable};
use serde::{Deserialize, Serialize};

/// A quantity, cost, amount or rate persisted as its canonical decimal text.
///
/// The `SQLite` driver binds `Decimal` through `f64`, which drops digits past
/// the fifteenth significant one. Storing the text keeps every stored value
/// equal to the value the engine computed.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(transparent)]
#[repr(transparent)]
pub struct StoredDecimal(Decimal);

impl StoredDecimal {
    /// Zero.
    pub const ZERO: Self = Self(Decimal::ZERO);

    /// Wraps a decimal.
    #[must_use]
    pub const fn new(value: Decimal) -> Self {
        Self(value)
    }

    /// Returns the decimal value.
    #[must_use]
    pub const fn get(self) -> Decimal {
        self.0
    }
}

impl From<Decimal> for StoredDecimal {
    fn from(value: Decimal) -> Self {
        Self(value)
    }
}

impl From<StoredDecimal> for Decimal {
    fn from(value: StoredDecimal) -> Self {
        value.0
    }
}

impl PartialEq<Decimal> for StoredDecimal {
    fn eq(&self, other: &Decimal) -> bool {
        self.0 == *other
    }
}

impl fmt::Display for StoredDecimal {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        self.0.fmt(f)
    }
}

impl FromStr for StoredDecimal {
    type Err = rust_decimal::Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Decimal::from_str(s).map(Self)
    }
}

impl From<StoredDecimal> for Value {
    fn from(value: StoredDecimal) -> Self {
        Self::String(Some(Box::new(value.0.to_string())))
    }
}

impl TryGetable for StoredDecimal {
    fn try_get_by<I: ColIdx>(res: &QueryResult, index: I) -> Result<Self, TryGetError> {
        let text = String::try_get_by(res, index)?;
        text.parse().map_err(|e: rust_decimal::Error| {
            TryGetError::DbErr(DbErr::Type(format!("invalid decimal '{text}': {e}")))
        })
    }
}

impl ValueType for StoredDecimal {
    fn try_from(v: Value) -> Result<Self, ValueTypeErr> {
        match v {
            Value::String(Some(text)) => text.parse().map_err(|_| ValueTypeErr),
            _ => Err(ValueTypeErr),
        }
    }

    fn type_name() -> String {
        stringify!(StoredDecimal).to_owned()
    }

    fn array_type() -> ArrayType {
        ArrayType::String
    }

    fn column_type() -> ColumnType {
        ColumnType::Text
    }
}

impl Nullable for StoredDecimal {
    fn null() -> Value {
        Value::String(None)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    #[test]
    fn test_value_round_trip_keeps_every_digit() {
        let precise = StoredDecimal::new(dec!(6.6666666666666666666666667));
        let value: Value = precise.into();
        assert_eq!(
            value,
            Value::String(Some(Box::new("6.6666666666666666666666667".to_string())))
        );
        assert_eq!(<StoredDecimal as ValueType>::try_from(value).unwrap(), precise);
    }

    #[test]
    fn test_scale_is_preserved() {
        let stored: StoredDecimal = "12.50".parse().unwrap();
        assert_eq!(stored.to_string(), "12.50");
        assert_eq!(stored, dec!(12.5));
    }

    #[test]
    fn test_rejects_non_text_values() {
        assert!(<StoredDecimal as ValueType>::try_from(Value::Double(Some(1.5))).is_err());
        assert!(<StoredDecimal as ValueType>::try_from(Value::String(None)).is_err());
    }
}
