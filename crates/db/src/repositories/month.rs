//! Integer month-key columns.

use foodcost_shared::types::MonthKey;
use sea_orm::{ColumnTrait, Condition};

use super::error::RepositoryError;

/// Column values of a month key.
#[allow(clippy::cast_possible_wrap)]
pub(crate) const fn to_columns(key: MonthKey) -> (i32, i32) {
    (key.year, key.month as i32)
}

/// Month key from stored column values.
pub(crate) fn from_columns(
    entity: &'static str,
    year: i32,
    month: i32,
) -> Result<MonthKey, RepositoryError> {
    u32::try_from(month)
        .ok()
        .and_then(|m| MonthKey::new(year, m).ok())
        .ok_or_else(|| RepositoryError::CorruptRow {
            entity,
            reason: format!("invalid month {year}-{month}"),
        })
}

/// `(year, month) == key`.
pub(crate) fn in_month<C: ColumnTrait>(year: C, month: C, key: MonthKey) -> Condition {
    let (y, m) = to_columns(key);
    Condition::all().add(year.eq(y)).add(month.eq(m))
}

/// `(year, month) <= key`, compared as integers.
pub(crate) fn through_month<C: ColumnTrait>(year: C, month: C, key: MonthKey) -> Condition {
    let (y, m) = to_columns(key);
    Condition::any()
        .add(year.lt(y))
        .add(Condition::all().add(year.eq(y)).add(month.lte(m)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_column_round_trip() {
        let key = MonthKey::new(2024, 11).unwrap();
        let (y, m) = to_columns(key);
        assert_eq!(from_columns("revenue", y, m).unwrap(), key);
    }

    #[test]
    fn test_corrupt_month() {
        assert!(matches!(
            from_columns("revenue", 2024, 13),
            Err(RepositoryError::CorruptRow { entity: "revenue", .. })
        ));
        assert!(from_columns("revenue", 2024, -1).is_err());
    }
}
