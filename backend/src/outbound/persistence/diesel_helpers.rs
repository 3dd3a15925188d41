//! Numeric conversions between domain and database column types.
//!
//! Domain versions and counters are `u32`; the columns are signed. Failed
//! conversions mean a row or request is outside the supported range and are
//! reported as messages the caller wraps in its own query error.

/// Convert a domain version for an `INTEGER` column.
pub(crate) fn version_to_db(version: u32) -> Result<i32, String> {
    i32::try_from(version).map_err(|_| format!("version {version} exceeds column range"))
}

/// Convert a stored `INTEGER` version into the domain type.
pub(crate) fn version_from_db(version: i32) -> Result<u32, String> {
    u32::try_from(version).map_err(|_| format!("stored version {version} is negative"))
}

/// Convert a stored `BIGINT` counter into the domain type.
pub(crate) fn count_from_db(count: i64) -> Result<u32, String> {
    u32::try_from(count).map_err(|_| format!("stored counter {count} is out of range"))
}

/// Next version after `current`, or a message when the counter is exhausted.
pub(crate) fn next_version(current: u32) -> Result<i32, String> {
    current
        .checked_add(1)
        .ok_or_else(|| "version counter exhausted".to_owned())
        .and_then(version_to_db)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[rstest]
    #[case(1, Ok(1))]
    #[case(u32::MAX, Err("version 4294967295 exceeds column range".to_owned()))]
    fn version_to_db_guards_range(#[case] version: u32, #[case] expected: Result<i32, String>) {
        assert_eq!(version_to_db(version), expected);
    }

    #[rstest]
    fn negative_stored_values_are_rejected() {
        assert!(version_from_db(-1).is_err());
        assert!(count_from_db(-5).is_err());
        assert_eq!(count_from_db(100_000), Ok(100_000));
    }

    #[rstest]
    fn next_version_increments_by_one() {
        assert_eq!(next_version(1), Ok(2));
        assert!(next_version(i32::MAX.unsigned_abs()).is_err());
    }
}
