//! Shared Diesel error classification for the repository adapters.
//!
//! Each adapter maps a [`DieselFailure`] onto its own port error so
//! constraint violations surface as typed domain failures (unknown author,
//! duplicate tag) instead of opaque query errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse classification of a failed Diesel operation.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    /// The connection dropped or could not be used.
    Connection(&'static str),
    /// A `UNIQUE` constraint rejected the write.
    UniqueViolation { constraint: Option<String> },
    /// A `REFERENCES` constraint rejected the write.
    ForeignKeyViolation { constraint: Option<String> },
    /// A `CHECK` or `NOT NULL` constraint rejected the write.
    CheckViolation { constraint: Option<String> },
    /// Anything else.
    Query(&'static str),
}

/// Extract a readable message from a pool error.
pub(crate) fn pool_error_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Classify a Diesel error, logging the raw failure at debug level.
pub(crate) fn classify_diesel_error(error: DieselError) -> DieselFailure {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(
            error_type = %std::any::type_name_of_val(&error),
            "diesel operation failed"
        ),
    }

    match error {
        DieselError::NotFound => DieselFailure::Query("record not found"),
        DieselError::QueryBuilderError(_) => DieselFailure::Query("database query error"),
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            DieselFailure::Connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, info) => {
            DieselFailure::UniqueViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        DieselError::DatabaseError(
            DatabaseErrorKind::CheckViolation | DatabaseErrorKind::NotNullViolation,
            info,
        ) => DieselFailure::CheckViolation {
            constraint: info.constraint_name().map(str::to_owned),
        },
        DieselError::DatabaseError(_, _) => DieselFailure::Query("database error"),
        _ => DieselFailure::Query("database error"),
    }
}

/// Human-readable description of a constraint failure.
pub(crate) fn constraint_message(prefix: &str, constraint: Option<&str>) -> String {
    match constraint {
        Some(name) => format!("{prefix} ({name})"),
        None => prefix.to_owned(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct FixtureInfo {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for FixtureInfo {
        fn message(&self) -> &str {
            "constraint violated"
        }

        fn details(&self) -> Option<&str> {
            None
        }

        fn hint(&self) -> Option<&str> {
            None
        }

        fn table_name(&self) -> Option<&str> {
            None
        }

        fn column_name(&self) -> Option<&str> {
            None
        }

        fn constraint_name(&self) -> Option<&str> {
            self.constraint
        }

        fn statement_position(&self) -> Option<i32> {
            None
        }
    }

    fn database_error(kind: DatabaseErrorKind, constraint: Option<&'static str>) -> DieselError {
        DieselError::DatabaseError(kind, Box::new(FixtureInfo { constraint }))
    }

    #[rstest]
    fn closed_connection_is_a_connection_failure() {
        let failure = classify_diesel_error(database_error(
            DatabaseErrorKind::ClosedConnection,
            None,
        ));
        assert_eq!(failure, DieselFailure::Connection("database connection error"));
    }

    #[rstest]
    #[case(
        DatabaseErrorKind::UniqueViolation,
        DieselFailure::UniqueViolation { constraint: Some("tags_name_key".to_owned()) }
    )]
    #[case(
        DatabaseErrorKind::ForeignKeyViolation,
        DieselFailure::ForeignKeyViolation { constraint: Some("tags_name_key".to_owned()) }
    )]
    #[case(
        DatabaseErrorKind::CheckViolation,
        DieselFailure::CheckViolation { constraint: Some("tags_name_key".to_owned()) }
    )]
    fn constraint_violations_keep_the_constraint_name(
        #[case] kind: DatabaseErrorKind,
        #[case] expected: DieselFailure,
    ) {
        assert_eq!(
            classify_diesel_error(database_error(kind, Some("tags_name_key"))),
            expected
        );
    }

    #[rstest]
    fn not_found_is_a_query_failure() {
        assert_eq!(
            classify_diesel_error(DieselError::NotFound),
            DieselFailure::Query("record not found")
        );
    }

    #[rstest]
    fn pool_errors_keep_their_message() {
        assert_eq!(
            pool_error_message(PoolError::checkout("timed out")),
            "timed out"
        );
    }

    #[rstest]
    #[case(Some("posts_title_check"), "post rejected (posts_title_check)")]
    #[case(None, "post rejected")]
    fn constraint_message_names_the_constraint(
        #[case] constraint: Option<&str>,
        #[case] expected: &str,
    ) {
        assert_eq!(constraint_message("post rejected", constraint), expected);
    }
}
