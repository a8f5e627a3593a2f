//! Shared Diesel error classification for the repositories.
//!
//! Repositories care about four outcomes: the connection failed, the query
//! failed, a unique constraint fired, or a foreign key pointed nowhere. The
//! last two carry meaning for the domain (duplicate usernames, like
//! conflicts, unknown references) so they are surfaced separately.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Coarse category of a Diesel failure.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum DieselFailure {
    Connection(&'static str),
    Query(&'static str),
    UniqueViolation,
    ForeignKeyViolation { constraint: Option<String> },
}

/// Extract the message carried by a pool error.
pub(crate) fn pool_message(error: PoolError) -> String {
    match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    }
}

/// Log and classify a Diesel error.
pub(crate) fn classify(error: DieselError) -> DieselFailure {
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
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            DieselFailure::UniqueViolation
        }
        DieselError::DatabaseError(DatabaseErrorKind::ForeignKeyViolation, info) => {
            DieselFailure::ForeignKeyViolation {
                constraint: info.constraint_name().map(str::to_owned),
            }
        }
        _ => DieselFailure::Query("database error"),
    }
}

/// Clamp a SQL `COUNT` into the domain's unsigned count.
pub(crate) fn to_count(raw: i64) -> u64 {
    u64::try_from(raw).unwrap_or_default()
}

#[cfg(test)]
mod tests {
    //! Regression coverage for Diesel error classification.
    use super::*;
    use rstest::rstest;

    #[derive(Debug)]
    struct Info {
        constraint: Option<&'static str>,
    }

    impl diesel::result::DatabaseErrorInformation for Info {
        fn message(&self) -> &str {
            "constraint failed"
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
        DieselError::DatabaseError(kind, Box::new(Info { constraint }))
    }

    #[rstest]
    fn unique_violations_are_distinguished() {
        assert_eq!(
            classify(database_error(DatabaseErrorKind::UniqueViolation, None)),
            DieselFailure::UniqueViolation
        );
    }

    #[rstest]
    fn foreign_key_violations_keep_constraint_name() {
        assert_eq!(
            classify(database_error(
                DatabaseErrorKind::ForeignKeyViolation,
                Some("posts_category_id_fkey")
            )),
            DieselFailure::ForeignKeyViolation {
                constraint: Some("posts_category_id_fkey".to_owned())
            }
        );
    }

    #[rstest]
    #[case(DieselError::NotFound, DieselFailure::Query("record not found"))]
    #[case(
        database_error(DatabaseErrorKind::ClosedConnection, None),
        DieselFailure::Connection("database connection error")
    )]
    fn other_errors_map_to_query_or_connection(
        #[case] error: DieselError,
        #[case] expected: DieselFailure,
    ) {
        assert_eq!(classify(error), expected);
    }

    #[rstest]
    #[case(3, 3)]
    #[case(-1, 0)]
    fn counts_never_go_negative(#[case] raw: i64, #[case] expected: u64) {
        assert_eq!(to_count(raw), expected);
    }

    #[rstest]
    fn pool_errors_yield_their_message() {
        assert_eq!(pool_message(PoolError::checkout("timed out")), "timed out");
    }
}
