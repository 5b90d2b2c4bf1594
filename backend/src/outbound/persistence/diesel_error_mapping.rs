//! Translation of pool and Diesel failures into feedback repository errors.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use crate::domain::ports::FeedbackRepositoryError;

use super::pool::PoolError;

/// Map pool errors to connection errors.
pub(super) fn map_pool_error(error: PoolError) -> FeedbackRepositoryError {
    FeedbackRepositoryError::connection(error.into_message())
}

/// Map Diesel errors to query or connection errors.
///
/// Database messages are logged at debug level only; the returned message is
/// generic so constraint details never reach callers.
pub(super) fn map_diesel_error(error: DieselError) -> FeedbackRepositoryError {
    match &error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
        }
        _ => debug!(%error, "diesel operation failed"),
    }

    match error {
        DieselError::DatabaseError(DatabaseErrorKind::ClosedConnection, _) => {
            FeedbackRepositoryError::connection("database connection error")
        }
        DieselError::DatabaseError(DatabaseErrorKind::UniqueViolation, _) => {
            FeedbackRepositoryError::query("duplicate feedback id")
        }
        DieselError::DatabaseError(DatabaseErrorKind::CheckViolation, _) => {
            FeedbackRepositoryError::query("feedback record violates a table constraint")
        }
        DieselError::NotFound => FeedbackRepositoryError::query("record not found"),
        _ => FeedbackRepositoryError::query("database error"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn pool_failures_are_connection_errors() {
        let error = map_pool_error(PoolError::checkout("timed out"));
        assert_eq!(error, FeedbackRepositoryError::connection("timed out"));
    }

    #[test]
    fn not_found_is_a_query_error() {
        assert_eq!(
            map_diesel_error(DieselError::NotFound),
            FeedbackRepositoryError::query("record not found")
        );
    }
}
