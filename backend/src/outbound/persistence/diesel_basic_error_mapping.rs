//! Shared Diesel error mapping for the repositories.
//!
//! Repositories pass their own port-error constructors so each adapter keeps
//! a typed error while the classification lives in one place.

use diesel::result::{DatabaseErrorKind, Error as DieselError};
use tracing::debug;

use super::pool::PoolError;

/// Map pool failures onto a repository's connection variant.
pub fn map_basic_pool_error<E, C>(error: PoolError, connection: C) -> E
where
    C: FnOnce(String) -> E,
{
    let message = match error {
        PoolError::Checkout { message } | PoolError::Build { message } => message,
    };
    connection(message)
}

/// Classify a Diesel error as connection, constraint or query failure.
///
/// Constraint messages carry the violated constraint name (when Postgres
/// reports one) so callers can tell a bad foreign key from a bad value.
pub fn map_basic_diesel_error<E, Q, C, K>(
    error: DieselError,
    query: Q,
    connection: C,
    constraint: K,
) -> E
where
    Q: FnOnce(String) -> E,
    C: FnOnce(String) -> E,
    K: FnOnce(String) -> E,
{
    match error {
        DieselError::DatabaseError(kind, info) => {
            debug!(?kind, message = info.message(), "diesel operation failed");
            let detail = info
                .constraint_name()
                .map_or_else(|| info.message().to_owned(), str::to_owned);
            match kind {
                DatabaseErrorKind::ClosedConnection => {
                    connection("database connection error".to_owned())
                }
                DatabaseErrorKind::UniqueViolation
                | DatabaseErrorKind::ForeignKeyViolation
                | DatabaseErrorKind::CheckViolation
                | DatabaseErrorKind::NotNullViolation => constraint(detail),
                _ => query("database error".to_owned()),
            }
        }
        DieselError::NotFound => query("record not found".to_owned()),
        DieselError::QueryBuilderError(_) => query("database query error".to_owned()),
        other => {
            debug!(error = %other, "diesel operation failed");
            query("database error".to_owned())
        }
    }
}
