//! Store error model and sqlx error mapping.
//!
//! SQLx errors are mapped to `StoreError` as follows:
//!
//! | SQLx Error | PostgreSQL Error Code | StoreError | Scenario |
//! |------------|----------------------|------------|----------|
//! | Database (unique violation) | `23505` | `Conflict` | Concurrent insert won the same `(inventory_id, display_id)` slot |
//! | Database (foreign key violation) | `23503` | `NotFound` | `inventory_id` references no inventory row |
//! | Database (other) | Any other | `Database` | Other database errors |
//! | RowNotFound | N/A | `NotFound` | Single-row fetch found nothing |
//! | Other | N/A | `Database` | Network errors, pool failures, etc. |
//!
//! `Timeout` is never produced by the mapping: it is raised by the per-call
//! deadline in [`super::postgres::PgStore`].

use std::time::Duration;

use thiserror::Error;

/// Failure surfaced by a store operation.
///
/// Callers receiving `Database` or `Timeout` must not assume any side effect
/// occurred.
#[derive(Debug, Error)]
pub enum StoreError {
    /// The referenced row does not exist (or is soft-deleted).
    #[error("not found")]
    NotFound,

    /// A uniqueness guarantee could not be met, even after retrying.
    #[error("conflict: {0}")]
    Conflict(String),

    /// The per-operation deadline expired before the store responded.
    #[error("store operation `{op}` timed out after {after:?}")]
    Timeout { op: &'static str, after: Duration },

    /// Connection, query, or transaction failure.
    #[error("database error: {0}")]
    Database(String),
}

/// Map a sqlx error to `StoreError`, keyed on the Postgres error code.
pub(crate) fn map_sqlx_error(operation: &str, err: sqlx::Error) -> StoreError {
    match err {
        sqlx::Error::Database(db_err) => {
            let msg = format!("database error in {}: {}", operation, db_err.message());
            match db_err.code().as_deref() {
                Some("23505") => StoreError::Conflict(msg),
                Some("23503") => StoreError::NotFound,
                _ => StoreError::Database(msg),
            }
        }
        sqlx::Error::RowNotFound => StoreError::NotFound,
        _ => StoreError::Database(format!("sqlx error in {}: {}", operation, err)),
    }
}
