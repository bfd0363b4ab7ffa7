/// Storage interfaces for Taskdeck
///
/// The auth subsystem consumes persistence only through the narrow traits
/// defined here:
///
/// - [`credential::CredentialStore`]: account lookup by email or refresh
///   token plus single-slot refresh-token updates
/// - [`tasks::TaskStore`]: task/comment operations and the assignee lookup
///   used by the ownership predicate
///
/// Each trait has a Postgres implementation for production and an in-memory
/// implementation (in [`memory`]) used by tests and local development.

pub mod credential;
pub mod memory;
pub mod tasks;

use thiserror::Error;

/// Error type for store operations
#[derive(Debug, Error)]
pub enum StoreError {
    /// Unique constraint violated (duplicate email or refresh token)
    #[error("Duplicate value for unique field: {0}")]
    Duplicate(String),

    /// Backing store failed
    #[error("Storage error: {0}")]
    Database(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if let sqlx::Error::Database(ref db_err) = err {
            if db_err.is_unique_violation() {
                let field = db_err.constraint().unwrap_or("unknown").to_string();
                return StoreError::Duplicate(field);
            }
        }
        StoreError::Database(err.to_string())
    }
}
