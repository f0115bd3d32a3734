//! Store error types.

use permit_policy::AccessDenied;

/// Errors surfaced by the data-access layer.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The policy engine denied the access.
    #[error(transparent)]
    Denied(#[from] AccessDenied),

    /// The row does not exist within the caller's row scope.
    #[error("not found")]
    NotFound,

    /// The operation conflicts with the row's current state
    /// (e.g. reviewing an already-decided application).
    #[error("conflict: {0}")]
    Conflict(String),

    /// A row came back in a shape the domain types reject.
    #[error("invalid row: {0}")]
    InvalidRow(String),

    /// The database operation itself failed.
    #[error("database error: {0}")]
    Database(#[from] sqlx::Error),

    /// Applying migrations at startup failed.
    #[error("migration error: {0}")]
    Migrate(#[from] sqlx::migrate::MigrateError),
}
