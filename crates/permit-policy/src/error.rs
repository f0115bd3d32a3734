//! Denial types for policy enforcement.

use crate::request::{Operation, Table};

/// A denied access request.
#[derive(Debug, Clone, thiserror::Error)]
#[error("{message}")]
pub struct AccessDenied {
    /// The kind of denial.
    pub kind: AccessDeniedKind,
    /// Human-readable message.
    pub message: String,
}

impl AccessDenied {
    /// Create a new denial.
    pub fn new(kind: AccessDeniedKind, message: impl Into<String>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// The caller must present a valid session for this table.
    pub fn authentication_required(table: Table) -> Self {
        Self::new(
            AccessDeniedKind::AuthenticationRequired,
            format!("A valid session is required to access '{}'", table),
        )
    }

    /// The table is not accessible to this principal at all.
    pub fn table_access_denied(table: Table, reason: &str) -> Self {
        Self::new(
            AccessDeniedKind::TableAccessDenied,
            format!("Access denied to table '{}': {}", table, reason),
        )
    }

    /// The operation is not permitted on this table for this principal.
    pub fn operation_not_allowed(table: Table, operation: Operation) -> Self {
        Self::new(
            AccessDeniedKind::OperationNotAllowed,
            format!("{} is not allowed on table '{}' for this principal", operation, table),
        )
    }

    /// A write claimed an owner other than the caller.
    pub fn owner_mismatch(table: Table) -> Self {
        Self::new(
            AccessDeniedKind::OwnerMismatch,
            format!("Rows in '{}' can only be written with the caller as owner", table),
        )
    }

    /// Deletes are denied on this table for every principal.
    pub fn delete_not_allowed(table: Table) -> Self {
        Self::new(
            AccessDeniedKind::DeleteNotAllowed,
            format!("Delete operations are not allowed on table '{}'", table),
        )
    }

    /// A column outside the granted column scope was requested.
    pub fn column_not_readable(table: Table, column: &str) -> Self {
        Self::new(
            AccessDeniedKind::ColumnNotReadable,
            format!(
                "Column '{}' in table '{}' is not readable for this principal",
                column, table
            ),
        )
    }
}

/// Categories of denial.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AccessDeniedKind {
    /// No session, and the table is not anonymously accessible.
    AuthenticationRequired,
    /// The principal may not touch the table at all.
    TableAccessDenied,
    /// The principal may touch the table, but not with this operation.
    OperationNotAllowed,
    /// A write claimed another principal's ownership.
    OwnerMismatch,
    /// Deletes are categorically denied on the table.
    DeleteNotAllowed,
    /// A requested column is outside the granted column scope.
    ColumnNotReadable,
}
