//! Grants: the allow side of a policy decision.

use crate::error::AccessDenied;
use crate::request::Table;
use uuid::Uuid;

/// Columns of `licenses` observable through the anonymous verification
/// path. Everything else on the row — internal id, owner, application
/// linkage, timestamps — stays private. The store builds its SQL
/// projection from this list, so redaction holds even if a caller above
/// it asks for more.
pub const PUBLIC_LICENSE_COLUMNS: &[&str] = &[
    "license_number",
    "license_type",
    "business_name",
    "issue_date",
    "expiry_date",
    "status",
    "integrity_hash",
];

/// Which rows of the table the grant covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RowScope {
    /// Every row.
    All,
    /// Only rows owned by the given user.
    Owner(Uuid),
}

/// Which columns of the table the grant covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnScope {
    /// Every column.
    All,
    /// Only the named columns.
    Columns(&'static [&'static str]),
}

impl ColumnScope {
    /// Check if a column is included in the scope.
    pub fn contains(&self, column: &str) -> bool {
        match self {
            ColumnScope::All => true,
            ColumnScope::Columns(cols) => cols.iter().any(|c| *c == column),
        }
    }
}

/// An allowed access, with the row and column scope the data-access layer
/// must apply in the query itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Grant {
    pub row_scope: RowScope,
    pub column_scope: ColumnScope,
}

impl Grant {
    /// Full access to every row and column.
    pub fn all() -> Self {
        Self {
            row_scope: RowScope::All,
            column_scope: ColumnScope::All,
        }
    }

    /// Full-column access to the caller's own rows.
    pub fn owner(user_id: Uuid) -> Self {
        Self {
            row_scope: RowScope::Owner(user_id),
            column_scope: ColumnScope::All,
        }
    }

    /// All rows, restricted to the named columns.
    pub fn columns(columns: &'static [&'static str]) -> Self {
        Self {
            row_scope: RowScope::All,
            column_scope: ColumnScope::Columns(columns),
        }
    }

    /// Verify that every requested column is inside the granted scope.
    pub fn check_columns<'c>(
        &self,
        table: Table,
        requested: impl IntoIterator<Item = &'c str>,
    ) -> Result<(), AccessDenied> {
        for column in requested {
            if !self.column_scope.contains(column) {
                return Err(AccessDenied::column_not_readable(table, column));
            }
        }
        Ok(())
    }
}
