//! Access request types.
//!
//! An [`AccessRequest`] carries everything a policy decision is keyed on:
//! the principal, the target table, the operation, and (for owner-scoped
//! writes) the owner the caller claims for the row.

use permit_core::Principal;
use std::fmt;
use uuid::Uuid;

/// The protected tables.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Table {
    Profiles,
    UserRoles,
    LicenseApplications,
    Licenses,
}

impl Table {
    pub fn as_str(&self) -> &'static str {
        match self {
            Table::Profiles => "profiles",
            Table::UserRoles => "user_roles",
            Table::LicenseApplications => "license_applications",
            Table::Licenses => "licenses",
        }
    }
}

impl fmt::Display for Table {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The operation being authorized.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Select,
    Insert,
    Update,
    Delete,
}

impl fmt::Display for Operation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Operation::Select => write!(f, "SELECT"),
            Operation::Insert => write!(f, "INSERT"),
            Operation::Update => write!(f, "UPDATE"),
            Operation::Delete => write!(f, "DELETE"),
        }
    }
}

/// An authorization request, evaluated purely and statelessly.
#[derive(Debug)]
pub struct AccessRequest<'a> {
    /// The requesting identity.
    pub principal: &'a Principal,
    /// The target table.
    pub table: Table,
    /// The operation.
    pub operation: Operation,
    /// For inserts/updates of owner-scoped rows: the owner the caller
    /// claims for the row. `None` for reads.
    pub row_owner: Option<Uuid>,
}

impl<'a> AccessRequest<'a> {
    /// A read request.
    pub fn select(principal: &'a Principal, table: Table) -> Self {
        Self {
            principal,
            table,
            operation: Operation::Select,
            row_owner: None,
        }
    }

    /// A write request claiming a row owner.
    pub fn write(
        principal: &'a Principal,
        table: Table,
        operation: Operation,
        row_owner: Uuid,
    ) -> Self {
        Self {
            principal,
            table,
            operation,
            row_owner: Some(row_owner),
        }
    }
}
