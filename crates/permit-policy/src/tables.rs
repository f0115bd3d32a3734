//! Per-table policy rules.
//!
//! One function per protected table, each mapping (principal, operation,
//! claimed owner) to a grant or a denial. The admin role is checked before
//! the owner path so an admin's own rows never shadow the broader grant.

use permit_core::Principal;
use uuid::Uuid;

use crate::error::AccessDenied;
use crate::grant::{Grant, PUBLIC_LICENSE_COLUMNS};
use crate::request::{AccessRequest, Operation, Table};

/// Resolve the caller's user id, or deny with AuthenticationRequired.
fn require_user(principal: &Principal, table: Table) -> Result<Uuid, AccessDenied> {
    principal
        .user_id
        .ok_or_else(|| AccessDenied::authentication_required(table))
}

/// Owner-claimed writes must name the caller itself.
fn require_self_owner(request: &AccessRequest, user_id: Uuid) -> Result<(), AccessDenied> {
    match request.row_owner {
        Some(owner) if owner == user_id => Ok(()),
        _ => Err(AccessDenied::owner_mismatch(request.table)),
    }
}

/// profiles: self read/update; admin read-all. Never deleted.
pub(crate) fn profiles(request: &AccessRequest) -> Result<Grant, AccessDenied> {
    let user_id = require_user(request.principal, request.table)?;

    match request.operation {
        Operation::Select => {
            if request.principal.is_admin() {
                Ok(Grant::all())
            } else {
                Ok(Grant::owner(user_id))
            }
        }
        Operation::Update => {
            require_self_owner(request, user_id)?;
            Ok(Grant::owner(user_id))
        }
        Operation::Insert => {
            // Provisioned by the identity hook, always for the caller itself.
            require_self_owner(request, user_id)?;
            Ok(Grant::owner(user_id))
        }
        Operation::Delete => Err(AccessDenied::delete_not_allowed(request.table)),
    }
}

/// user_roles: self read; admin manage-all.
pub(crate) fn user_roles(request: &AccessRequest) -> Result<Grant, AccessDenied> {
    let user_id = require_user(request.principal, request.table)?;

    if request.principal.is_admin() {
        return Ok(Grant::all());
    }

    match request.operation {
        Operation::Select => Ok(Grant::owner(user_id)),
        op => Err(AccessDenied::operation_not_allowed(request.table, op)),
    }
}

/// license_applications: owner inserts (owner = self) and reads own rows;
/// admin reads/updates all rows; nobody deletes.
pub(crate) fn license_applications(request: &AccessRequest) -> Result<Grant, AccessDenied> {
    let user_id = require_user(request.principal, request.table)?;

    match request.operation {
        Operation::Select => {
            if request.principal.is_admin() {
                Ok(Grant::all())
            } else {
                Ok(Grant::owner(user_id))
            }
        }
        Operation::Insert => {
            require_self_owner(request, user_id)?;
            Ok(Grant::owner(user_id))
        }
        Operation::Update => {
            if request.principal.is_admin() {
                Ok(Grant::all())
            } else {
                Err(AccessDenied::operation_not_allowed(
                    request.table,
                    request.operation,
                ))
            }
        }
        Operation::Delete => Err(AccessDenied::delete_not_allowed(request.table)),
    }
}

/// licenses: anonymous reads are allowed but column-scoped to the public
/// verification fields; owners read their own full rows; admins have full
/// read/insert/update. Nobody deletes.
///
/// The original policy granted anonymous callers unrestricted row access
/// and trusted the client to project safe fields; the column scope here is
/// the corrected behavior.
pub(crate) fn licenses(request: &AccessRequest) -> Result<Grant, AccessDenied> {
    match request.operation {
        Operation::Select => {
            if request.principal.is_admin() {
                Ok(Grant::all())
            } else if let Some(user_id) = request.principal.user_id {
                Ok(Grant::owner(user_id))
            } else {
                Ok(Grant::columns(PUBLIC_LICENSE_COLUMNS))
            }
        }
        Operation::Insert | Operation::Update => {
            require_user(request.principal, request.table)?;
            if request.principal.is_admin() {
                Ok(Grant::all())
            } else {
                Err(AccessDenied::operation_not_allowed(
                    request.table,
                    request.operation,
                ))
            }
        }
        Operation::Delete => Err(AccessDenied::delete_not_allowed(request.table)),
    }
}
