//! The policy engine: dispatch and decision entry point.

use crate::error::AccessDenied;
use crate::grant::Grant;
use crate::request::{AccessRequest, Table};
use crate::tables;

/// Evaluates access requests against the fixed table policies.
///
/// The engine holds no state: the decision is a pure function of the
/// request, so the same request always yields the same grant or denial.
#[derive(Debug, Clone, Copy, Default)]
pub struct PolicyEngine;

impl PolicyEngine {
    pub fn new() -> Self {
        Self
    }

    /// Authorize a request, returning the row/column scope the data-access
    /// layer must apply, or a typed denial.
    pub fn authorize(&self, request: &AccessRequest) -> Result<Grant, AccessDenied> {
        let decision = match request.table {
            Table::Profiles => tables::profiles(request),
            Table::UserRoles => tables::user_roles(request),
            Table::LicenseApplications => tables::license_applications(request),
            Table::Licenses => tables::licenses(request),
        };

        if let Err(denied) = &decision {
            tracing::debug!(
                table = %request.table,
                operation = %request.operation,
                anonymous = request.principal.is_anonymous(),
                kind = ?denied.kind,
                "access denied"
            );
        }

        decision
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::AccessDeniedKind;
    use crate::grant::{ColumnScope, PUBLIC_LICENSE_COLUMNS, RowScope};
    use crate::request::Operation;
    use permit_core::{AppRole, Principal};
    use uuid::Uuid;

    fn anonymous() -> Principal {
        Principal::anonymous()
    }

    fn user(id: u128) -> Principal {
        Principal::authenticated(Uuid::from_u128(id), vec![AppRole::User])
    }

    fn admin(id: u128) -> Principal {
        Principal::authenticated(Uuid::from_u128(id), vec![AppRole::Admin, AppRole::User])
    }

    fn deny_kind(result: Result<Grant, AccessDenied>) -> AccessDeniedKind {
        result.expect_err("expected a denial").kind
    }

    // ------------------------------------------------------------------
    // licenses: the anonymous verification path
    // ------------------------------------------------------------------

    #[test]
    fn anonymous_license_read_is_column_scoped() {
        let engine = PolicyEngine::new();
        let principal = anonymous();
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();

        assert_eq!(grant.row_scope, RowScope::All);
        assert_eq!(
            grant.column_scope,
            ColumnScope::Columns(PUBLIC_LICENSE_COLUMNS)
        );
    }

    #[test]
    fn anonymous_grant_never_includes_private_license_columns() {
        let engine = PolicyEngine::new();
        let principal = anonymous();
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();

        for column in ["id", "owner", "application_id", "created_at", "updated_at"] {
            assert!(
                !grant.column_scope.contains(column),
                "anonymous grant must not include '{column}'"
            );
        }
        assert!(grant.column_scope.contains("license_number"));
        assert!(grant.column_scope.contains("integrity_hash"));
    }

    #[test]
    fn requesting_private_column_anonymously_is_denied() {
        let engine = PolicyEngine::new();
        let principal = anonymous();
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();

        let err = grant
            .check_columns(Table::Licenses, ["license_number", "owner"])
            .unwrap_err();
        assert_eq!(err.kind, AccessDeniedKind::ColumnNotReadable);
    }

    #[test]
    fn owner_reads_own_licenses_with_all_columns() {
        let engine = PolicyEngine::new();
        let principal = user(7);
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();

        assert_eq!(grant.row_scope, RowScope::Owner(Uuid::from_u128(7)));
        assert_eq!(grant.column_scope, ColumnScope::All);
    }

    #[test]
    fn admin_has_full_license_access() {
        let engine = PolicyEngine::new();
        let principal = admin(1);

        let read = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();
        assert_eq!(read.row_scope, RowScope::All);

        let insert = engine.authorize(&AccessRequest::write(
            &principal,
            Table::Licenses,
            Operation::Insert,
            Uuid::from_u128(9),
        ));
        assert!(insert.is_ok());
    }

    #[test]
    fn non_admin_cannot_issue_or_update_licenses() {
        let engine = PolicyEngine::new();
        let principal = user(7);

        let insert = engine.authorize(&AccessRequest::write(
            &principal,
            Table::Licenses,
            Operation::Insert,
            Uuid::from_u128(7),
        ));
        assert_eq!(deny_kind(insert), AccessDeniedKind::OperationNotAllowed);
    }

    #[test]
    fn nobody_deletes_licenses() {
        let engine = PolicyEngine::new();
        for principal in [anonymous(), user(7), admin(1)] {
            let result = engine.authorize(&AccessRequest {
                principal: &principal,
                table: Table::Licenses,
                operation: Operation::Delete,
                row_owner: None,
            });
            assert_eq!(deny_kind(result), AccessDeniedKind::DeleteNotAllowed);
        }
    }

    // ------------------------------------------------------------------
    // license_applications
    // ------------------------------------------------------------------

    #[test]
    fn anonymous_cannot_read_applications() {
        let engine = PolicyEngine::new();
        let principal = anonymous();
        let result = engine.authorize(&AccessRequest::select(
            &principal,
            Table::LicenseApplications,
        ));
        assert_eq!(deny_kind(result), AccessDeniedKind::AuthenticationRequired);
    }

    #[test]
    fn user_insert_must_claim_self_as_owner() {
        let engine = PolicyEngine::new();
        let principal = user(7);

        let ok = engine.authorize(&AccessRequest::write(
            &principal,
            Table::LicenseApplications,
            Operation::Insert,
            Uuid::from_u128(7),
        ));
        assert!(ok.is_ok());

        let spoofed = engine.authorize(&AccessRequest::write(
            &principal,
            Table::LicenseApplications,
            Operation::Insert,
            Uuid::from_u128(8),
        ));
        assert_eq!(deny_kind(spoofed), AccessDeniedKind::OwnerMismatch);
    }

    #[test]
    fn user_reads_only_own_applications() {
        let engine = PolicyEngine::new();
        let principal = user(7);
        let grant = engine
            .authorize(&AccessRequest::select(
                &principal,
                Table::LicenseApplications,
            ))
            .unwrap();
        assert_eq!(grant.row_scope, RowScope::Owner(Uuid::from_u128(7)));
    }

    #[test]
    fn only_admin_updates_applications() {
        let engine = PolicyEngine::new();

        let principal = user(7);
        let result = engine.authorize(&AccessRequest::write(
            &principal,
            Table::LicenseApplications,
            Operation::Update,
            Uuid::from_u128(7),
        ));
        assert_eq!(deny_kind(result), AccessDeniedKind::OperationNotAllowed);

        let principal = admin(1);
        let grant = engine
            .authorize(&AccessRequest {
                principal: &principal,
                table: Table::LicenseApplications,
                operation: Operation::Update,
                row_owner: None,
            })
            .unwrap();
        assert_eq!(grant.row_scope, RowScope::All);
    }

    #[test]
    fn nobody_deletes_applications() {
        let engine = PolicyEngine::new();
        for principal in [user(7), admin(1)] {
            let result = engine.authorize(&AccessRequest {
                principal: &principal,
                table: Table::LicenseApplications,
                operation: Operation::Delete,
                row_owner: None,
            });
            assert_eq!(deny_kind(result), AccessDeniedKind::DeleteNotAllowed);
        }
    }

    // ------------------------------------------------------------------
    // profiles / user_roles
    // ------------------------------------------------------------------

    #[test]
    fn profile_reads_are_self_scoped_for_users_and_global_for_admins() {
        let engine = PolicyEngine::new();

        let principal = user(7);
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Profiles))
            .unwrap();
        assert_eq!(grant.row_scope, RowScope::Owner(Uuid::from_u128(7)));

        let principal = admin(1);
        let grant = engine
            .authorize(&AccessRequest::select(&principal, Table::Profiles))
            .unwrap();
        assert_eq!(grant.row_scope, RowScope::All);
    }

    #[test]
    fn profile_update_is_self_only() {
        let engine = PolicyEngine::new();
        let principal = user(7);

        let other = engine.authorize(&AccessRequest::write(
            &principal,
            Table::Profiles,
            Operation::Update,
            Uuid::from_u128(8),
        ));
        assert_eq!(deny_kind(other), AccessDeniedKind::OwnerMismatch);
    }

    #[test]
    fn user_roles_are_self_read_admin_managed() {
        let engine = PolicyEngine::new();

        let principal = user(7);
        let read = engine
            .authorize(&AccessRequest::select(&principal, Table::UserRoles))
            .unwrap();
        assert_eq!(read.row_scope, RowScope::Owner(Uuid::from_u128(7)));

        let grant_role = engine.authorize(&AccessRequest::write(
            &principal,
            Table::UserRoles,
            Operation::Insert,
            Uuid::from_u128(7),
        ));
        assert_eq!(
            deny_kind(grant_role),
            AccessDeniedKind::OperationNotAllowed
        );

        let principal = admin(1);
        let manage = engine.authorize(&AccessRequest::write(
            &principal,
            Table::UserRoles,
            Operation::Delete,
            Uuid::from_u128(7),
        ));
        assert!(manage.is_ok());
    }

    #[test]
    fn anonymous_is_denied_everywhere_except_license_reads() {
        let engine = PolicyEngine::new();
        let principal = anonymous();

        for table in [Table::Profiles, Table::UserRoles, Table::LicenseApplications] {
            let result = engine.authorize(&AccessRequest::select(&principal, table));
            assert_eq!(
                deny_kind(result),
                AccessDeniedKind::AuthenticationRequired,
                "anonymous select on {table} must require authentication"
            );
        }
    }

    #[test]
    fn decisions_are_deterministic() {
        let engine = PolicyEngine::new();
        let principal = user(7);
        let a = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();
        let b = engine
            .authorize(&AccessRequest::select(&principal, Table::Licenses))
            .unwrap();
        assert_eq!(a, b);
    }
}
