//! Identity provisioning and role loading.
//!
//! The authentication provider is external; the first time a session's
//! identity reaches this service we provision its profile row and default
//! `user` role. Both inserts are idempotent, so the hook can run on every
//! request without a first-seen check.

use permit_core::{AppRole, Principal, Profile};
use permit_policy::{AccessRequest, RowScope, Table};
use uuid::Uuid;

use crate::error::StoreError;
use crate::rows;
use crate::Store;

impl Store {
    /// Provision the profile and default role for an authenticated
    /// identity. Safe to call on every request.
    pub async fn ensure_provisioned(&self, user_id: Uuid, email: &str) -> Result<(), StoreError> {
        let mut tx = self.pool().begin().await?;

        let inserted = sqlx::query(
            "INSERT INTO profiles (id, email) VALUES ($1, $2) ON CONFLICT (id) DO NOTHING",
        )
        .bind(user_id)
        .bind(email)
        .execute(&mut *tx)
        .await?;

        sqlx::query(
            "INSERT INTO user_roles (user_id, role) VALUES ($1, 'user') \
             ON CONFLICT (user_id, role) DO NOTHING",
        )
        .bind(user_id)
        .execute(&mut *tx)
        .await?;

        tx.commit().await?;

        if inserted.rows_affected() > 0 {
            tracing::info!(user = %user_id, "provisioned new identity");
        }
        Ok(())
    }

    /// Load the roles recorded for a user.
    ///
    /// Self-reads of `user_roles` are always permitted, so the policy
    /// check runs with a role-less principal for the same user.
    pub async fn roles_for(&self, user_id: Uuid) -> Result<Vec<AppRole>, StoreError> {
        let principal = Principal::authenticated(user_id, Vec::new());
        self.policy()
            .authorize(&AccessRequest::select(&principal, Table::UserRoles))?;

        let rows = sqlx::query_scalar::<_, String>(
            "SELECT role::text FROM user_roles WHERE user_id = $1",
        )
        .bind(user_id)
        .fetch_all(self.pool())
        .await?;

        rows.iter()
            .map(|r| {
                AppRole::parse(r)
                    .ok_or_else(|| StoreError::InvalidRow(format!("unknown role '{r}'")))
            })
            .collect()
    }

    /// Resolve a session identity into a request principal: provision on
    /// first sight, then attach the stored roles.
    pub async fn principal_for(&self, user_id: Uuid, email: &str) -> Result<Principal, StoreError> {
        self.ensure_provisioned(user_id, email).await?;
        let roles = self.roles_for(user_id).await?;
        Ok(Principal::authenticated(user_id, roles))
    }

    /// Fetch a profile within the caller's row scope.
    pub async fn get_profile(
        &self,
        principal: &Principal,
        user_id: Uuid,
    ) -> Result<Profile, StoreError> {
        let grant = self
            .policy()
            .authorize(&AccessRequest::select(principal, Table::Profiles))?;

        let row = match grant.row_scope {
            RowScope::All => {
                sqlx::query("SELECT * FROM profiles WHERE id = $1")
                    .bind(user_id)
                    .fetch_optional(self.pool())
                    .await?
            }
            RowScope::Owner(owner) => {
                sqlx::query("SELECT * FROM profiles WHERE id = $1 AND id = $2")
                    .bind(user_id)
                    .bind(owner)
                    .fetch_optional(self.pool())
                    .await?
            }
        };

        let row = row.ok_or(StoreError::NotFound)?;
        rows::profile_from_row(&row)
    }
}
