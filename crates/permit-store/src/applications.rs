//! License application intake, reads, and administrative review.

use chrono::Utc;
use permit_core::{
    ApplicationStatus, License, LicenseApplication, NewApplication, Principal, ReviewDecision,
};
use permit_policy::{AccessRequest, Operation, RowScope, Table};
use uuid::Uuid;

use crate::error::StoreError;
use crate::rows;
use crate::Store;

impl Store {
    /// Insert a new application owned by the caller.
    ///
    /// The stored status is always `pending`; the intake payload cannot
    /// carry a status at all, and the insert never binds one from input.
    pub async fn insert_application(
        &self,
        principal: &Principal,
        app: &NewApplication,
    ) -> Result<LicenseApplication, StoreError> {
        self.policy().authorize(&AccessRequest {
            principal,
            table: Table::LicenseApplications,
            operation: Operation::Insert,
            row_owner: principal.user_id,
        })?;
        let owner = Self::require_user_id(principal)?;

        let row = sqlx::query(
            "INSERT INTO license_applications \
             (owner, license_type, business_name, registration_number, business_address, \
              contact_person, contact_email, phone_number, business_type, business_description, \
              status) \
             VALUES ($1, $2, $3, $4, $5, $6, $7, $8, $9, $10, 'pending') \
             RETURNING *",
        )
        .bind(owner)
        .bind(&app.license_type)
        .bind(&app.business_name)
        .bind(&app.registration_number)
        .bind(&app.business_address)
        .bind(&app.contact_person)
        .bind(&app.contact_email)
        .bind(&app.phone_number)
        .bind(&app.business_type)
        .bind(&app.business_description)
        .fetch_one(self.pool())
        .await?;

        let stored = rows::application_from_row(&row)?;
        tracing::info!(
            application = %stored.id,
            owner = %stored.owner,
            license_type = %stored.license_type,
            "application submitted"
        );
        Ok(stored)
    }

    /// List applications within the caller's row scope, optionally
    /// filtered by status.
    pub async fn list_applications(
        &self,
        principal: &Principal,
        status: Option<ApplicationStatus>,
    ) -> Result<Vec<LicenseApplication>, StoreError> {
        let grant = self
            .policy()
            .authorize(&AccessRequest::select(principal, Table::LicenseApplications))?;

        let owner = match grant.row_scope {
            RowScope::All => None,
            RowScope::Owner(owner) => Some(owner),
        };
        let where_sql = match (owner.is_some(), status.is_some()) {
            (false, false) => "",
            (false, true) => " WHERE status = $1",
            (true, false) => " WHERE owner = $1",
            (true, true) => " WHERE owner = $1 AND status = $2",
        };
        let sql =
            format!("SELECT * FROM license_applications{where_sql} ORDER BY created_at DESC");

        let mut query = sqlx::query(&sql);
        if let Some(owner) = owner {
            query = query.bind(owner);
        }
        if let Some(status) = status {
            query = query.bind(status.as_str());
        }

        let records = query.fetch_all(self.pool()).await?;
        records.iter().map(rows::application_from_row).collect()
    }

    /// Fetch a single application within the caller's row scope.
    pub async fn get_application(
        &self,
        principal: &Principal,
        id: Uuid,
    ) -> Result<LicenseApplication, StoreError> {
        let grant = self
            .policy()
            .authorize(&AccessRequest::select(principal, Table::LicenseApplications))?;

        let row = match grant.row_scope {
            RowScope::All => {
                sqlx::query("SELECT * FROM license_applications WHERE id = $1")
                    .bind(id)
                    .fetch_optional(self.pool())
                    .await?
            }
            RowScope::Owner(owner) => {
                sqlx::query("SELECT * FROM license_applications WHERE id = $1 AND owner = $2")
                    .bind(id)
                    .bind(owner)
                    .fetch_optional(self.pool())
                    .await?
            }
        };

        let row = row.ok_or(StoreError::NotFound)?;
        rows::application_from_row(&row)
    }

    /// Apply an administrator's review decision.
    ///
    /// Approval issues the license in the same transaction, so a reviewed
    /// application and its license never diverge. Re-reviewing a decided
    /// application is a conflict.
    pub async fn review_application(
        &self,
        principal: &Principal,
        id: Uuid,
        decision: ReviewDecision,
        notes: Option<&str>,
    ) -> Result<(LicenseApplication, Option<License>), StoreError> {
        self.policy().authorize(&AccessRequest {
            principal,
            table: Table::LicenseApplications,
            operation: Operation::Update,
            row_owner: None,
        })?;
        let reviewer = Self::require_user_id(principal)?;

        let mut tx = self.pool().begin().await?;

        let current = sqlx::query("SELECT * FROM license_applications WHERE id = $1 FOR UPDATE")
            .bind(id)
            .fetch_optional(&mut *tx)
            .await?
            .ok_or(StoreError::NotFound)?;
        let current = rows::application_from_row(&current)?;

        if !current.status.is_open() {
            return Err(StoreError::Conflict(format!(
                "application is already {}",
                current.status
            )));
        }

        let new_status = decision.as_status();
        let row = sqlx::query(
            "UPDATE license_applications \
             SET status = $1, review_notes = $2, reviewed_by = $3, reviewed_at = $4 \
             WHERE id = $5 \
             RETURNING *",
        )
        .bind(new_status.as_str())
        .bind(notes)
        .bind(reviewer)
        .bind(Utc::now())
        .bind(id)
        .fetch_one(&mut *tx)
        .await?;
        let reviewed = rows::application_from_row(&row)?;

        let license = if decision == ReviewDecision::Approved {
            self.policy().authorize(&AccessRequest {
                principal,
                table: Table::Licenses,
                operation: Operation::Insert,
                row_owner: None,
            })?;
            Some(self.issue_license(&mut tx, &reviewed).await?)
        } else {
            None
        };

        tx.commit().await?;

        tracing::info!(
            application = %reviewed.id,
            status = %reviewed.status,
            reviewer = %reviewer,
            issued = license.is_some(),
            "application reviewed"
        );
        Ok((reviewed, license))
    }
}
