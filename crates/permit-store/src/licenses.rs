//! License issuance, owner reads, and the anonymous verification lookup.

use chrono::{Duration, Utc};
use permit_core::numbering::{generate_license_number, integrity_hash};
use permit_core::{License, LicenseApplication, Principal, PublicLicense};
use permit_policy::{AccessRequest, ColumnScope, PUBLIC_LICENSE_COLUMNS, RowScope, Table};
use sqlx::{Postgres, Transaction};

use crate::error::StoreError;
use crate::rows;
use crate::Store;

/// Collision retries for generated license numbers. Five random digits per
/// year make collisions rare; hitting the cap means something is wrong.
const NUMBER_ATTEMPTS: u32 = 8;

impl Store {
    /// Issue the license for an approved application, inside the review
    /// transaction. The caller has already passed the policy check for
    /// license inserts.
    pub(crate) async fn issue_license(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        application: &LicenseApplication,
    ) -> Result<License, StoreError> {
        let issue_date = Utc::now();
        let expiry_date = issue_date + Duration::days(i64::from(self.licensing().validity_days));
        let number = self.free_license_number(tx, issue_date).await?;

        let hash = integrity_hash(
            &number,
            &application.license_type,
            &application.business_name,
            application.owner,
            issue_date,
            expiry_date,
        );

        // The unique constraint still backstops a concurrent issuance that
        // picked the same number between the check and this insert.
        let row = sqlx::query(
            "INSERT INTO licenses \
             (license_number, license_type, business_name, issue_date, expiry_date, \
              status, integrity_hash, owner, application_id) \
             VALUES ($1, $2, $3, $4, $5, 'active', $6, $7, $8) \
             RETURNING *",
        )
        .bind(&number)
        .bind(&application.license_type)
        .bind(&application.business_name)
        .bind(issue_date)
        .bind(expiry_date)
        .bind(&hash)
        .bind(application.owner)
        .bind(application.id)
        .fetch_one(&mut **tx)
        .await
        .map_err(|e| {
            if is_number_collision(&e) {
                StoreError::Conflict(format!("license number '{number}' was issued concurrently"))
            } else {
                StoreError::from(e)
            }
        })?;

        let license = rows::license_from_row(&row)?;
        tracing::info!(
            license = %license.license_number,
            application = %application.id,
            expiry = %license.expiry_date,
            "license issued"
        );
        Ok(license)
    }

    /// Generate a license number not yet present in the table.
    async fn free_license_number(
        &self,
        tx: &mut Transaction<'_, Postgres>,
        issued_at: chrono::DateTime<Utc>,
    ) -> Result<String, StoreError> {
        for _ in 0..NUMBER_ATTEMPTS {
            let number = generate_license_number(&self.licensing().number_prefix, issued_at);
            let taken = sqlx::query_scalar::<_, bool>(
                "SELECT EXISTS (SELECT 1 FROM licenses WHERE license_number = $1)",
            )
            .bind(&number)
            .fetch_one(&mut **tx)
            .await?;

            if !taken {
                return Ok(number);
            }
            tracing::debug!(number = %number, "license number collision, regenerating");
        }

        Err(StoreError::Conflict(
            "could not generate a unique license number".to_string(),
        ))
    }

    /// List licenses within the caller's row scope (owner or admin).
    pub async fn list_licenses(&self, principal: &Principal) -> Result<Vec<License>, StoreError> {
        let grant = self
            .policy()
            .authorize(&AccessRequest::select(principal, Table::Licenses))?;

        // The anonymous grant is column-scoped; full-row listing is for
        // owners and admins only.
        grant.check_columns(Table::Licenses, ["id"])?;

        let records = match grant.row_scope {
            RowScope::All => {
                sqlx::query("SELECT * FROM licenses ORDER BY issue_date DESC")
                    .fetch_all(self.pool())
                    .await?
            }
            RowScope::Owner(owner) => {
                sqlx::query("SELECT * FROM licenses WHERE owner = $1 ORDER BY issue_date DESC")
                    .bind(owner)
                    .fetch_all(self.pool())
                    .await?
            }
        };

        records.iter().map(rows::license_from_row).collect()
    }

    /// Anonymous lookup for public verification.
    ///
    /// Runs under the anonymous principal and builds the SQL projection
    /// from the granted column scope, so the redaction of owner, internal
    /// id, and application linkage happens in the query itself.
    pub async fn find_public_license(
        &self,
        number: &str,
    ) -> Result<Option<PublicLicense>, StoreError> {
        let principal = Principal::anonymous();
        let grant = self
            .policy()
            .authorize(&AccessRequest::select(&principal, Table::Licenses))?;

        let projection = match grant.column_scope {
            ColumnScope::Columns(columns) => columns.join(", "),
            // Never project wider than the public view on this path.
            ColumnScope::All => PUBLIC_LICENSE_COLUMNS.join(", "),
        };

        let sql = format!("SELECT {projection} FROM licenses WHERE license_number = $1");
        let row = sqlx::query(&sql)
            .bind(number)
            .fetch_optional(self.pool())
            .await?;

        row.as_ref().map(rows::public_license_from_row).transpose()
    }
}

/// Unique-violation on the license number constraint.
fn is_number_collision(error: &sqlx::Error) -> bool {
    match error {
        sqlx::Error::Database(db) => {
            db.code().as_deref() == Some("23505")
                && db
                    .constraint()
                    .is_some_and(|c| c.contains("license_number"))
        }
        _ => false,
    }
}
