//! Row-to-domain mapping.

use permit_core::{
    ApplicationStatus, License, LicenseApplication, LicenseStatus, Profile, PublicLicense,
};
use sqlx::Row;
use sqlx::postgres::PgRow;

use crate::error::StoreError;

pub(crate) fn profile_from_row(row: &PgRow) -> Result<Profile, StoreError> {
    Ok(Profile {
        id: row.try_get("id")?,
        email: row.try_get("email")?,
        full_name: row.try_get("full_name")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn application_from_row(row: &PgRow) -> Result<LicenseApplication, StoreError> {
    let status: String = row.try_get("status")?;
    let status = ApplicationStatus::parse(&status)
        .ok_or_else(|| StoreError::InvalidRow(format!("unknown application status '{status}'")))?;

    Ok(LicenseApplication {
        id: row.try_get("id")?,
        owner: row.try_get("owner")?,
        license_type: row.try_get("license_type")?,
        business_name: row.try_get("business_name")?,
        registration_number: row.try_get("registration_number")?,
        business_address: row.try_get("business_address")?,
        contact_person: row.try_get("contact_person")?,
        contact_email: row.try_get("contact_email")?,
        phone_number: row.try_get("phone_number")?,
        business_type: row.try_get("business_type")?,
        business_description: row.try_get("business_description")?,
        status,
        review_notes: row.try_get("review_notes")?,
        reviewed_by: row.try_get("reviewed_by")?,
        reviewed_at: row.try_get("reviewed_at")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

pub(crate) fn license_status_from_str(status: &str) -> Result<LicenseStatus, StoreError> {
    LicenseStatus::parse(status)
        .ok_or_else(|| StoreError::InvalidRow(format!("unknown license status '{status}'")))
}

pub(crate) fn license_from_row(row: &PgRow) -> Result<License, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(License {
        id: row.try_get("id")?,
        license_number: row.try_get("license_number")?,
        license_type: row.try_get("license_type")?,
        business_name: row.try_get("business_name")?,
        issue_date: row.try_get("issue_date")?,
        expiry_date: row.try_get("expiry_date")?,
        status: license_status_from_str(&status)?,
        integrity_hash: row.try_get("integrity_hash")?,
        owner: row.try_get("owner")?,
        application_id: row.try_get("application_id")?,
        created_at: row.try_get("created_at")?,
        updated_at: row.try_get("updated_at")?,
    })
}

/// Mapping for the anonymous verification projection. Only the public
/// columns exist on the row; asking for anything else here would fail.
pub(crate) fn public_license_from_row(row: &PgRow) -> Result<PublicLicense, StoreError> {
    let status: String = row.try_get("status")?;

    Ok(PublicLicense {
        license_number: row.try_get("license_number")?,
        license_type: row.try_get("license_type")?,
        business_name: row.try_get("business_name")?,
        issue_date: row.try_get("issue_date")?,
        expiry_date: row.try_get("expiry_date")?,
        status: license_status_from_str(&status)?,
        integrity_hash: row.try_get("integrity_hash")?,
    })
}
