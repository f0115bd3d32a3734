//! Public license verification.
//!
//! Unauthenticated by design. The response is uniform for malformed and
//! missing numbers — both get `{isValid: false, licenseNumber}` and 200 —
//! so nothing can be learned from error-message shape.

use axum::{
    Json,
    extract::{Path, State},
};
use chrono::{DateTime, Utc};
use permit_core::verify::{VerificationOutcome, verify};
use serde::Serialize;

use crate::error::ApiError;
use crate::state::AppState;

/// Shown in place of a missing integrity hash.
const HASH_UNAVAILABLE: &str = "unavailable";

/// The public verification response.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerificationResponse {
    pub is_valid: bool,
    pub license_number: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license_type: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub business_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub issue_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expiry_date: Option<DateTime<Utc>>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub integrity_hash: Option<String>,
}

impl From<VerificationOutcome> for VerificationResponse {
    fn from(outcome: VerificationOutcome) -> Self {
        match outcome {
            VerificationOutcome::NotVerified { license_number } => Self {
                is_valid: false,
                license_number,
                license_type: None,
                business_name: None,
                status: None,
                issue_date: None,
                expiry_date: None,
                integrity_hash: None,
            },
            VerificationOutcome::Verified(v) => Self {
                is_valid: v.valid,
                license_number: v.license_number,
                license_type: Some(v.license_type),
                business_name: Some(v.business_name),
                status: Some(display_status(v.status)),
                issue_date: Some(v.issue_date),
                expiry_date: Some(v.expiry_date),
                integrity_hash: Some(
                    v.integrity_hash
                        .unwrap_or_else(|| HASH_UNAVAILABLE.to_string()),
                ),
            },
        }
    }
}

fn display_status(status: permit_core::LicenseStatus) -> String {
    use permit_core::LicenseStatus;
    match status {
        LicenseStatus::Active => "Active",
        LicenseStatus::Expired => "Expired",
        LicenseStatus::Suspended => "Suspended",
        LicenseStatus::Revoked => "Revoked",
    }
    .to_string()
}

pub async fn verify_license(
    State(state): State<AppState>,
    Path(license_number): Path<String>,
) -> Result<Json<VerificationResponse>, ApiError> {
    let row = state.store.find_public_license(&license_number).await?;
    let outcome = verify(&license_number, row, Utc::now());

    tracing::debug!(
        number = %license_number,
        valid = outcome.is_valid(),
        "verification lookup"
    );
    Ok(Json(outcome.into()))
}
