//! Administrative review decisions.

use axum::{
    Extension, Json,
    extract::{Path, State},
};
use permit_core::{License, LicenseApplication, Principal, ReviewDecision};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

#[derive(Debug, Deserialize)]
pub struct ReviewRequest {
    pub decision: ReviewDecision,
    #[serde(default)]
    pub notes: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct ReviewResponse {
    pub application: LicenseApplication,
    /// Present only when the decision was an approval.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub license: Option<License>,
}

/// Apply a review decision; approval issues the license atomically.
/// Non-admin callers are rejected by the policy engine.
pub async fn review_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
    Json(payload): Json<ReviewRequest>,
) -> Result<Json<ReviewResponse>, ApiError> {
    if principal.is_anonymous() {
        return Err(ApiError::AuthenticationRequired);
    }

    let (application, license) = state
        .store
        .review_application(&principal, id, payload.decision, payload.notes.as_deref())
        .await?;

    Ok(Json(ReviewResponse {
        application,
        license,
    }))
}
