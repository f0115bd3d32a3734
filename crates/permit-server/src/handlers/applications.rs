//! Application intake and owner/admin reads.

use axum::{
    Json,
    extract::{Path, Query, State},
    http::StatusCode,
};
use axum::Extension;
use permit_core::{ApplicationStatus, LicenseApplication, NewApplication, Principal};
use permit_policy::FieldViolation;
use serde::Deserialize;
use uuid::Uuid;

use crate::error::ApiError;
use crate::state::AppState;

/// Submit a license application. Requires a session; the stored row is
/// always `pending`.
pub async fn submit_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Json(payload): Json<NewApplication>,
) -> Result<(StatusCode, Json<LicenseApplication>), ApiError> {
    if principal.is_anonymous() {
        return Err(ApiError::AuthenticationRequired);
    }

    state.intake_rules.validate(&payload)?;

    let stored = state
        .store
        .insert_application(&principal, &payload)
        .await?;
    Ok((StatusCode::CREATED, Json(stored)))
}

#[derive(Debug, Deserialize)]
pub struct ListQuery {
    pub status: Option<String>,
}

/// List applications: own rows for users, all rows for admins.
pub async fn list_applications(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Query(query): Query<ListQuery>,
) -> Result<Json<Vec<LicenseApplication>>, ApiError> {
    if principal.is_anonymous() {
        return Err(ApiError::AuthenticationRequired);
    }

    let status = match query.status.as_deref() {
        None => None,
        Some(s) => Some(ApplicationStatus::parse(s).ok_or_else(|| {
            ApiError::ValidationFailed(vec![FieldViolation {
                field: "status",
                message: format!("unknown application status '{s}'"),
            }])
        })?),
    };

    let applications = state.store.list_applications(&principal, status).await?;
    Ok(Json(applications))
}

/// Fetch one application within the caller's row scope.
pub async fn get_application(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
    Path(id): Path<Uuid>,
) -> Result<Json<LicenseApplication>, ApiError> {
    if principal.is_anonymous() {
        return Err(ApiError::AuthenticationRequired);
    }

    let application = state.store.get_application(&principal, id).await?;
    Ok(Json(application))
}
