//! Owner and admin license reads.

use axum::{Extension, Json, extract::State};
use permit_core::{License, Principal};

use crate::error::ApiError;
use crate::state::AppState;

/// List licenses: own rows for users, all rows for admins.
pub async fn list_licenses(
    State(state): State<AppState>,
    Extension(principal): Extension<Principal>,
) -> Result<Json<Vec<License>>, ApiError> {
    if principal.is_anonymous() {
        return Err(ApiError::AuthenticationRequired);
    }

    let licenses = state.store.list_licenses(&principal).await?;
    Ok(Json(licenses))
}
