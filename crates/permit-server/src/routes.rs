//! Route definitions.

use axum::{
    Router, middleware,
    routing::{get, post},
};
use tower_http::trace::TraceLayer;

use crate::auth;
use crate::handlers;
use crate::state::AppState;

/// Create the service router.
pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/healthz", get(handlers::health::healthz))
        .route(
            "/api/verify/{license_number}",
            get(handlers::verify::verify_license),
        )
        .route(
            "/api/applications",
            post(handlers::applications::submit_application)
                .get(handlers::applications::list_applications),
        )
        .route(
            "/api/applications/{id}",
            get(handlers::applications::get_application),
        )
        .route(
            "/api/applications/{id}/review",
            post(handlers::review::review_application),
        )
        .route("/api/licenses", get(handlers::licenses::list_licenses))
        .layer(middleware::from_fn_with_state(
            state.clone(),
            auth::attach_principal,
        ))
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}
