use axum::{Json, extract::State};
use serde_json::json;

use crate::state::AppState;

pub async fn healthz(State(state): State<AppState>) -> Json<serde_json::Value> {
    let db_ok = state.store.ping().await.is_ok();
    Json(json!({ "ok": db_ok, "service": "permit-server" }))
}
