use axum::extract::State;
use axum::Json;
use chrono::Utc;
use serde_json::{json, Value};

use crate::state::AppState;

pub async fn health(State(state): State<AppState>) -> Json<Value> {
    Json(json!({
        "status": "ok",
        "now": Utc::now().to_rfc3339(),
        "upstream_configured": state.config.hostkit_configured(),
        "auth_enabled": state.config.auth_enabled(),
        "properties": state.properties.len(),
    }))
}
