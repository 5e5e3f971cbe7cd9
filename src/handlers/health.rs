use axum::{
    extract::State,
    response::Json,
};
use serde_json::{json, Value};
use std::sync::Arc;

use crate::utils::logging::*;
use crate::AppState;

pub async fn health_check(State(state): State<Arc<AppState>>) -> Json<Value> {
    log_health_check();

    Json(json!({
        "status": "healthy",
        "service": "hubspot-integration-middleware",
        "version": env!("CARGO_PKG_VERSION"),
        "timestamp": chrono::Utc::now().to_rfc3339(),
        "hubspot": {
            "client_id_configured": !state.oauth.config().client_id.is_empty(),
            "redirect_uri": state.oauth.config().redirect_uri,
            "scope": state.oauth.config().scope
        }
    }))
}
