use axum::{
    http::HeaderValue,
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{Any, CorsLayer};
use tower_http::trace::TraceLayer;

use crate::auth::{authorize_hubspot, get_hubspot_credentials, oauth2callback_hubspot};
use crate::config::CorsSettings;
use crate::handlers::{health_check, load_hubspot_items};
use crate::utils::logging::*;
use crate::AppState;

pub fn create_router(state: Arc<AppState>) -> Router {
    let cors = cors_layer(&state.settings.cors);

    Router::new()
        .route("/health", get(health_check))
        .route("/integrations/hubspot/authorize", post(authorize_hubspot))
        .route("/integrations/hubspot/oauth2callback", get(oauth2callback_hubspot))
        .route("/integrations/hubspot/credentials", post(get_hubspot_credentials))
        .route("/integrations/hubspot/load", post(load_hubspot_items))
        .layer(cors)
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// CORS para o frontend (popup roda em outra origem)
fn cors_layer(settings: &CorsSettings) -> CorsLayer {
    let layer = CorsLayer::new().allow_methods(Any).allow_headers(Any);

    if settings.allowed_origins.is_empty() {
        return layer.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = settings
        .allowed_origins
        .iter()
        .filter_map(|origin| match origin.parse::<HeaderValue>() {
            Ok(value) => Some(value),
            Err(_) => {
                log_warning(&format!("⚠️ Origem CORS inválida ignorada: {}", origin));
                None
            }
        })
        .collect();

    layer.allow_origin(origins)
}
