use tracing::{info, warn, error, debug};

use super::string_utils::mask_secret;

pub fn log_request_received(endpoint: &str, method: &str) {
    info!("Request received: {} {}", method, endpoint);
}

pub fn log_config_loaded(env: &str) {
    info!("Configuration loaded successfully for environment: {}", env);
}

pub fn log_server_startup(port: u16) {
    info!("🚀 HubSpot integration middleware starting on port {}", port);
}

pub fn log_server_ready(addr: &str) {
    info!("✅ Server ready and listening on http://{}", addr);
}

pub fn log_health_check() {
    debug!("Health check requested");
}

pub fn log_oauth_state_stored(org_id: &str, user_id: &str, ttl_seconds: u64) {
    info!("🔐 [OAuth2] State armazenado para {}:{} (expira em {}s)", org_id, user_id, ttl_seconds);
}

pub fn log_token_exchange_failed(status: u16, body: &str) {
    error!("❌ [OAuth2] Token exchange failed: {} - {}", status, body);
}

pub fn log_credentials_stored(org_id: &str, user_id: &str, access_token: Option<&str>) {
    match access_token {
        Some(token) => info!(
            "✅ [OAuth2] Credenciais salvas para {}:{} - token: {}",
            org_id, user_id, mask_secret(token)
        ),
        None => info!("✅ [OAuth2] Credenciais salvas para {}:{}", org_id, user_id),
    }
}

pub fn log_hubspot_api_error(endpoint: &str, status: Option<u16>, error: &str) {
    error!("HubSpot API error: {} - Status: {:?} - Error: {}", endpoint, status, error);
}

pub fn log_validation_error(field: &str, message: &str) {
    warn!("Validation error: {} - {}", field, message);
}

pub fn log_info(message: &str) {
    info!("{}", message);
}

pub fn log_error(message: &str) {
    error!("{}", message);
}

pub fn log_warning(message: &str) {
    warn!("{}", message);
}
