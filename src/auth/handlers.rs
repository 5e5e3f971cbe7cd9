//! OAuth2 HTTP Handlers
//!
//! Endpoints HTTP chamados pelo frontend e pelo redirect do HubSpot

use axum::{
    extract::{Query, State},
    response::{Html, Json},
};
use serde::Deserialize;
use std::sync::Arc;

use crate::handlers::FormFields;
use crate::utils::AppResult;
use crate::utils::logging::*;
use crate::AppState;
use super::OAuthCallbackParams;

/// Resposta do callback: fecha o popup aberto pelo frontend
pub const CLOSE_POPUP_HTML: &str = "<html><script>window.close();</script></html>";

/// Formulário com a identificação do usuário
#[derive(Debug, Deserialize)]
pub struct UserOrgForm {
    pub user_id: String,
    pub org_id: String,
}

/// POST /integrations/hubspot/authorize
///
/// Retorna a URL de autorização que o frontend abre em popup
pub async fn authorize_hubspot(
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields<UserOrgForm>,
) -> AppResult<Json<String>> {
    log_request_received("/integrations/hubspot/authorize", "POST");

    let auth_url = state.oauth.authorize(&form.user_id, &form.org_id).await?;

    log_info(&format!("↗️  [OAuth2] URL de autorização gerada para {}:{}", form.org_id, form.user_id));

    Ok(Json(auth_url))
}

/// GET /integrations/hubspot/oauth2callback?code=XXX&state=YYY
pub async fn oauth2callback_hubspot(
    State(state): State<Arc<AppState>>,
    Query(params): Query<OAuthCallbackParams>,
) -> AppResult<Html<&'static str>> {
    log_info("📥 [OAuth2] Callback recebido");

    state.oauth.handle_callback(params).await?;

    Ok(Html(CLOSE_POPUP_HTML))
}

/// POST /integrations/hubspot/credentials
///
/// Leitura única: a segunda chamada retorna 400
pub async fn get_hubspot_credentials(
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields<UserOrgForm>,
) -> AppResult<Json<serde_json::Value>> {
    log_request_received("/integrations/hubspot/credentials", "POST");

    let credentials = state.oauth.take_credentials(&form.user_id, &form.org_id).await?;

    Ok(Json(credentials))
}
