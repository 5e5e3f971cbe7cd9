//! Fluxo OAuth2 do HubSpot
//!
//! 1. `authorize`: gera state, guarda no cache e monta a URL de consentimento
//! 2. `handle_callback`: valida o state e troca o code pelas credenciais
//! 3. `take_credentials`: entrega as credenciais uma única vez

use serde::Deserialize;
use std::sync::Arc;

use crate::services::cache::KeyValueCache;
use crate::utils::{AppError, AppResult};
use crate::utils::logging::*;
use super::{OAuth2Client, OAuth2Config, OAuthState};

/// Parâmetros de query do callback OAuth2
#[derive(Debug, Default, Deserialize)]
pub struct OAuthCallbackParams {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Erro retornado pelo HubSpot (ex: usuário recusou)
    pub error: Option<String>,
    pub error_description: Option<String>,
}

pub fn state_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_state:{}:{}", org_id, user_id)
}

pub fn credentials_key(org_id: &str, user_id: &str) -> String {
    format!("hubspot_credentials:{}:{}", org_id, user_id)
}

fn require_id(field: &str, value: &str) -> AppResult<()> {
    if value.trim().is_empty() {
        log_validation_error(field, "vazio");
        return Err(AppError::ValidationError(format!("{} must not be empty", field)));
    }
    Ok(())
}

pub struct HubSpotOAuth {
    client: OAuth2Client,
    cache: Arc<dyn KeyValueCache>,
}

impl HubSpotOAuth {
    pub fn new(client: OAuth2Client, cache: Arc<dyn KeyValueCache>) -> Self {
        Self { client, cache }
    }

    pub fn config(&self) -> &OAuth2Config {
        self.client.config()
    }

    /// Gera a URL de autorização e registra o state pendente
    pub async fn authorize(&self, user_id: &str, org_id: &str) -> AppResult<String> {
        require_id("user_id", user_id)?;
        require_id("org_id", org_id)?;

        let config = self.config();
        let pending = OAuthState::new(user_id, org_id);
        let encoded_state = pending.encode()?;

        self.cache
            .put(&state_key(org_id, user_id), pending.to_json()?, config.state_ttl_seconds)
            .await?;
        log_oauth_state_stored(org_id, user_id, config.state_ttl_seconds);

        Ok(config.authorization_url(&encoded_state))
    }

    /// Processa o retorno do HubSpot
    ///
    /// Nenhuma chamada ao endpoint de token acontece antes do nonce conferir.
    pub async fn handle_callback(&self, params: OAuthCallbackParams) -> AppResult<()> {
        if let Some(error) = params.error {
            let description = params.error_description.unwrap_or(error);
            log_error(&format!("❌ [OAuth2] Erro na autorização: {}", description));
            return Err(AppError::AuthorizationDenied(description));
        }

        let encoded_state = params
            .state
            .ok_or_else(|| AppError::ValidationError("Missing state parameter".to_string()))?;
        let code = params
            .code
            .ok_or_else(|| AppError::ValidationError("Missing code parameter".to_string()))?;

        let received = OAuthState::decode(&encoded_state)?;
        let key = state_key(&received.org_id, &received.user_id);

        let saved = match self.cache.get(&key).await? {
            Some(json) => OAuthState::from_json(&json).ok(),
            None => None,
        };

        match saved {
            Some(saved) if saved.matches(&received) => {}
            _ => {
                log_warning(&format!(
                    "🚨 [OAuth2] State não confere para {}:{}",
                    received.org_id, received.user_id
                ));
                return Err(AppError::StateMismatch);
            }
        }

        let (exchange, cleanup) = tokio::join!(
            self.client.exchange_code_for_token(&code),
            self.cache.delete(&key)
        );

        if let Err(e) = cleanup {
            log_warning(&format!("⚠️ [OAuth2] Falha ao remover state pendente: {}", e));
        }

        let body = exchange?;

        let access_token = serde_json::from_str::<serde_json::Value>(&body)
            .ok()
            .and_then(|v| v.get("access_token").and_then(|t| t.as_str()).map(str::to_string));

        self.cache
            .put(
                &credentials_key(&received.org_id, &received.user_id),
                body,
                self.config().credentials_ttl_seconds,
            )
            .await?;
        log_credentials_stored(&received.org_id, &received.user_id, access_token.as_deref());

        Ok(())
    }

    /// Entrega as credenciais e as remove do cache
    pub async fn take_credentials(&self, user_id: &str, org_id: &str) -> AppResult<serde_json::Value> {
        require_id("user_id", user_id)?;
        require_id("org_id", org_id)?;

        let credentials = self
            .cache
            .take(&credentials_key(org_id, user_id))
            .await?
            .ok_or(AppError::CredentialsNotFound)?;

        Ok(serde_json::from_str(&credentials)?)
    }
}
