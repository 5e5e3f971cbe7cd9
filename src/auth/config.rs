//! OAuth2 Configuration
//!
//! Centraliza as configurações do app HubSpot usadas pelo fluxo OAuth2

use serde::{Deserialize, Serialize};

use crate::config::Settings;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct OAuth2Config {
    /// Client ID do app HubSpot
    pub client_id: String,

    /// Client Secret do app HubSpot
    pub client_secret: String,

    /// URL de callback registrada no app (deve bater exatamente)
    pub redirect_uri: String,

    /// Escopos solicitados, separados por espaço
    pub scope: String,

    /// Página de consentimento
    pub authorize_url: String,

    /// Endpoint de troca do authorization code
    pub token_url: String,

    /// Validade do state pendente
    pub state_ttl_seconds: u64,

    /// Validade das credenciais aguardando retirada
    pub credentials_ttl_seconds: u64,
}

impl OAuth2Config {
    pub fn from_settings(settings: &Settings) -> Result<Self, String> {
        let hubspot = &settings.hubspot;

        if hubspot.client_id.trim().is_empty() {
            return Err("HUBSPOT_CLIENT_ID não configurado".to_string());
        }
        if hubspot.client_secret.trim().is_empty() {
            return Err("HUBSPOT_CLIENT_SECRET não configurado".to_string());
        }

        Ok(Self {
            client_id: hubspot.client_id.clone(),
            client_secret: hubspot.client_secret.clone(),
            redirect_uri: hubspot.redirect_uri.clone(),
            scope: hubspot.scope.clone(),
            authorize_url: hubspot.authorize_url.clone(),
            token_url: hubspot.token_url.clone(),
            state_ttl_seconds: settings.cache.state_ttl_seconds,
            credentials_ttl_seconds: settings.cache.credentials_ttl_seconds,
        })
    }

    /// Gerar URL de autorização do HubSpot com o state já codificado
    pub fn authorization_url(&self, encoded_state: &str) -> String {
        format!(
            "{}?client_id={}&redirect_uri={}&scope={}&state={}",
            self.authorize_url,
            urlencoding::encode(&self.client_id),
            urlencoding::encode(&self.redirect_uri),
            urlencoding::encode(&self.scope),
            urlencoding::encode(encoded_state)
        )
    }
}

#[cfg(test)]
pub(crate) fn test_config(base_url: &str) -> OAuth2Config {
    OAuth2Config {
        client_id: "test_client_id".to_string(),
        client_secret: "test_secret".to_string(),
        redirect_uri: "http://localhost:8000/integrations/hubspot/oauth2callback".to_string(),
        scope: "crm.objects.contacts.read".to_string(),
        authorize_url: format!("{}/oauth/authorize", base_url),
        token_url: format!("{}/oauth/v1/token", base_url),
        state_ttl_seconds: 600,
        credentials_ttl_seconds: 3600,
    }
}
