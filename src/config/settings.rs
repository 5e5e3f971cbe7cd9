use serde::{Deserialize, Serialize};
use config::{Config, ConfigError, Environment, File};

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct Settings {
    pub server: ServerSettings,
    pub hubspot: HubSpotSettings,
    pub cache: CacheSettings,
    #[serde(default)]
    pub cors: CorsSettings,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct ServerSettings {
    pub host: String,
    pub port: u16,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct HubSpotSettings {
    pub client_id: String,
    pub client_secret: String,
    pub redirect_uri: String,
    pub scope: String,
    pub authorize_url: String,
    pub token_url: String,
    pub api_base_url: String,
}

#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct CacheSettings {
    pub state_ttl_seconds: u64,
    pub credentials_ttl_seconds: u64,
    pub purge_interval_seconds: u64,
}

#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct CorsSettings {
    #[serde(default)]
    pub allowed_origins: Vec<String>,  // Vazio = qualquer origem
}

impl Settings {
    pub fn new() -> Result<Self, ConfigError> {
        let run_mode = std::env::var("RUN_MODE").unwrap_or_else(|_| "development".into());

        let mut builder = Config::builder()
            // Arquivo de configuração base
            .add_source(File::with_name("config/default").required(false))
            // Arquivo específico do ambiente
            .add_source(File::with_name(&format!("config/{}", run_mode)).required(false));

        // Credenciais do app HubSpot vêm do ambiente
        if let Ok(client_id) = std::env::var("HUBSPOT_CLIENT_ID") {
            builder = builder.set_override("hubspot.client_id", client_id)?;
        }
        if let Ok(client_secret) = std::env::var("HUBSPOT_CLIENT_SECRET") {
            builder = builder.set_override("hubspot.client_secret", client_secret)?;
        }
        if let Ok(redirect_uri) = std::env::var("HUBSPOT_REDIRECT_URI") {
            builder = builder.set_override("hubspot.redirect_uri", redirect_uri)?;
        }
        if let Ok(scope) = std::env::var("HUBSPOT_SCOPES") {
            builder = builder.set_override("hubspot.scope", scope)?;
        }

        builder = builder.add_source(
            Environment::with_prefix("HUBSPOT_INTEGRATION").separator("__"),
        );

        let s = builder.build()?;

        s.try_deserialize()
    }

    /// Endereço de bind; `PORT` (Cloud Run) tem precedência sobre o arquivo
    pub fn bind_address(&self) -> String {
        let port = std::env::var("PORT")
            .ok()
            .and_then(|p| p.parse::<u16>().ok())
            .unwrap_or(self.server.port);
        format!("{}:{}", self.server.host, port)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_deserialize_from_toml_source() {
        let toml = r#"
            [server]
            host = "127.0.0.1"
            port = 9000

            [hubspot]
            client_id = "id"
            client_secret = "secret"
            redirect_uri = "http://localhost:9000/integrations/hubspot/oauth2callback"
            scope = "crm.objects.contacts.read"
            authorize_url = "https://app.hubspot.com/oauth/authorize"
            token_url = "https://api.hubapi.com/oauth/v1/token"
            api_base_url = "https://api.hubapi.com"

            [cache]
            state_ttl_seconds = 600
            credentials_ttl_seconds = 3600
            purge_interval_seconds = 60
        "#;

        let settings: Settings = Config::builder()
            .add_source(File::from_str(toml, config::FileFormat::Toml))
            .build()
            .unwrap()
            .try_deserialize()
            .unwrap();

        assert_eq!(settings.server.port, 9000);
        assert_eq!(settings.hubspot.scope, "crm.objects.contacts.read");
        assert_eq!(settings.cache.credentials_ttl_seconds, 3600);
        // Seção [cors] é opcional
        assert!(settings.cors.allowed_origins.is_empty());
    }
}
