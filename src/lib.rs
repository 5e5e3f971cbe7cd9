// Biblioteca do middleware de integração HubSpot
// Expõe módulos para uso em testes e no binário

pub mod auth;
pub mod config;
pub mod handlers;
pub mod models;
pub mod routes;
pub mod services;
pub mod utils;

use std::sync::Arc;

use services::KeyValueCache;

// AppState é definido aqui para ser compartilhado
#[derive(Clone)]
pub struct AppState {
    pub settings: config::Settings,
    pub oauth: Arc<auth::HubSpotOAuth>,
    pub hubspot: services::HubSpotService,
}

impl AppState {
    /// Monta os serviços a partir das configurações, sobre o cache informado
    pub fn new(settings: config::Settings, cache: Arc<dyn KeyValueCache>) -> Result<Self, String> {
        let oauth_config = auth::OAuth2Config::from_settings(&settings)?;

        // Um único cliente HTTP compartilhado (pool de conexões)
        let http_client = reqwest::Client::new();

        let oauth = auth::HubSpotOAuth::new(
            auth::OAuth2Client::new(oauth_config, http_client.clone()),
            cache,
        );
        let hubspot = services::HubSpotService::new(http_client, settings.hubspot.api_base_url.clone());

        Ok(Self {
            settings,
            oauth: Arc::new(oauth),
            hubspot,
        })
    }
}
