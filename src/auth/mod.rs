//! # HubSpot OAuth2 Authentication Module
//!
//! Fluxo authorization-code de três pernas com o HubSpot.
//!
//! ## Responsabilidades:
//! - Gerar URL de autorização com state anti-CSRF
//! - Validar o state no callback e trocar o code pelas credenciais
//! - Entregar as credenciais ao frontend (leitura única)
//!
//! ## Estrutura:
//! - `config.rs`: Configurações OAuth2
//! - `state.rs`: Envelope do state (JSON + base64 URL-safe)
//! - `client.rs`: Cliente HTTP do endpoint de token
//! - `flow.rs`: Orquestração do fluxo sobre o cache transitório
//! - `handlers.rs`: Handlers HTTP

pub mod config;
pub mod state;
pub mod client;
pub mod flow;
pub mod handlers;

pub use config::OAuth2Config;
pub use state::OAuthState;
pub use client::OAuth2Client;
pub use flow::{HubSpotOAuth, OAuthCallbackParams};
pub use handlers::{authorize_hubspot, oauth2callback_hubspot, get_hubspot_credentials};
