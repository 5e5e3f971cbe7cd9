//! OAuth2 HTTP Client
//!
//! Cliente HTTP isolado para o endpoint de token do HubSpot

use reqwest::Client;
use crate::utils::{AppError, AppResult};
use crate::utils::logging::*;
use crate::utils::truncate_safe;
use super::OAuth2Config;

/// Cliente OAuth2 para HubSpot
#[derive(Clone)]
pub struct OAuth2Client {
    config: OAuth2Config,
    http_client: Client,
}

impl OAuth2Client {
    pub fn new(config: OAuth2Config, http_client: Client) -> Self {
        Self { config, http_client }
    }

    pub fn config(&self) -> &OAuth2Config {
        &self.config
    }

    /// Trocar authorization code pelas credenciais
    ///
    /// # Retorno
    /// - `Ok(String)`: corpo JSON da resposta, sem alterações
    /// - `Err(AppError::TokenExchange)`: HubSpot respondeu com status de erro
    pub async fn exchange_code_for_token(&self, code: &str) -> AppResult<String> {
        let url = &self.config.token_url;

        log_info(&format!("📤 [OAuth2] POST {} - client_id: {}, code: {}...",
            url, &self.config.client_id, truncate_safe(code, 6)));

        let form = [
            ("grant_type", "authorization_code"),
            ("client_id", self.config.client_id.as_str()),
            ("client_secret", self.config.client_secret.as_str()),
            ("redirect_uri", self.config.redirect_uri.as_str()),
            ("code", code),
        ];

        let response = self.http_client
            .post(url)
            .form(&form)
            .send()
            .await
            .map_err(|e| AppError::HubSpotApi(format!("Falha ao conectar com HubSpot OAuth API: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let body = response.text().await.unwrap_or_else(|_| "Unknown error".to_string());
            log_token_exchange_failed(status.as_u16(), &body);
            return Err(AppError::TokenExchange {
                status: status.as_u16(),
                body,
            });
        }

        let body = response
            .text()
            .await
            .map_err(|e| AppError::HubSpotApi(format!("Falha ao ler resposta do token: {}", e)))?;

        // Só conferimos que é JSON; o blob é guardado como veio
        serde_json::from_str::<serde_json::Value>(&body)
            .map_err(|e| AppError::HubSpotApi(format!("Falha ao parsear resposta do token: {}", e)))?;

        log_info("✅ [OAuth2] Credenciais obtidas do HubSpot");

        Ok(body)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::auth::config::test_config;
    use httpmock::prelude::*;
    use serde_json::json;

    #[tokio::test]
    async fn test_exchange_posts_form_and_returns_raw_body() {
        let server = MockServer::start_async().await;
        let mock = server.mock_async(|when, then| {
            when.method(POST)
                .path("/oauth/v1/token")
                .body_contains("grant_type=authorization_code")
                .body_contains("client_id=test_client_id")
                .body_contains("client_secret=test_secret")
                .body_contains("code=auth-code-123");
            then.status(200)
                .header("content-type", "application/json")
                .json_body(json!({
                    "access_token": "CJSP5qf1KhIDAQAB",
                    "refresh_token": "6f18f21e-a743-4509-b7fd-1a5e632fffa1",
                    "expires_in": 1800
                }));
        }).await;

        let client = OAuth2Client::new(test_config(&server.base_url()), Client::new());
        let body = client.exchange_code_for_token("auth-code-123").await.unwrap();

        mock.assert_async().await;
        let value: serde_json::Value = serde_json::from_str(&body).unwrap();
        assert_eq!(value["access_token"], "CJSP5qf1KhIDAQAB");
        assert_eq!(value["expires_in"], 1800);
    }

    #[tokio::test]
    async fn test_exchange_failure_carries_status_and_body() {
        let server = MockServer::start_async().await;
        server.mock_async(|when, then| {
            when.method(POST).path("/oauth/v1/token");
            then.status(400).body(r#"{"status":"BAD_AUTH_CODE","message":"missing or unknown auth code"}"#);
        }).await;

        let client = OAuth2Client::new(test_config(&server.base_url()), Client::new());
        let err = client.exchange_code_for_token("expired").await.unwrap_err();

        match err {
            AppError::TokenExchange { status, body } => {
                assert_eq!(status, 400);
                assert!(body.contains("BAD_AUTH_CODE"));
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }

    #[tokio::test]
    async fn test_truncated_success_body_is_reported_as_read_failure() {
        use tokio::io::{AsyncReadExt, AsyncWriteExt};

        // Servidor que anuncia 200 mas fecha a conexão antes do corpo completo
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            let (mut socket, _) = listener.accept().await.unwrap();
            let mut buf = [0u8; 4096];
            let _ = socket.read(&mut buf).await;
            let _ = socket
                .write_all(b"HTTP/1.1 200 OK\r\ncontent-type: application/json\r\ncontent-length: 500\r\n\r\n{\"access_tok")
                .await;
            let _ = socket.shutdown().await;
        });

        let client = OAuth2Client::new(test_config(&format!("http://{}", addr)), Client::new());
        let err = client.exchange_code_for_token("auth-code-123").await.unwrap_err();

        match err {
            AppError::HubSpotApi(message) => {
                assert!(message.starts_with("Falha ao ler resposta do token"), "{}", message);
            }
            other => panic!("erro inesperado: {:?}", other),
        }
    }
}
