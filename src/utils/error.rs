use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum AppError {
    /// Usuário (ou HubSpot) recusou a autorização
    #[error("Authorization denied: {0}")]
    AuthorizationDenied(String),

    /// State OAuth malformado (base64/JSON inválido)
    #[error("Invalid OAuth state: {0}")]
    InvalidState(String),

    /// State ausente no cache, expirado ou nonce divergente
    #[error("State does not match.")]
    StateMismatch,

    #[error("Error retrieving access token [{status}]: {body}")]
    TokenExchange { status: u16, body: String },

    #[error("No HubSpot credentials found.")]
    CredentialsNotFound,

    #[error("Access token not found in credentials.")]
    MissingAccessToken,

    #[error("HubSpot API error: {0}")]
    HubSpotApi(String),

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("JSON error: {0}")]
    JsonError(#[from] serde_json::Error),

    #[error("Validation error: {0}")]
    ValidationError(String),
}

impl AppError {
    pub fn status_code(&self) -> StatusCode {
        match self {
            AppError::AuthorizationDenied(_)
            | AppError::InvalidState(_)
            | AppError::StateMismatch
            | AppError::CredentialsNotFound
            | AppError::MissingAccessToken
            | AppError::JsonError(_)
            | AppError::ValidationError(_) => StatusCode::BAD_REQUEST,
            // Repassa o status devolvido pelo endpoint de token
            AppError::TokenExchange { status, .. } => {
                StatusCode::from_u16(*status).unwrap_or(StatusCode::BAD_GATEWAY)
            }
            AppError::HubSpotApi(_) => StatusCode::BAD_GATEWAY,
            AppError::ConfigError(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    /// Mensagem exposta ao cliente (campo `detail`, lido pelo frontend)
    pub fn detail(&self) -> String {
        match self {
            AppError::AuthorizationDenied(description) => description.clone(),
            other => other.to_string(),
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        let detail = self.detail();

        let body = json!({
            "error": detail,
            "detail": detail,
            "status": status.as_u16()
        });

        (status, axum::Json(body)).into_response()
    }
}

pub type AppResult<T> = Result<T, AppError>;
