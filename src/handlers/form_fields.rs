//! Extractor de formulário
//!
//! O frontend envia `FormData`, que o navegador codifica como
//! `multipart/form-data`; clientes simples mandam
//! `application/x-www-form-urlencoded`. Os dois chegam no mesmo struct.

use axum::{
    extract::{Form, FromRequest, Multipart, Request},
    http::header::CONTENT_TYPE,
};
use serde::de::DeserializeOwned;
use std::collections::HashMap;

use crate::utils::AppError;

/// Campos de formulário desserializados em `T`, de multipart ou urlencoded
#[derive(Debug, Clone)]
pub struct FormFields<T>(pub T);

#[axum::async_trait]
impl<T, S> FromRequest<S> for FormFields<T>
where
    T: DeserializeOwned,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_multipart = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|value| value.to_str().ok())
            .map(|value| value.starts_with("multipart/form-data"))
            .unwrap_or(false);

        let fields = if is_multipart {
            let multipart = Multipart::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            multipart_fields(multipart).await?
        } else {
            let Form(fields) = Form::<HashMap<String, String>>::from_request(req, state)
                .await
                .map_err(|e| AppError::ValidationError(e.body_text()))?;
            fields
        };

        let object: serde_json::Map<String, serde_json::Value> = fields
            .into_iter()
            .map(|(name, value)| (name, serde_json::Value::String(value)))
            .collect();

        serde_json::from_value(serde_json::Value::Object(object))
            .map(FormFields)
            .map_err(|e| AppError::ValidationError(e.to_string()))
    }
}

/// Lê as partes de texto; arquivos (partes com filename) são ignorados
async fn multipart_fields(mut multipart: Multipart) -> Result<HashMap<String, String>, AppError> {
    let mut fields = HashMap::new();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::ValidationError(e.body_text()))?
    {
        let Some(name) = field.name().map(str::to_string) else {
            continue;
        };
        if field.file_name().is_some() {
            continue;
        }

        let value = field
            .text()
            .await
            .map_err(|e| AppError::ValidationError(e.body_text()))?;
        fields.insert(name, value);
    }

    Ok(fields)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use serde::Deserialize;

    #[derive(Debug, Deserialize)]
    struct Ids {
        user_id: String,
        org_id: String,
    }

    async fn extract(content_type: &str, body: &str) -> Result<Ids, AppError> {
        let req = axum::http::Request::builder()
            .method("POST")
            .uri("/")
            .header(CONTENT_TYPE, content_type)
            .body(Body::from(body.to_string()))
            .unwrap();
        FormFields::<Ids>::from_request(req, &()).await.map(|FormFields(ids)| ids)
    }

    #[tokio::test]
    async fn test_urlencoded_fields() {
        let ids = extract("application/x-www-form-urlencoded", "user_id=TestUser&org_id=TestOrg")
            .await
            .unwrap();
        assert_eq!(ids.user_id, "TestUser");
        assert_eq!(ids.org_id, "TestOrg");
    }

    #[tokio::test]
    async fn test_multipart_fields() {
        let body = "--XyZ\r\n\
            Content-Disposition: form-data; name=\"user_id\"\r\n\r\n\
            TestUser\r\n\
            --XyZ\r\n\
            Content-Disposition: form-data; name=\"org_id\"\r\n\r\n\
            TestOrg\r\n\
            --XyZ--\r\n";

        let ids = extract("multipart/form-data; boundary=XyZ", body).await.unwrap();
        assert_eq!(ids.user_id, "TestUser");
        assert_eq!(ids.org_id, "TestOrg");
    }

    #[tokio::test]
    async fn test_missing_field_is_validation_error() {
        let err = extract("application/x-www-form-urlencoded", "user_id=TestUser").await.unwrap_err();
        assert!(matches!(err, AppError::ValidationError(ref msg) if msg.contains("org_id")));
    }
}
