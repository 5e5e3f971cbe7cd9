//! Serviço para carregar contatos do HubSpot
//!
//! Uma única chamada (primeira página) ao endpoint de contatos do CRM,
//! mapeada para `IntegrationItem`. Falhas na busca não derrubam o chamador:
//! são logadas e resultam em lista vazia.

use chrono::{DateTime, Utc};
use reqwest::Client;
use serde::Deserialize;
use tracing::{info, warn};

use crate::models::{IntegrationItem, HUBSPOT_CONTACT_TYPE};
use crate::utils::{truncate_safe, AppError, AppResult};
use crate::utils::logging::*;

const CONTACTS_PATH: &str = "/crm/v3/objects/contacts";
const CONTACT_PROPERTIES: &str = "firstname,lastname,email";

#[derive(Debug, Deserialize)]
struct ContactsResponse {
    #[serde(default)]
    results: Vec<serde_json::Value>,
}

/// Registro de contato lido campo a campo: um registro malformado não
/// invalida a página inteira
fn contact_to_item(record: &serde_json::Value) -> Option<IntegrationItem> {
    let id = match record.get("id") {
        Some(serde_json::Value::String(id)) if !id.is_empty() => id.clone(),
        Some(serde_json::Value::Number(id)) => id.to_string(),
        _ => return None,
    };

    let first_name = contact_property(record, "firstname");
    let last_name = contact_property(record, "lastname");
    let name = format!("{} {}", first_name, last_name).trim().to_string();

    let mut item = IntegrationItem::new(id, name, HUBSPOT_CONTACT_TYPE);
    item.creation_time = parse_timestamp(record.get("createdAt"));
    item.last_modified_time = parse_timestamp(record.get("updatedAt"));
    Some(item)
}

/// Propriedade textual; null, ausente ou outro tipo vira ""
fn contact_property<'a>(record: &'a serde_json::Value, name: &str) -> &'a str {
    record
        .get("properties")
        .and_then(|properties| properties.get(name))
        .and_then(|value| value.as_str())
        .unwrap_or_default()
}

/// Timestamp RFC 3339; qualquer outro formato vira `None`
fn parse_timestamp(value: Option<&serde_json::Value>) -> Option<DateTime<Utc>> {
    let raw = value?.as_str()?;
    DateTime::parse_from_rfc3339(raw)
        .map(|time| time.with_timezone(&Utc))
        .ok()
}

#[derive(Clone)]
pub struct HubSpotService {
    http_client: Client,
    api_base_url: String,
}

impl HubSpotService {
    pub fn new(http_client: Client, api_base_url: impl Into<String>) -> Self {
        Self {
            http_client,
            api_base_url: api_base_url.into().trim_end_matches('/').to_string(),
        }
    }

    /// Carrega os contatos usando as credenciais serializadas
    ///
    /// # Retorno
    /// - `Ok(Vec)`: contatos na ordem da resposta (vazio se a busca falhar)
    /// - `Err`: credenciais ilegíveis ou sem `access_token`
    pub async fn get_items(&self, credentials: &str) -> AppResult<Vec<IntegrationItem>> {
        let credentials: serde_json::Value = serde_json::from_str(credentials)?;
        let access_token = credentials
            .get("access_token")
            .and_then(|v| v.as_str())
            .filter(|token| !token.is_empty())
            .ok_or(AppError::MissingAccessToken)?;

        let url = format!("{}{}", self.api_base_url, CONTACTS_PATH);
        info!("📥 Buscando contatos no HubSpot: GET {}", url);

        let response = match self.http_client
            .get(&url)
            .bearer_auth(access_token)
            .query(&[("properties", CONTACT_PROPERTIES)])
            .send()
            .await
        {
            Ok(response) => response,
            Err(e) => {
                log_hubspot_api_error(CONTACTS_PATH, None, &e.to_string());
                return Ok(Vec::new());
            }
        };

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            log_hubspot_api_error(CONTACTS_PATH, Some(status.as_u16()), &error_text);
            return Ok(Vec::new());
        }

        let contacts: ContactsResponse = match response.json().await {
            Ok(contacts) => contacts,
            Err(e) => {
                warn!("⚠️ Resposta de contatos ilegível: {}", e);
                return Ok(Vec::new());
            }
        };

        let mut items = Vec::with_capacity(contacts.results.len());
        for record in &contacts.results {
            match contact_to_item(record) {
                Some(item) => items.push(item),
                None => warn!("⚠️ Contato sem id ignorado: {}", truncate_safe(&record.to_string(), 120)),
            }
        }

        info!("--- {} contatos HubSpot carregados ---", items.len());
        for item in &items {
            info!("  ├─ {} (ID: {})", item.name, item.id);
        }

        Ok(items)
    }
}
