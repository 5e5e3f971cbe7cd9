use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Tipo fixo dos itens vindos de contatos HubSpot
pub const HUBSPOT_CONTACT_TYPE: &str = "HubSpot Contact";

/// Representação normalizada de um registro remoto, independente da API de origem
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IntegrationItem {
    pub id: String,
    pub name: String,
    #[serde(rename = "type")]
    pub item_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub creation_time: Option<DateTime<Utc>>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub last_modified_time: Option<DateTime<Utc>>,
}

impl IntegrationItem {
    pub fn new(id: impl Into<String>, name: impl Into<String>, item_type: impl Into<String>) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            item_type: item_type.into(),
            creation_time: None,
            last_modified_time: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_serializes_type_field_and_skips_missing_times() {
        let item = IntegrationItem::new("101", "Jane Doe", HUBSPOT_CONTACT_TYPE);
        let value = serde_json::to_value(&item).unwrap();

        assert_eq!(
            value,
            json!({ "id": "101", "name": "Jane Doe", "type": "HubSpot Contact" })
        );
    }
}
