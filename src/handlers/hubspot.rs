use axum::{
    extract::State,
    response::Json,
};
use serde::Deserialize;
use std::sync::Arc;

use super::FormFields;
use crate::models::IntegrationItem;
use crate::utils::AppResult;
use crate::utils::logging::*;
use crate::AppState;

/// Credenciais serializadas como o frontend envia (`JSON.stringify`)
#[derive(Debug, Deserialize)]
pub struct LoadItemsForm {
    pub credentials: String,
}

/// POST /integrations/hubspot/load
pub async fn load_hubspot_items(
    State(state): State<Arc<AppState>>,
    FormFields(form): FormFields<LoadItemsForm>,
) -> AppResult<Json<Vec<IntegrationItem>>> {
    log_request_received("/integrations/hubspot/load", "POST");

    let items = state.hubspot.get_items(&form.credentials).await?;

    Ok(Json(items))
}
