use crate::{app_state::AppState, routes::types::ModelsResponse};
use axum::{extract::State, Json};
use std::sync::Arc;

/// Served whenever the upstream catalog cannot be fetched.
pub const FALLBACK_MODELS: [&str; 4] = ["gpt-3.5-turbo", "gpt-4", "llama2", "mistral"];

pub async fn list_models(State(app): State<Arc<AppState>>) -> Json<ModelsResponse> {
    let models = match app.provider.list_models().await {
        Ok(models) => models,
        Err(err) => {
            tracing::warn!("[Models] Falling back to defaults: {:#}", err);
            FALLBACK_MODELS.iter().map(|m| m.to_string()).collect()
        }
    };
    Json(ModelsResponse { models })
}
