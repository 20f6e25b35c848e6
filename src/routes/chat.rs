use crate::{
    app_state::AppState,
    error::ApiError,
    routes::types::{ChatRequest, ChatResponse},
};
use axum::{extract::rejection::JsonRejection, extract::State, Json};
use std::sync::Arc;

pub async fn chat(
    State(app): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Json<ChatResponse>, ApiError> {
    let Json(req) = payload?;
    tracing::info!("[Chat] {} - {} messages", req.model, req.messages.len());

    let body = req.into_chat_body(false);
    let resp = app
        .provider
        .chat(&body)
        .await
        .and_then(ChatResponse::try_from)
        .map_err(|err| {
            tracing::error!("[Chat] {:#}", err);
            ApiError::ai_service(&err)
        })?;

    Ok(Json(resp))
}
