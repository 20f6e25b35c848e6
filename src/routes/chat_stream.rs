use crate::{
    app_state::AppState,
    error::ApiError,
    routes::types::ChatRequest,
    utils::stream_body::{completion_deltas, get_body_stream},
};
use axum::{
    extract::{rejection::JsonRejection, State},
    http::header,
    response::{IntoResponse, Response},
    Json,
};
use std::sync::Arc;

/// Relays a streamed completion as `data: <text>` frames ending in
/// `data: [DONE]`. Failures before the first byte keep the bare upstream
/// message, unlike `/chat`.
pub async fn chat_stream(
    State(app): State<Arc<AppState>>,
    payload: Result<Json<ChatRequest>, JsonRejection>,
) -> Result<Response, ApiError> {
    let Json(req) = payload?;
    tracing::info!("[Stream] {} - {} messages", req.model, req.messages.len());

    let body = req.into_chat_body(true);
    let resp = app.provider.chat_stream(&body).await.map_err(|err| {
        tracing::error!("[Stream] {:#}", err);
        ApiError::internal(format!("{:#}", err))
    })?;

    let headers = [
        (header::CONTENT_TYPE, "text/event-stream"),
        (header::CACHE_CONTROL, "no-cache"),
    ];
    Ok((headers, get_body_stream(completion_deltas(resp))).into_response())
}
