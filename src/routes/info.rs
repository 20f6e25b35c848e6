use crate::routes::SERVICE_NAME;
use axum::Json;
use serde_json::{json, Value};

pub async fn info() -> Json<Value> {
    Json(json!({
        "message": SERVICE_NAME,
        "version": env!("CARGO_PKG_VERSION"),
        "endpoints": {
            "chat": "POST /chat",
            "chat_stream": "POST /chat/stream",
            "models": "GET /models",
            "health": "GET /health"
        }
    }))
}
