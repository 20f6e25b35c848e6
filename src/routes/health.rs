use crate::routes::{types::HealthResponse, SERVICE_NAME};
use axum::Json;
use chrono::{SecondsFormat, Utc};

/// Always healthy; the upstream is not checked.
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_owned(),
        service: SERVICE_NAME.to_owned(),
        timestamp: Utc::now().to_rfc3339_opts(SecondsFormat::Micros, true),
    })
}
