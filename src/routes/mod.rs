mod chat;
mod chat_stream;
mod health;
mod info;
mod models;
pub mod types;

pub use chat::chat;
pub use chat_stream::chat_stream;
pub use health::health;
pub use info::info;
pub use models::list_models;

use crate::{app_state::AppState, env::Env};
use axum::{
    routing::{get, post},
    Router,
};
use std::sync::Arc;
use tower_http::cors::{AllowOrigin, CorsLayer};

pub const SERVICE_NAME: &str = "AI Chat API";

pub fn router(app: Arc<AppState>) -> Router {
    let cors = cors_layer(&app.env);

    Router::new()
        .route("/", get(info))
        .route("/health", get(health))
        .route("/models", get(list_models))
        .route("/chat", post(chat))
        .route("/chat/stream", post(chat_stream))
        .layer(cors)
        .with_state(app)
}

/// Mirrors the caller's origin, methods and headers, with credentials
/// allowed. `CORS_ORIGINS` narrows the origins.
fn cors_layer(env: &Env) -> CorsLayer {
    let cors = CorsLayer::very_permissive();
    match &env.cors_origins {
        Some(origins) => cors.allow_origin(AllowOrigin::list(origins.iter().cloned())),
        None => cors,
    }
}

#[cfg(test)]
mod tests {
    use crate::test_utils::{gateway_with, send};
    use axum::{body::Body, http::Request};

    fn preflight(origin: &str) -> Request<Body> {
        Request::builder()
            .method("OPTIONS")
            .uri("/chat")
            .header("origin", origin)
            .header("access-control-request-method", "POST")
            .header("access-control-request-headers", "content-type,x-custom")
            .body(Body::empty())
            .unwrap()
    }

    #[tokio::test]
    async fn any_origin_with_credentials_by_default() {
        let app = gateway_with(&[]);
        let resp = tower::ServiceExt::oneshot(app, preflight("http://localhost:5500"))
            .await
            .unwrap();

        let headers = resp.headers();
        assert_eq!(
            headers["access-control-allow-origin"].to_str().unwrap(),
            "http://localhost:5500"
        );
        assert_eq!(
            headers["access-control-allow-credentials"].to_str().unwrap(),
            "true"
        );
        assert_eq!(
            headers["access-control-allow-methods"].to_str().unwrap(),
            "POST"
        );
        assert_eq!(
            headers["access-control-allow-headers"].to_str().unwrap(),
            "content-type,x-custom"
        );
    }

    #[tokio::test]
    async fn configured_origins_restrict_access() {
        let app = gateway_with(&[("CORS_ORIGINS", "https://chat.example")]);
        let resp = tower::ServiceExt::oneshot(app.clone(), preflight("https://evil.example"))
            .await
            .unwrap();
        assert!(resp.headers().get("access-control-allow-origin").is_none());

        let resp = tower::ServiceExt::oneshot(app, preflight("https://chat.example"))
            .await
            .unwrap();
        assert_eq!(
            resp.headers()["access-control-allow-origin"]
                .to_str()
                .unwrap(),
            "https://chat.example"
        );
    }

    #[tokio::test]
    async fn unknown_route_is_not_found() {
        let (status, _) = send(
            gateway_with(&[]),
            Request::builder().uri("/nope").body(Body::empty()).unwrap(),
        )
        .await;
        assert_eq!(status, axum::http::StatusCode::NOT_FOUND);
    }
}
