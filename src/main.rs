mod app_state;
mod env;
mod error;
mod provider;
mod routes;
mod utils;

#[cfg(test)]
mod test_utils;

use app_state::AppState;
use env::Env;
use eyre::{Result, WrapErr};
use std::sync::Arc;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> Result<()> {
    dotenvy::dotenv().ok();
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    tracing_subscriber::fmt().with_env_filter(filter).init();

    let env = Env::new()?;
    let addr = env.addr;
    let app = Arc::new(AppState::new(env)?);
    let router = routes::router(app);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .wrap_err_with(|| format!("Failed to bind {}", addr))?;
    tracing::info!("Listening on {}", addr);
    axum::serve(listener, router).await?;

    Ok(())
}
