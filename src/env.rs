use axum::http::HeaderValue;
use eyre::{Result, WrapErr};
use std::net::SocketAddr;
use url::Url;

const DEFAULT_API_KEY: &str = "dummy-key";
const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
const DEFAULT_HOST: &str = "0.0.0.0";
const DEFAULT_PORT: &str = "8000";

pub struct Env {
    pub api_key: String,
    pub base_url: Url,
    pub addr: SocketAddr,
    /// `None` allows every origin.
    pub cors_origins: Option<Vec<HeaderValue>>,
}

// Hand-written so the api key never reaches the logs.
impl std::fmt::Debug for Env {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Env")
            .field("base_url", &self.base_url.as_str())
            .field("addr", &self.addr)
            .field("cors_origins", &self.cors_origins)
            .finish_non_exhaustive()
    }
}

impl Env {
    pub fn new() -> Result<Self> {
        let env = Self::from_lookup(|key| std::env::var(key).ok())?;
        tracing::info!("Environment Loaded: {:?}", env);
        Ok(env)
    }

    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let var = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_owned());

        let base_url = var("BASE_URL", DEFAULT_BASE_URL);
        let base_url =
            Url::parse(&base_url).wrap_err_with(|| format!("Invalid BASE_URL: {}", base_url))?;

        let addr = format!("{}:{}", var("HOST", DEFAULT_HOST), var("PORT", DEFAULT_PORT));
        let addr = addr
            .parse::<SocketAddr>()
            .wrap_err_with(|| format!("Invalid HOST/PORT: {}", addr))?;

        let cors_origins = match lookup("CORS_ORIGINS") {
            Some(origins) => Some(
                origins
                    .split(',')
                    .map(str::trim)
                    .filter(|origin| !origin.is_empty())
                    .map(|origin| {
                        origin
                            .parse::<HeaderValue>()
                            .wrap_err_with(|| format!("Invalid CORS origin: {}", origin))
                    })
                    .collect::<Result<Vec<_>>>()?,
            ),
            None => None,
        };
        // a wildcard entry means no restriction
        let cors_origins =
            cors_origins.filter(|origins| !origins.iter().any(|o| o.as_bytes() == b"*"));

        Ok(Self {
            api_key: var("API_KEY", DEFAULT_API_KEY),
            base_url,
            addr,
            cors_origins,
        })
    }
}
