use crate::{env::Env, provider::Provider};
use eyre::Result;

/// Built once at startup and only read afterwards.
pub struct AppState {
    pub env: Env,
    pub provider: Provider,
}

impl AppState {
    pub fn new(env: Env) -> Result<Self> {
        let provider = Provider::new(&env)?;
        Ok(Self { env, provider })
    }
}
