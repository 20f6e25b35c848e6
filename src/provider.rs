use crate::{
    env::Env,
    utils::data_types::{ChatBody, ChatResponse, ModelList},
};
use eyre::{Result, WrapErr};
use reqwest::{self as r, Url};

/// Client for the OpenAI-compatible upstream configured at startup.
pub struct Provider {
    client: r::Client,
    api_key: String,
    models_url: Url,
    chat_url: Url,
}

impl Provider {
    pub fn new(env: &Env) -> Result<Self> {
        // `join` replaces the last path segment unless the base ends with '/'
        let mut base = env.base_url.clone();
        if !base.path().ends_with('/') {
            let path = format!("{}/", base.path());
            base.set_path(&path);
        }

        Ok(Self {
            client: r::Client::builder().build()?,
            api_key: env.api_key.clone(),
            models_url: base.join("models")?,
            chat_url: base.join("chat/completions")?,
        })
    }

    pub fn models_url(&self) -> Url {
        self.models_url.clone()
    }

    pub fn chat_url(&self) -> Url {
        self.chat_url.clone()
    }

    fn apply_auth(&self, req: r::RequestBuilder) -> r::RequestBuilder {
        req.bearer_auth(&self.api_key)
    }

    async fn post_chat(&self, body: &ChatBody) -> Result<r::Response> {
        let req = self.client.post(self.chat_url()).json(body);
        let resp = self.apply_auth(req).send().await?;
        check_status(resp).await
    }

    pub async fn chat(&self, body: &ChatBody) -> Result<ChatResponse> {
        let resp = self.post_chat(body).await?;
        let completion = resp
            .json::<ChatResponse>()
            .await
            .wrap_err("Invalid completion payload")?;
        Ok(completion)
    }

    /// Returns the upstream response once its status is known to be a success;
    /// the body is left unread for the caller to stream.
    pub async fn chat_stream(&self, body: &ChatBody) -> Result<r::Response> {
        self.post_chat(body).await
    }

    pub async fn list_models(&self) -> Result<Vec<String>> {
        let req = self.client.get(self.models_url());
        let resp = check_status(self.apply_auth(req).send().await?).await?;
        let list = resp
            .json::<ModelList>()
            .await
            .wrap_err("Invalid model list payload")?;
        Ok(list.data.into_iter().map(|model| model.id).collect())
    }
}

async fn check_status(resp: r::Response) -> Result<r::Response> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let text = resp.text().await.unwrap_or_default();
    Err(eyre::eyre!("Error code: {} - {}", status.as_u16(), text))
}
