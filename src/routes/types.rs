use crate::utils::data_types::{self as upstream, ChatBody, UpstreamMessage, Usage};
use eyre::Result;
use serde::{Deserialize, Serialize};

pub const DEFAULT_MODEL: &str = "gpt-3.5-turbo";
pub const DEFAULT_TEMPERATURE: f64 = 0.7;
pub const DEFAULT_MAX_TOKENS: i64 = 500;

/// Role is passed through as-is: "user", "assistant" and "system" are the
/// usual values but nothing is enforced.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct Message {
    pub role: String,
    pub content: String,
}

#[derive(Deserialize, Debug, Clone)]
pub struct ChatRequest {
    pub messages: Vec<Message>,
    #[serde(default = "default_model")]
    pub model: String,
    #[serde(default = "default_temperature")]
    pub temperature: f64,
    #[serde(default = "default_max_tokens")]
    pub max_tokens: i64,
}

fn default_model() -> String {
    DEFAULT_MODEL.to_owned()
}

fn default_temperature() -> f64 {
    DEFAULT_TEMPERATURE
}

fn default_max_tokens() -> i64 {
    DEFAULT_MAX_TOKENS
}

impl ChatRequest {
    pub fn into_chat_body(self, stream: bool) -> ChatBody {
        ChatBody {
            model: self.model,
            messages: self
                .messages
                .into_iter()
                .map(|msg| UpstreamMessage {
                    role: msg.role,
                    content: msg.content,
                })
                .collect(),
            temperature: self.temperature,
            max_tokens: self.max_tokens,
            stream: stream.then_some(true),
        }
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ChatResponse {
    pub message: Message,
    pub usage: Option<Usage>,
}

impl TryFrom<upstream::ChatResponse> for ChatResponse {
    type Error = eyre::Report;

    fn try_from(completion: upstream::ChatResponse) -> Result<Self> {
        let choice = completion
            .choices
            .into_iter()
            .next()
            .ok_or_else(|| eyre::eyre!("Upstream returned no choices"))?;
        let content = choice
            .message
            .content
            .ok_or_else(|| eyre::eyre!("Upstream message has no content"))?;

        Ok(Self {
            message: Message {
                role: choice.message.role,
                content,
            },
            usage: completion.usage,
        })
    }
}

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct ModelsResponse {
    pub models: Vec<String>,
}

#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct HealthResponse {
    pub status: String,
    pub service: String,
    pub timestamp: String,
}
