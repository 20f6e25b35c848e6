//! OpenAI-compatible wire types exchanged with the upstream provider.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
pub struct UpstreamMessage {
    pub role: String,
    pub content: String,
}

#[derive(Serialize, Debug)]
pub struct ChatBody {
    pub model: String,
    pub messages: Vec<UpstreamMessage>,
    pub temperature: f64,
    pub max_tokens: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub stream: Option<bool>,
}

/// `content` is nullable upstream, e.g. for tool calls.
#[derive(Deserialize, Debug, Clone)]
pub struct ResponseMessage {
    pub role: String,
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone, Default)]
pub struct Delta {
    pub content: Option<String>,
}

#[derive(Deserialize, Debug, Clone)]
pub struct Choice {
    pub message: ResponseMessage,
}

#[derive(Deserialize, Debug, Clone)]
pub struct StreamChoice {
    #[serde(default)]
    pub delta: Delta,
}

#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Usage {
    pub prompt_tokens: u64,
    pub completion_tokens: u64,
    pub total_tokens: u64,
}

#[derive(Deserialize, Debug)]
pub struct ChatResponse {
    pub choices: Vec<Choice>,
    pub usage: Option<Usage>,
}

/// Providers report mid-stream failures as a chunk carrying `error`.
#[derive(Deserialize, Debug)]
pub struct StreamChunk {
    #[serde(default)]
    pub choices: Vec<StreamChoice>,
    pub error: Option<serde_json::Value>,
}

impl StreamChunk {
    /// Text carried by the first choice, if any and non-empty.
    pub fn content(self) -> Option<String> {
        self.choices
            .into_iter()
            .next()
            .and_then(|choice| choice.delta.content)
            .filter(|content| !content.is_empty())
    }
}

#[derive(Deserialize, Debug)]
pub struct Model {
    pub id: String,
}

#[derive(Deserialize, Debug)]
pub struct ModelList {
    pub data: Vec<Model>,
}
