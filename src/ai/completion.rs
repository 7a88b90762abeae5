//! Chat completion requests and the client that sends them.
//!
//! Both pipeline stages talk to the model through [`CompletionClient`] so tests
//! can swap the network for scripted answers.

use std::time::Duration;

use async_trait::async_trait;
use serde::Serialize;
use tracing::{debug, instrument, trace, warn};

use crate::ai::common::{parse_chat_content, OPENAI_CHAT_URL};
use crate::ai::config::AiConfig;
use crate::error::CompletionError;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    System,
    User,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ImageUrl {
    pub url: String,
    pub detail: String,
}

/// One block of a multimodal user message.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum ContentPart {
    Text { text: String },
    ImageUrl { image_url: ImageUrl },
}

impl ContentPart {
    pub fn text(text: impl Into<String>) -> Self {
        Self::Text { text: text.into() }
    }

    pub fn high_detail_image(url: impl Into<String>) -> Self {
        Self::ImageUrl {
            image_url: ImageUrl {
                url: url.into(),
                detail: "high".to_string(),
            },
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged)]
pub enum MessageContent {
    Text(String),
    Parts(Vec<ContentPart>),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ChatMessage {
    pub role: Role,
    pub content: MessageContent,
}

impl ChatMessage {
    pub fn system(text: impl Into<String>) -> Self {
        Self {
            role: Role::System,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user(text: impl Into<String>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Text(text.into()),
        }
    }

    pub fn user_parts(parts: Vec<ContentPart>) -> Self {
        Self {
            role: Role::User,
            content: MessageContent::Parts(parts),
        }
    }

    /// All text carried by the message, image blocks skipped.
    pub fn text(&self) -> String {
        match &self.content {
            MessageContent::Text(text) => text.clone(),
            MessageContent::Parts(parts) => parts
                .iter()
                .filter_map(|p| match p {
                    ContentPart::Text { text } => Some(text.as_str()),
                    ContentPart::ImageUrl { .. } => None,
                })
                .collect::<Vec<_>>()
                .join("\n"),
        }
    }

    pub fn image_count(&self) -> usize {
        match &self.content {
            MessageContent::Text(_) => 0,
            MessageContent::Parts(parts) => parts
                .iter()
                .filter(|p| matches!(p, ContentPart::ImageUrl { .. }))
                .count(),
        }
    }
}

/// Body of a chat completion call.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ChatRequest {
    pub model: String,
    pub messages: Vec<ChatMessage>,
    pub max_tokens: u32,
    pub temperature: f32,
}

/// Something that can answer a chat completion request with the model's
/// message content.
#[async_trait]
pub trait CompletionClient: Send + Sync {
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError>;
}

/// [`CompletionClient`] backed by the OpenAI chat completions endpoint.
#[derive(Clone)]
pub struct OpenAiClient {
    http: reqwest::Client,
    api_key: String,
    url: String,
}

impl OpenAiClient {
    pub fn new(config: &AiConfig) -> anyhow::Result<Self> {
        let http = reqwest::Client::builder()
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            api_key: config.api_key.clone(),
            url: config
                .openai_chat_url
                .clone()
                .unwrap_or_else(|| OPENAI_CHAT_URL.to_string()),
        })
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

#[async_trait]
impl CompletionClient for OpenAiClient {
    #[instrument(level = "trace", skip_all, fields(model = %request.model))]
    async fn complete(&self, request: &ChatRequest) -> Result<String, CompletionError> {
        debug!(url = %self.url, messages = request.messages.len(), "sending chat completion request");

        let resp = self
            .http
            .post(&self.url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;

        let status = resp.status();
        if !status.is_success() {
            let body = resp.text().await.unwrap_or_default();
            warn!(%status, "OpenAI API error");
            return Err(CompletionError::Status {
                status: status.as_u16(),
                body,
            });
        }

        let raw = resp
            .text()
            .await
            .map_err(|e| CompletionError::Transport(e.to_string()))?;
        let snippet: String = raw.chars().take(200).collect();
        debug!(snippet = %snippet, "chat response body");
        trace!(raw = %raw, "chat response");
        parse_chat_content(&raw)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn multimodal_message_serializes_like_openai_expects() {
        let msg = ChatMessage::user_parts(vec![
            ContentPart::text("look"),
            ContentPart::high_detail_image("data:image/png;base64,aW1n"),
        ]);
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({
                "role": "user",
                "content": [
                    { "type": "text", "text": "look" },
                    {
                        "type": "image_url",
                        "image_url": { "url": "data:image/png;base64,aW1n", "detail": "high" }
                    }
                ]
            })
        );
        assert_eq!(msg.text(), "look");
        assert_eq!(msg.image_count(), 1);
    }

    #[test]
    fn text_message_serializes_as_string() {
        let msg = ChatMessage::system("be careful");
        assert_eq!(
            serde_json::to_value(&msg).unwrap(),
            json!({ "role": "system", "content": "be careful" })
        );
        assert_eq!(msg.image_count(), 0);
    }

    #[test]
    fn client_uses_configured_url() {
        let config = AiConfig {
            api_key: "k".into(),
            vision_model: "v".into(),
            copy_model: "c".into(),
            openai_chat_url: Some("http://localhost:9/v1/chat/completions".into()),
            timeout_secs: 5,
        };
        let client = OpenAiClient::new(&config).unwrap();
        assert_eq!(client.url(), "http://localhost:9/v1/chat/completions");

        let client = OpenAiClient::new(&AiConfig {
            openai_chat_url: None,
            ..config
        })
        .unwrap();
        assert_eq!(client.url(), OPENAI_CHAT_URL);
    }
}
