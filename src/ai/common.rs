use serde::de::DeserializeOwned;
use serde::Deserialize;
use tracing::{instrument, trace};

use crate::error::{CompletionError, ParseFailure};

pub const OPENAI_CHAT_URL: &str = "https://api.openai.com/v1/chat/completions";

#[derive(Deserialize)]
struct ChatChoice {
    message: ChatResponseMessage,
}

#[derive(Deserialize)]
struct ChatResponseMessage {
    content: Option<String>,
}

#[derive(Deserialize)]
struct ChatResponse {
    choices: Vec<ChatChoice>,
}

/// Pull `choices[0].message.content` out of a chat completion body.
pub fn parse_chat_content(raw: &str) -> Result<String, CompletionError> {
    let chat: ChatResponse =
        serde_json::from_str(raw).map_err(|e| CompletionError::InvalidBody {
            reason: e.to_string(),
            raw: raw.to_string(),
        })?;
    chat.choices
        .into_iter()
        .next()
        .and_then(|c| c.message.content)
        .ok_or(CompletionError::MissingContent)
}

/// Remove a markdown code fence around model output.
///
/// A ```` ```json ```` fence wins over a bare ```` ``` ```` fence. Text before
/// the opening fence and after the closing one is dropped. An unterminated
/// fence keeps everything after the opening marker. Content without fences
/// is only trimmed.
pub fn strip_code_fences(content: &str) -> &str {
    let body = if let Some((_, rest)) = content.split_once("```json") {
        rest
    } else if let Some((_, rest)) = content.split_once("```") {
        rest
    } else {
        return content.trim();
    };
    body.split_once("```")
        .map_or(body, |(inner, _)| inner)
        .trim()
}

/// Fence-strip `content` and parse it strictly as `T`.
#[instrument(level = "trace", skip(content))]
pub fn parse_model_json<T: DeserializeOwned>(content: &str) -> Result<T, ParseFailure> {
    let json = strip_code_fences(content);
    trace!(json, "parsing model output");
    serde_json::from_str(json).map_err(|e| ParseFailure {
        reason: e.to_string(),
        raw: content.to_string(),
    })
}
