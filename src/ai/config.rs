use std::env;

pub const DEFAULT_VISION_MODEL: &str = "gpt-4o";
pub const DEFAULT_COPY_MODEL: &str = "gpt-4o";
pub const DEFAULT_TIMEOUT_SECS: u64 = 60;

#[derive(Clone, Debug)]
pub struct AiConfig {
    pub api_key: String,
    pub vision_model: String,
    pub copy_model: String,
    pub openai_chat_url: Option<String>,
    /// Upper bound for each completion call.
    pub timeout_secs: u64,
}

impl AiConfig {
    /// Returns `None` when `OPENAI_API_KEY` is unset or empty.
    pub fn from_env() -> Option<Self> {
        let api_key = match env::var("OPENAI_API_KEY") {
            Ok(k) if !k.trim().is_empty() => k,
            _ => return None,
        };
        let timeout_secs = env::var("OPENAI_TIMEOUT_SECS")
            .ok()
            .and_then(|v| v.trim().parse().ok())
            .filter(|secs| *secs > 0)
            .unwrap_or(DEFAULT_TIMEOUT_SECS);
        Some(Self {
            api_key,
            vision_model: env::var("OPENAI_VISION_MODEL")
                .unwrap_or_else(|_| DEFAULT_VISION_MODEL.to_string()),
            copy_model: env::var("OPENAI_COPY_MODEL")
                .unwrap_or_else(|_| DEFAULT_COPY_MODEL.to_string()),
            openai_chat_url: env::var("OPENAI_CHAT_URL").ok(),
            timeout_secs,
        })
    }
}
