use std::env;

use crate::ai::config::AiConfig;

pub const DEFAULT_BIND_ADDR: &str = "0.0.0.0:8080";

#[derive(Clone, Debug)]
pub struct Config {
    pub bind_addr: String,
    /// `None` when no OpenAI key is set. The service still starts and
    /// answers generation requests with a configuration error.
    pub ai: Option<AiConfig>,
}

impl Config {
    pub fn from_env() -> Self {
        dotenvy::dotenv().ok();
        let bind_addr = env::var("BIND_ADDR").unwrap_or_else(|_| DEFAULT_BIND_ADDR.to_string());
        let ai = AiConfig::from_env();
        Self { bind_addr, ai }
    }
}
