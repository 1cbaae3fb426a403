//! LLM configuration: trait and env-based implementation.

use anyhow::{Context, Result};
use std::env;

/// Model used when `MODEL` is not set.
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";

/// Output-token bound used when `MAX_TOKENS` is not set.
pub const DEFAULT_MAX_TOKENS: u32 = 100;

/// LLM configuration interface for OpenAI-compatible APIs.
pub trait LlmConfig: Send + Sync {
    fn api_key(&self) -> &str;
    fn base_url(&self) -> &str;
    fn model(&self) -> &str;
    /// `None` means no bound is sent with the request.
    fn max_tokens(&self) -> Option<u32>;
}

/// LLM config loaded from environment variables.
#[derive(Debug, Clone)]
pub struct EnvLlmConfig {
    pub openai_api_key: String,
    pub openai_base_url: String,
    pub llm_model: String,
    pub llm_max_tokens: Option<u32>,
}

impl LlmConfig for EnvLlmConfig {
    fn api_key(&self) -> &str {
        &self.openai_api_key
    }
    fn base_url(&self) -> &str {
        &self.openai_base_url
    }
    fn model(&self) -> &str {
        &self.llm_model
    }
    fn max_tokens(&self) -> Option<u32> {
        self.llm_max_tokens
    }
}

impl EnvLlmConfig {
    /// Load from environment variables.
    ///
    /// `MAX_TOKENS=0` disables the bound; an unparsable value is an error.
    pub fn from_env() -> Result<Self> {
        let openai_api_key = env::var("OPENAI_API_KEY").context("OPENAI_API_KEY not set")?;
        let openai_base_url = env::var("OPENAI_BASE_URL")
            .unwrap_or_else(|_| "https://api.openai.com/v1".to_string());
        let llm_model = env::var("MODEL").unwrap_or_else(|_| DEFAULT_MODEL.to_string());
        let llm_max_tokens = match env::var("MAX_TOKENS") {
            Ok(raw) => {
                let n: u32 = raw
                    .trim()
                    .parse()
                    .with_context(|| format!("MAX_TOKENS is not a number: {}", raw))?;
                (n > 0).then_some(n)
            }
            Err(_) => Some(DEFAULT_MAX_TOKENS),
        };
        Ok(Self {
            openai_api_key,
            openai_base_url,
            llm_model,
            llm_max_tokens,
        })
    }
}
