//! Error types for the bot core.

use thiserror::Error;

/// Top-level error for the bot (transport, LLM).
#[derive(Error, Debug)]
pub enum DbotError {
    #[error("Bot error: {0}")]
    Bot(String),

    #[error("LLM error: {0}")]
    Llm(String),
}

/// Result type for core operations; uses [`DbotError`].
pub type Result<T> = std::result::Result<T, DbotError>;
