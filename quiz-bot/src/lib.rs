//! # quiz_bot
//!
//! Telegram relay to an LLM acting as a programming interview coach. Keeps per-chat history in
//! memory, formats replies as Telegram HTML, deletes every exchange (and the chat's history)
//! after the retention window, and posts one random interview question a day.
//!
//! Entry point is [`run_bot`]; [`build_components`] wires the same pieces around any [`telegram_bot::Bot`]
//! and [`llm_client::LlmClient`] for tests.

mod assembly;
pub mod cli;
pub mod config;
pub mod conversation;
pub mod daily;
pub mod format;
pub mod handlers;
pub mod health;
pub mod retention;
mod runner;

pub use assembly::{build_components, build_llm_client, BotComponents};
pub use cli::{load_config, Cli, Commands};
pub use config::QuizBotConfig;
pub use conversation::ConversationStore;
pub use format::{escape_html, format_message};
pub use retention::{RetentionJob, RetentionKey, RetentionOutcome, RetentionScheduler};
pub use runner::run_bot;
