//! Telegram transport layer: adapters, Bot implementation, connectivity config, REPL runner.

mod adapters;
mod bot_adapter;
mod config;
mod runner;

pub use adapters::{chat_kind, TelegramMessageWrapper, TelegramUserWrapper};
pub use bot_adapter::TelegramBotAdapter;
pub use config::TelegramConfig;
pub use runner::{resolve_bot_username, run_repl, BotUsername};
