//! # Telegram bot framework
//!
//! Transport-agnostic core (Handler, Bot, Message, errors, logging), the before/handle/after
//! [`HandlerChain`], mention helpers, and the teloxide layer (adapters, Bot impl, REPL runner).
//! Applications build their handlers on top and hand the chain to [`run_repl`].

pub mod chain;
pub mod core;
pub mod mention;
pub mod telegram;

pub use core::{
    init_tracing, parse_message_id, Bot, Chat, ChatKind, DbotError, Handler, HandlerResponse,
    Message, Result, ToCoreMessage, ToCoreUser, User,
};

pub use chain::HandlerChain;

pub use mention::{is_bot_mentioned, should_respond};

pub use telegram::{
    resolve_bot_username, run_repl, BotUsername, TelegramBotAdapter, TelegramConfig,
    TelegramMessageWrapper, TelegramUserWrapper,
};
