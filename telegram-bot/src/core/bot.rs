//! Bot abstraction for sending and deleting messages.
//!
//! [`Bot`] is transport-agnostic; `TelegramBotAdapter` implements it via teloxide.
//! Tests substitute a recording implementation.

use super::error::{DbotError, Result};
use async_trait::async_trait;

/// Outbound messaging API. Message ids are transport-specific strings (Telegram: numeric).
#[async_trait]
pub trait Bot: Send + Sync {
    /// Sends a plain text message and returns the id of the sent message.
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<String>;
    /// Sends a message rendered in HTML mode and returns its id.
    async fn send_html(&self, chat_id: i64, html: &str) -> Result<String>;
    /// Deletes a message. Fails if it is already gone or the bot lacks permission.
    async fn delete_message(&self, chat_id: i64, message_id: &str) -> Result<()>;
}

/// Parses a message id string into an i32.
pub fn parse_message_id(s: &str) -> Result<i32> {
    s.parse()
        .map_err(|_| DbotError::Bot(format!("Invalid message_id: {}", s)))
}
