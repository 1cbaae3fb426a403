//! Claims the first chat that talks to the bot as the daily-question target.

use async_trait::async_trait;
use telegram_bot::{Handler, Message, Result};
use tracing::debug;

use crate::daily::TargetChat;

/// Records the chat as daily target in before() when none is set; always continues.
#[derive(Clone)]
pub struct TargetChatHandler {
    target: TargetChat,
}

impl TargetChatHandler {
    pub fn new(target: TargetChat) -> Self {
        Self { target }
    }
}

#[async_trait]
impl Handler for TargetChatHandler {
    async fn before(&self, message: &Message) -> Result<bool> {
        if !self.target.claim(message.chat.id).await {
            debug!(chat_id = message.chat.id, "Target chat already set");
        }
        Ok(true)
    }
}
