//! Group chats: only messages that mention the bot get through.

use async_trait::async_trait;
use telegram_bot::{should_respond, BotUsername, Handler, Message, Result};
use tracing::{debug, instrument};

/// Stops the chain in before() for group messages that do not contain `@<bot_username>`.
///
/// While the username is unknown every group message is dropped; private chats always pass.
#[derive(Clone)]
pub struct GroupMentionHandler {
    bot_username: BotUsername,
}

impl GroupMentionHandler {
    pub fn new(bot_username: BotUsername) -> Self {
        Self { bot_username }
    }
}

#[async_trait]
impl Handler for GroupMentionHandler {
    #[instrument(skip(self, message))]
    async fn before(&self, message: &Message) -> Result<bool> {
        let username = self.bot_username.read().await.clone();
        let respond = should_respond(message, username.as_deref());
        if !respond {
            debug!(
                chat_id = message.chat.id,
                chat_kind = ?message.chat.kind,
                "Group message without bot mention, ignored"
            );
        }
        Ok(respond)
    }
}
