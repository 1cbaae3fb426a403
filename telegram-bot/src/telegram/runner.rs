//! REPL runner: converts teloxide text messages to core::Message and passes them to HandlerChain.

use crate::chain::HandlerChain;
use crate::core::ToCoreMessage;
use anyhow::Result;
use std::sync::Arc;
use teloxide::prelude::*;
use tracing::{error, info, instrument, warn};

use super::adapters::TelegramMessageWrapper;

/// Shared, lazily resolved bot username (without `@`).
pub type BotUsername = Arc<tokio::sync::RwLock<Option<String>>>;

/// Fills `bot_username` from `getMe` when it is not configured yet.
pub async fn resolve_bot_username(bot: &teloxide::Bot, bot_username: &BotUsername) {
    if bot_username.read().await.is_some() {
        return;
    }
    match bot.get_me().await {
        Ok(me) => {
            if let Some(username) = &me.user.username {
                *bot_username.write().await = Some(username.clone());
                info!(username = %username, "Bot username resolved via getMe");
            }
        }
        Err(e) => warn!(error = %e, "getMe failed; group mentions cannot be detected"),
    }
}

/// Starts the REPL with the given teloxide Bot and HandlerChain. Returns when the dispatcher
/// stops (Ctrl-C).
///
/// Each text message is converted to core::Message and handed to `chain.handle` on its own task.
/// Non-text updates are logged and dropped.
#[instrument(skip(bot, handler_chain, bot_username))]
pub async fn run_repl(
    bot: teloxide::Bot,
    handler_chain: HandlerChain,
    bot_username: BotUsername,
) -> Result<()> {
    resolve_bot_username(&bot, &bot_username).await;

    let chain = handler_chain;
    teloxide::repl(bot, move |_bot: Bot, msg: teloxide::types::Message| {
        let chain = chain.clone();

        async move {
            let core_msg = TelegramMessageWrapper(&msg).to_core();

            if msg.text().is_none() {
                info!(chat_id = core_msg.chat.id, "Received non-text message, ignored");
                return Ok(());
            }
            info!(
                user_id = core_msg.user.id,
                chat_id = core_msg.chat.id,
                chat_kind = ?core_msg.chat.kind,
                "Received message"
            );

            tokio::spawn(async move {
                if let Err(e) = chain.handle(&core_msg).await {
                    error!(error = %e, chat_id = core_msg.chat.id, "Handler chain failed");
                }
            });

            Ok(())
        }
    })
    .await;

    Ok(())
}
