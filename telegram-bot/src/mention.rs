//! @-mention detection for group chats.
//!
//! Matching is an exact, case-sensitive substring test for `@<bot_username>`.

use crate::core::Message;

/// Returns true if `text` contains a @mention of the given bot username.
#[inline]
pub fn is_bot_mentioned(text: &str, bot_username: &str) -> bool {
    text.contains(&format!("@{}", bot_username))
}

/// Decides whether the bot should answer `message`.
///
/// Private chats (and channels) always pass. Group and supergroup messages pass only when
/// they mention the bot; with no known username nothing in a group passes.
pub fn should_respond(message: &Message, bot_username: Option<&str>) -> bool {
    if !message.chat.kind.is_group() {
        return true;
    }
    match bot_username {
        Some(username) => is_bot_mentioned(&message.content, username),
        None => false,
    }
}
