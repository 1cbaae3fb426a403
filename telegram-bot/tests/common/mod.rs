//! Shared message builders for telegram-bot integration tests.

use chrono::Utc;
use telegram_bot::{Chat, ChatKind, Message, User};

pub fn make_message(content: &str, kind: ChatKind) -> Message {
    Message {
        id: "42".to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat::new(456, kind),
        content: content.to_string(),
        message_type: "text".to_string(),
        created_at: Utc::now(),
    }
}
