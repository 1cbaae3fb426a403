//! # Prompt
//!
//! Role-tagged chat messages sent to completion APIs, plus the built-in system
//! instruction used to seed every conversation.
//!
//! ## External interactions
//!
//! - **AI models**: a `Vec<ChatMessage>` is sent as-is as the `messages` array of an
//!   OpenAI-compatible chat completion request.

/// Role of a message, one-to-one with OpenAI Chat Completions API `role` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageRole {
    /// System instruction (API `role: "system"`).
    System,
    /// User message (API `role: "user"`).
    User,
    /// Assistant message (API `role: "assistant"`).
    Assistant,
}

impl MessageRole {
    /// API string for this role.
    pub fn as_str(&self) -> &'static str {
        match self {
            MessageRole::System => "system",
            MessageRole::User => "user",
            MessageRole::Assistant => "assistant",
        }
    }
}

/// A single chat message, one-to-one with one element of OpenAI `messages` array.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChatMessage {
    pub role: MessageRole,
    pub content: String,
}

impl ChatMessage {
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::System,
            content: content.into(),
        }
    }

    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::User,
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: MessageRole::Assistant,
            content: content.into(),
        }
    }

    pub fn is_system(&self) -> bool {
        self.role == MessageRole::System
    }
}

/// Default system instruction: a concise JavaScript/TypeScript/React interview expert.
/// Used when `SYSTEM_PROMPT` is not configured.
pub const DEFAULT_SYSTEM_MESSAGE: &str = "Ты эксперт по программированию на JavaScript, TypeScript и React. \
Отвечай коротко и лаконично и с короткими примерами кода, понятными для собеседования. \
И заканчивай мысль, не обрезая ответ, чтобы все уместилось";

/// Counts messages per role as `(system, user, assistant)`. Handy for request logging.
pub fn role_counts(messages: &[ChatMessage]) -> (usize, usize, usize) {
    messages
        .iter()
        .fold((0, 0, 0), |(s, u, a), m| match m.role {
            MessageRole::System => (s + 1, u, a),
            MessageRole::User => (s, u + 1, a),
            MessageRole::Assistant => (s, u, a + 1),
        })
}
