//! Handlers for the inbound chain: target-chat claim, group mention filter, LLM completion.

mod completion;
mod mention_filter;
mod target_chat;

pub use completion::{CompletionHandler, DEFAULT_FAILURE_MESSAGE};
pub use mention_filter::GroupMentionHandler;
pub use target_chat::TargetChatHandler;
