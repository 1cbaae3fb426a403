//! Per-chat conversation history kept in memory.
//!
//! Each chat maps to an ordered list of [`ChatMessage`]s whose first element is always the
//! system instruction. Records are created lazily on the first append, grow without bound and
//! are removed as a whole by [`ConversationStore::evict`]. Nothing is persisted.
//!
//! Every record carries a generation number assigned when it is seeded. A completion turn opens
//! with [`ConversationStore::begin_turn`] and closes with [`ConversationStore::finish_turn`];
//! the answer is only recorded while the record the turn started on is still alive.

use prompt::ChatMessage;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::debug;

#[derive(Debug)]
struct ChatRecord {
    generation: u64,
    messages: Vec<ChatMessage>,
}

#[derive(Debug, Default)]
struct Chats {
    records: HashMap<i64, ChatRecord>,
    next_generation: u64,
}

impl Chats {
    fn record_mut(&mut self, chat_id: i64, system_prompt: &str) -> &mut ChatRecord {
        let next_generation = &mut self.next_generation;
        self.records.entry(chat_id).or_insert_with(|| {
            *next_generation += 1;
            debug!(
                chat_id,
                generation = *next_generation,
                "Seeding conversation with system message"
            );
            ChatRecord {
                generation: *next_generation,
                messages: vec![ChatMessage::system(system_prompt)],
            }
        })
    }
}

/// A user message recorded by [`ConversationStore::begin_turn`], waiting for its answer.
#[derive(Debug, Clone)]
pub struct Turn {
    pub chat_id: i64,
    generation: u64,
    /// History snapshot including the user message, as sent to the LLM.
    pub history: Vec<ChatMessage>,
}

/// Shared handle to the conversation store; clones see the same state.
#[derive(Debug, Clone)]
pub struct ConversationStore {
    system_prompt: Arc<str>,
    chats: Arc<RwLock<Chats>>,
}

impl ConversationStore {
    pub fn new(system_prompt: impl Into<String>) -> Self {
        let system_prompt: String = system_prompt.into();
        Self {
            system_prompt: Arc::from(system_prompt),
            chats: Arc::new(RwLock::new(Chats::default())),
        }
    }

    pub fn system_prompt(&self) -> &str {
        &self.system_prompt
    }

    /// Appends `message` to the chat's history, seeding a new record with the system message first.
    /// Returns the history length after the append.
    pub async fn append(&self, chat_id: i64, message: ChatMessage) -> usize {
        let mut chats = self.chats.write().await;
        let record = chats.record_mut(chat_id, &self.system_prompt);
        record.messages.push(message);
        record.messages.len()
    }

    /// Appends the user message and returns the turn with a snapshot of the resulting history.
    pub async fn begin_turn(&self, chat_id: i64, user: ChatMessage) -> Turn {
        let mut chats = self.chats.write().await;
        let record = chats.record_mut(chat_id, &self.system_prompt);
        record.messages.push(user);
        Turn {
            chat_id,
            generation: record.generation,
            history: record.messages.clone(),
        }
    }

    /// Appends the answer to the record `turn` started on. Returns false, leaving the store
    /// untouched, when that record was evicted in between (a reseeded record does not count).
    pub async fn finish_turn(&self, turn: &Turn, answer: ChatMessage) -> bool {
        let mut chats = self.chats.write().await;
        match chats.records.get_mut(&turn.chat_id) {
            Some(record) if record.generation == turn.generation => {
                record.messages.push(answer);
                true
            }
            _ => {
                debug!(
                    chat_id = turn.chat_id,
                    "Turn outlived its conversation; answer not recorded"
                );
                false
            }
        }
    }

    /// Full ordered history for the chat; empty when the chat has no record.
    pub async fn history(&self, chat_id: i64) -> Vec<ChatMessage> {
        self.chats
            .read()
            .await
            .records
            .get(&chat_id)
            .map(|record| record.messages.clone())
            .unwrap_or_default()
    }

    /// Removes the chat's record. Returns whether one existed.
    pub async fn evict(&self, chat_id: i64) -> bool {
        let removed = self.chats.write().await.records.remove(&chat_id);
        if let Some(ref record) = removed {
            debug!(chat_id, len = record.messages.len(), "Conversation evicted");
        }
        removed.is_some()
    }

    /// History length for the chat (0 when absent).
    pub async fn len(&self, chat_id: i64) -> usize {
        self.chats
            .read()
            .await
            .records
            .get(&chat_id)
            .map(|record| record.messages.len())
            .unwrap_or(0)
    }

    pub async fn contains(&self, chat_id: i64) -> bool {
        self.chats.read().await.records.contains_key(&chat_id)
    }

    /// Number of chats with a live record.
    pub async fn chat_count(&self) -> usize {
        self.chats.read().await.records.len()
    }
}
