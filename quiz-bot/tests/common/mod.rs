//! Mocks and builders shared by quiz-bot integration tests.
//!
//! [`MockBot`] records every send and delete and can be told to fail sends or specific deletes.
//! [`MockLlmClient`] returns a fixed answer (or an error) and records the history it was given.
//! [`TestClock`] is a wall clock driven by the paused tokio clock that can be stepped.

#![allow(dead_code)]

use async_trait::async_trait;
use chrono::{DateTime, Local, Utc};
use llm_client::LlmClient;
use prompt::ChatMessage;
use quiz_bot::daily::Clock;
use std::collections::HashSet;
use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;
use telegram_bot::{Bot, Chat, ChatKind, DbotError, Message, Result, User};

/// One recorded outbound message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SentRecord {
    pub chat_id: i64,
    pub message_id: String,
    pub text: String,
    pub html: bool,
}

/// One recorded delete attempt (successful or not).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DeleteRecord {
    pub chat_id: i64,
    pub message_id: String,
}

/// Bot that hands out increasing message ids starting at 100.
#[derive(Default)]
pub struct MockBot {
    next_id: AtomicU64,
    fail_sends: AtomicBool,
    failing_deletes: Mutex<HashSet<String>>,
    sent: Mutex<Vec<SentRecord>>,
    deletes: Mutex<Vec<DeleteRecord>>,
}

impl MockBot {
    pub fn new() -> Arc<Self> {
        Arc::new(Self {
            next_id: AtomicU64::new(100),
            ..Default::default()
        })
    }

    pub fn fail_sends(&self, fail: bool) {
        self.fail_sends.store(fail, Ordering::SeqCst);
    }

    /// Deleting `message_id` will return an error (it is still recorded as attempted).
    pub fn fail_delete_of(&self, message_id: &str) {
        self.failing_deletes
            .lock()
            .unwrap()
            .insert(message_id.to_string());
    }

    pub fn sent(&self) -> Vec<SentRecord> {
        self.sent.lock().unwrap().clone()
    }

    pub fn deletes(&self) -> Vec<DeleteRecord> {
        self.deletes.lock().unwrap().clone()
    }

    fn record_send(&self, chat_id: i64, text: &str, html: bool) -> Result<String> {
        if self.fail_sends.load(Ordering::SeqCst) {
            return Err(DbotError::Bot("send failed".to_string()));
        }
        let message_id = self.next_id.fetch_add(1, Ordering::SeqCst).to_string();
        self.sent.lock().unwrap().push(SentRecord {
            chat_id,
            message_id: message_id.clone(),
            text: text.to_string(),
            html,
        });
        Ok(message_id)
    }
}

#[async_trait]
impl Bot for MockBot {
    async fn send_message(&self, chat_id: i64, text: &str) -> Result<String> {
        self.record_send(chat_id, text, false)
    }

    async fn send_html(&self, chat_id: i64, html: &str) -> Result<String> {
        self.record_send(chat_id, html, true)
    }

    async fn delete_message(&self, chat_id: i64, message_id: &str) -> Result<()> {
        self.deletes.lock().unwrap().push(DeleteRecord {
            chat_id,
            message_id: message_id.to_string(),
        });
        if self.failing_deletes.lock().unwrap().contains(message_id) {
            return Err(DbotError::Bot(format!("message {} not found", message_id)));
        }
        Ok(())
    }
}

/// LLM client with a canned answer; `None` makes every call fail.
pub struct MockLlmClient {
    answer: Option<String>,
    latency: Duration,
    calls: Mutex<Vec<Vec<ChatMessage>>>,
}

impl MockLlmClient {
    pub fn answering(answer: &str) -> Arc<Self> {
        Self::answering_after(answer, Duration::ZERO)
    }

    /// Answers after sleeping `latency` on the tokio clock.
    pub fn answering_after(answer: &str, latency: Duration) -> Arc<Self> {
        Arc::new(Self {
            answer: Some(answer.to_string()),
            latency,
            calls: Mutex::new(Vec::new()),
        })
    }

    pub fn failing() -> Arc<Self> {
        Arc::new(Self {
            answer: None,
            latency: Duration::ZERO,
            calls: Mutex::new(Vec::new()),
        })
    }

    /// Histories passed to each call, in order.
    pub fn calls(&self) -> Vec<Vec<ChatMessage>> {
        self.calls.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmClient for MockLlmClient {
    async fn get_llm_response_with_messages(
        &self,
        messages: Vec<ChatMessage>,
    ) -> anyhow::Result<String> {
        self.calls.lock().unwrap().push(messages);
        if !self.latency.is_zero() {
            tokio::time::sleep(self.latency).await;
        }
        self.answer
            .clone()
            .ok_or_else(|| anyhow::anyhow!("connection reset by peer"))
    }
}

/// Incoming text message `message_id` in chat `chat_id`.
pub fn make_message(chat_id: i64, kind: ChatKind, message_id: &str, content: &str) -> Message {
    Message {
        id: message_id.to_string(),
        user: User {
            id: 123,
            username: Some("test_user".to_string()),
            first_name: Some("Test".to_string()),
            last_name: None,
        },
        chat: Chat::new(chat_id, kind),
        content: content.to_string(),
        message_type: "text".to_string(),
        created_at: Utc::now(),
    }
}

/// Wall clock that starts at `start` and advances with tokio time, plus a manual offset.
pub struct TestClock {
    start: DateTime<Local>,
    origin: tokio::time::Instant,
    offset: Mutex<chrono::Duration>,
}

impl TestClock {
    pub fn starting_at(start: DateTime<Local>) -> Arc<Self> {
        Arc::new(Self {
            start,
            origin: tokio::time::Instant::now(),
            offset: Mutex::new(chrono::Duration::zero()),
        })
    }

    /// Moves the wall clock by `by` (negative steps it back) without touching tokio time.
    pub fn step(&self, by: chrono::Duration) {
        *self.offset.lock().unwrap() += by;
    }
}

impl Clock for TestClock {
    fn now(&self) -> DateTime<Local> {
        let elapsed = chrono::Duration::from_std(self.origin.elapsed()).unwrap();
        self.start + elapsed + *self.offset.lock().unwrap()
    }
}
