//! Retention scheduler: deletes sent messages (and optionally the chat's history) after a delay.
//!
//! Timers are tokio tasks registered by [`RetentionKey`]; re-arming a key replaces its timer and
//! [`RetentionScheduler::shutdown`] aborts whatever is still armed. A timer that
//! fires tries every deletion independently; failures are logged and never retried. Eviction of
//! the conversation happens regardless of deletion outcomes.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex};
use std::time::Duration;

use telegram_bot::Bot;
use tokio::task::AbortHandle;
use tracing::{debug, info, instrument, warn};

use crate::conversation::ConversationStore;

/// Default retention window: 24 hours.
pub const DEFAULT_RETENTION: Duration = Duration::from_secs(24 * 60 * 60);

/// Messages to delete together once the retention window elapses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RetentionJob {
    pub chat_id: i64,
    /// Transport message ids; the first one keys the timer.
    pub message_ids: Vec<String>,
    /// Also drop the chat's conversation history when the timer fires.
    pub evict_history: bool,
}

impl RetentionJob {
    /// Bot reply plus the user message that triggered it; clears the chat's history.
    pub fn reply(chat_id: i64, reply_id: impl Into<String>, trigger_id: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_ids: vec![reply_id.into(), trigger_id.into()],
            evict_history: true,
        }
    }

    /// A single bot message (e.g. the daily question); history is left alone.
    pub fn single(chat_id: i64, message_id: impl Into<String>) -> Self {
        Self {
            chat_id,
            message_ids: vec![message_id.into()],
            evict_history: false,
        }
    }

    pub fn key(&self) -> RetentionKey {
        RetentionKey {
            chat_id: self.chat_id,
            message_id: self.message_ids.first().cloned().unwrap_or_default(),
        }
    }
}

/// Identifies an armed timer: chat plus the first tracked message id.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct RetentionKey {
    pub chat_id: i64,
    pub message_id: String,
}

impl fmt::Display for RetentionKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.chat_id, self.message_id)
    }
}

/// What happened when a job ran.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct RetentionOutcome {
    pub deleted: usize,
    pub failed: usize,
    pub evicted: bool,
}

struct ArmedTimer {
    generation: u64,
    handle: AbortHandle,
}

type TimerMap = HashMap<RetentionKey, ArmedTimer>;

/// Shared handle to the timer registry; clones see the same timers.
#[derive(Clone)]
pub struct RetentionScheduler {
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    timers: Arc<Mutex<TimerMap>>,
    generation: Arc<AtomicU64>,
}

impl RetentionScheduler {
    pub fn new(bot: Arc<dyn Bot>, store: ConversationStore) -> Self {
        Self {
            bot,
            store,
            timers: Arc::new(Mutex::new(TimerMap::new())),
            generation: Arc::new(AtomicU64::new(0)),
        }
    }

    fn timers(&self) -> std::sync::MutexGuard<'_, TimerMap> {
        self.timers.lock().unwrap_or_else(|e| e.into_inner())
    }

    /// Arms a one-shot timer for `job`. Re-arming an existing key cancels the earlier timer.
    pub fn schedule(&self, job: RetentionJob, delay: Duration) -> RetentionKey {
        let key = job.key();
        let generation = self.generation.fetch_add(1, Ordering::Relaxed);

        let mut timers = self.timers();
        if let Some(previous) = timers.remove(&key) {
            previous.handle.abort();
            debug!(key = %key, "Replaced armed retention timer");
        }

        let scheduler = self.clone();
        let task_key = key.clone();
        let handle = tokio::spawn(async move {
            tokio::time::sleep(delay).await;
            scheduler.execute(&job).await;
            let mut timers = scheduler.timers();
            if timers
                .get(&task_key)
                .is_some_and(|armed| armed.generation == generation)
            {
                timers.remove(&task_key);
            }
        })
        .abort_handle();

        timers.insert(key.clone(), ArmedTimer { generation, handle });
        info!(key = %key, delay_secs = delay.as_secs(), "Retention timer armed");
        key
    }

    /// Runs a job now: every deletion is attempted, then the history is evicted if requested.
    #[instrument(skip(self, job), fields(chat_id = job.chat_id))]
    pub async fn execute(&self, job: &RetentionJob) -> RetentionOutcome {
        let mut outcome = RetentionOutcome::default();
        for message_id in &job.message_ids {
            match self.bot.delete_message(job.chat_id, message_id).await {
                Ok(()) => outcome.deleted += 1,
                Err(e) => {
                    outcome.failed += 1;
                    warn!(
                        chat_id = job.chat_id,
                        message_id = %message_id,
                        error = %e,
                        "Failed to delete message"
                    );
                }
            }
        }
        if job.evict_history {
            outcome.evicted = self.store.evict(job.chat_id).await;
        }
        info!(
            chat_id = job.chat_id,
            deleted = outcome.deleted,
            failed = outcome.failed,
            evicted = outcome.evicted,
            "Retention job done"
        );
        outcome
    }

    /// Number of armed timers.
    pub fn pending(&self) -> usize {
        self.timers().len()
    }

    pub fn is_armed(&self, key: &RetentionKey) -> bool {
        self.timers().contains_key(key)
    }

    /// Cancels everything; called at process teardown.
    pub fn shutdown(&self) -> usize {
        let drained: Vec<(RetentionKey, ArmedTimer)> = self.timers().drain().collect();
        for (_, armed) in &drained {
            armed.handle.abort();
        }
        if !drained.is_empty() {
            info!(count = drained.len(), "Pending retention timers cancelled on shutdown");
        }
        drained.len()
    }
}
