//! Target chat for the daily question.

use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

/// Chat that receives the daily question: configured up front, or claimed once at runtime.
#[derive(Debug, Clone, Default)]
pub struct TargetChat {
    inner: Arc<RwLock<Option<i64>>>,
}

impl TargetChat {
    pub fn new(configured: Option<i64>) -> Self {
        Self {
            inner: Arc::new(RwLock::new(configured)),
        }
    }

    /// Sets the target if none is set yet (first writer wins). Returns true when this call set it.
    pub async fn claim(&self, chat_id: i64) -> bool {
        let mut target = self.inner.write().await;
        if target.is_some() {
            return false;
        }
        *target = Some(chat_id);
        info!(chat_id, "Daily question target chat claimed");
        true
    }

    pub async fn get(&self) -> Option<i64> {
        *self.inner.read().await
    }
}
