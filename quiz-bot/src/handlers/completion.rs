//! Completion handler: one LLM turn per message, reply sent as HTML, then scheduled for deletion.

use async_trait::async_trait;
use llm_client::LlmClient;
use prompt::{role_counts, ChatMessage};
use std::sync::Arc;
use std::time::Duration;
use telegram_bot::{Bot, DbotError, Handler, HandlerResponse, Message, Result};
use tracing::{error, info, instrument, warn};

use crate::conversation::ConversationStore;
use crate::format::format_message;
use crate::retention::{RetentionJob, RetentionScheduler};

/// Notice sent to the chat when a turn fails.
pub const DEFAULT_FAILURE_MESSAGE: &str = "Ошибка 🤖. Попробуй ещё раз.";

/// Appends the user message to the chat history, asks the LLM with the whole history, records
/// and sends the answer, and arms deletion of both messages (plus the history).
///
/// When retention evicts the history while the LLM call is in flight, the answer is still sent
/// but not recorded, so the next turn starts from a clean record.
/// Failures are logged and answered with the failure notice; the user message stays in history.
#[derive(Clone)]
pub struct CompletionHandler {
    llm_client: Arc<dyn LlmClient>,
    bot: Arc<dyn Bot>,
    store: ConversationStore,
    retention: RetentionScheduler,
    retention_delay: Duration,
    failure_message: String,
}

impl CompletionHandler {
    pub fn new(
        llm_client: Arc<dyn LlmClient>,
        bot: Arc<dyn Bot>,
        store: ConversationStore,
        retention: RetentionScheduler,
        retention_delay: Duration,
    ) -> Self {
        Self {
            llm_client,
            bot,
            store,
            retention,
            retention_delay,
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    pub fn with_failure_message(mut self, failure_message: impl Into<String>) -> Self {
        self.failure_message = failure_message.into();
        self
    }

    async fn complete(&self, message: &Message) -> Result<String> {
        let chat_id = message.chat.id;

        let turn = self
            .store
            .begin_turn(chat_id, ChatMessage::user(message.content.clone()))
            .await;
        let (system, user, assistant) = role_counts(&turn.history);
        info!(
            chat_id,
            history_len = turn.history.len(),
            system,
            user,
            assistant,
            "step: user message appended, calling LLM with history"
        );
        let answer = self
            .llm_client
            .get_llm_response_with_messages(turn.history.clone())
            .await
            .map_err(|e| DbotError::Llm(format!("{:#}", e)))?;

        if !self
            .store
            .finish_turn(&turn, ChatMessage::assistant(answer.clone()))
            .await
        {
            warn!(chat_id, "History evicted during the turn; answer not recorded");
        }

        let reply_id = self.bot.send_html(chat_id, &format_message(&answer)).await?;
        let key = self.retention.schedule(
            RetentionJob::reply(chat_id, reply_id, message.id.clone()),
            self.retention_delay,
        );
        info!(chat_id, key = %key, reply_len = answer.len(), "step: reply sent");

        Ok(answer)
    }
}

#[async_trait]
impl Handler for CompletionHandler {
    #[instrument(skip(self, message), fields(chat_id = message.chat.id, message_id = %message.id))]
    async fn handle(&self, message: &Message) -> Result<HandlerResponse> {
        match self.complete(message).await {
            Ok(answer) => Ok(HandlerResponse::Reply(answer)),
            Err(e) => {
                error!(error = %e, "Completion turn failed");
                if let Err(send_err) = self
                    .bot
                    .send_message(message.chat.id, &self.failure_message)
                    .await
                {
                    error!(error = %send_err, "Failed to send failure notice");
                }
                Ok(HandlerResponse::Stop)
            }
        }
    }
}
