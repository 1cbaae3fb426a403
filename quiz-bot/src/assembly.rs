//! Assembly: builds the shared state, schedulers and handler chain from config.

use std::sync::Arc;

use anyhow::Result;
use llm_client::{EnvLlmConfig, LlmClient, LlmConfig, OpenAILlmClient};
use telegram_bot::{Bot, BotUsername, HandlerChain};
use tracing::info;

use crate::config::QuizBotConfig;
use crate::conversation::ConversationStore;
use crate::daily::{
    DailyQuestionScheduler, DailySettings, QuestionCatalog, ScheduleStateStore, TargetChat,
};
use crate::handlers::{CompletionHandler, GroupMentionHandler, TargetChatHandler};
use crate::retention::RetentionScheduler;

/// Everything the running bot shares between the dispatcher and the schedulers.
#[derive(Clone)]
pub struct BotComponents {
    pub store: ConversationStore,
    pub retention: RetentionScheduler,
    pub target: TargetChat,
    pub bot_username: BotUsername,
    pub daily: Arc<DailyQuestionScheduler>,
    pub chain: HandlerChain,
}

/// Builds the OpenAI-backed LLM client from env config.
pub fn build_llm_client(llm_cfg: &EnvLlmConfig) -> Arc<dyn LlmClient> {
    info!(
        model = %llm_cfg.model(),
        base_url = %llm_cfg.base_url(),
        max_tokens = ?llm_cfg.max_tokens(),
        "LLM client configured"
    );
    Arc::new(
        OpenAILlmClient::with_base_url(
            llm_cfg.api_key().to_string(),
            llm_cfg.base_url().to_string(),
        )
        .with_model(llm_cfg.model().to_string())
        .with_max_tokens(llm_cfg.max_tokens()),
    )
}

/// Wires store, retention, daily scheduler and the handler chain around `bot` and `llm_client`.
///
/// Chain order: target chat claim, group mention filter, completion.
pub fn build_components(
    config: &QuizBotConfig,
    bot: Arc<dyn Bot>,
    llm_client: Arc<dyn LlmClient>,
) -> Result<BotComponents> {
    let store = ConversationStore::new(config.system_prompt.clone());
    let retention = RetentionScheduler::new(bot.clone(), store.clone());
    let target = TargetChat::new(config.target_chat_id);
    let bot_username: BotUsername =
        Arc::new(tokio::sync::RwLock::new(config.bot_username.clone()));

    let daily = Arc::new(DailyQuestionScheduler::new(
        bot.clone(),
        target.clone(),
        QuestionCatalog::builtin(),
        ScheduleStateStore::new(config.schedule_state_path.clone()),
        retention.clone(),
        DailySettings::new(config.daily_trigger_time()?, config.retention()),
    ));

    let completion = CompletionHandler::new(
        llm_client,
        bot,
        store.clone(),
        retention.clone(),
        config.retention(),
    )
    .with_failure_message(config.failure_message.clone());

    let chain = HandlerChain::new()
        .add_handler(Arc::new(TargetChatHandler::new(target.clone())))
        .add_handler(Arc::new(GroupMentionHandler::new(bot_username.clone())))
        .add_handler(Arc::new(completion));

    info!(
        handlers = chain.len(),
        target_chat_id = ?config.target_chat_id,
        retention_secs = config.retention_secs,
        "Bot components built"
    );

    Ok(BotComponents {
        store,
        retention,
        target,
        bot_username,
        daily,
        chain,
    })
}
