//! Runs the bot: logging, health endpoint, daily scheduler, REPL, then teardown.

use std::sync::Arc;

use anyhow::Result;
use chrono::Utc;
use llm_client::EnvLlmConfig;
use telegram_bot::{init_tracing, run_repl, Bot, TelegramBotAdapter};
use tokio::sync::oneshot;
use tracing::{debug, error, info, warn};

use crate::assembly::{build_components, build_llm_client};
use crate::config::QuizBotConfig;
use crate::daily::{DailyError, DailyQuestionScheduler, StartupOutcome};
use crate::health;

/// Startup catch-up, then the daily loop. Never returns.
async fn run_daily(daily: Arc<DailyQuestionScheduler>) {
    match daily.startup_check(Utc::now()).await {
        Ok(StartupOutcome::Sent(sent)) => {
            info!(chat_id = sent.chat_id, "Startup daily question sent")
        }
        Ok(StartupOutcome::NotDue { .. }) => {}
        Err(DailyError::NoTargetChat) => debug!("No target chat at startup, catch-up skipped"),
        Err(e) => error!(error = %e, "Startup daily question failed"),
    }
    daily.run().await;
}

/// Runs the bot until Ctrl-C. Load `.env` before calling.
pub async fn run_bot(config: QuizBotConfig) -> Result<()> {
    init_tracing(&config.log_file)?;
    config.validate()?;

    info!(log_file = %config.log_file, port = config.port, "Initializing bot");

    let llm_cfg = EnvLlmConfig::from_env()?;
    let teloxide_bot = config.telegram.build_bot()?;
    let bot: Arc<dyn Bot> = Arc::new(TelegramBotAdapter::new(teloxide_bot.clone()));
    let components = build_components(&config, bot, build_llm_client(&llm_cfg))?;

    let listener = health::bind(config.port).await?;
    let (shutdown_tx, shutdown_rx) = oneshot::channel::<()>();
    let health_task = tokio::spawn(health::serve(listener, async move {
        let _ = shutdown_rx.await;
    }));

    let daily_task = tokio::spawn(run_daily(components.daily.clone()));

    info!("Bot started");
    run_repl(
        teloxide_bot,
        components.chain.clone(),
        components.bot_username.clone(),
    )
    .await?;

    info!("Shutting down");
    daily_task.abort();
    components.retention.shutdown();
    let _ = shutdown_tx.send(());
    match health_task.await {
        Ok(Ok(())) => {}
        Ok(Err(e)) => warn!(error = %e, "Health endpoint stopped with error"),
        Err(e) => warn!(error = %e, "Health endpoint task failed"),
    }
    info!("Bot stopped");
    Ok(())
}
