//! Application config: Telegram connection, logging, health port, retention and daily schedule.
//! Loaded from env; LLM settings live in [`llm_client::EnvLlmConfig`].

use anyhow::{Context, Result};
use chrono::NaiveTime;
use prompt::DEFAULT_SYSTEM_MESSAGE;
use std::env;
use std::path::PathBuf;
use std::time::Duration;
use telegram_bot::TelegramConfig;

use crate::handlers::DEFAULT_FAILURE_MESSAGE;
use crate::retention::DEFAULT_RETENTION;

const DEFAULT_LOG_FILE: &str = "logs/quiz-bot.log";
const DEFAULT_PORT: u16 = 3000;
const DEFAULT_RETENTION_SECS: u64 = DEFAULT_RETENTION.as_secs();
const DEFAULT_DAILY_QUESTION_TIME: &str = "10:00";
const DEFAULT_SCHEDULE_STATE_PATH: &str = "./data/daily_question.json";

/// Quiz bot config.
#[derive(Debug, Clone)]
pub struct QuizBotConfig {
    pub telegram: TelegramConfig,
    /// BOT_USERNAME, without `@`; resolved via getMe when unset
    pub bot_username: Option<String>,
    /// TARGET_CHAT_ID
    pub target_chat_id: Option<i64>,
    /// LOG_FILE
    pub log_file: String,
    /// PORT of the health endpoint
    pub port: u16,
    /// RETENTION_SECS
    pub retention_secs: u64,
    /// DAILY_QUESTION_TIME, local `HH:MM`
    pub daily_question_time: String,
    /// SCHEDULE_STATE_PATH
    pub schedule_state_path: PathBuf,
    /// SYSTEM_PROMPT
    pub system_prompt: String,
    /// FAILURE_MESSAGE
    pub failure_message: String,
}

fn non_empty_var(name: &str) -> Option<String> {
    env::var(name).ok().filter(|s| !s.trim().is_empty())
}

fn parse_var<T: std::str::FromStr>(name: &str, default: T) -> Result<T>
where
    T::Err: std::error::Error + Send + Sync + 'static,
{
    match non_empty_var(name) {
        Some(raw) => raw
            .trim()
            .parse()
            .with_context(|| format!("{} has an invalid value: {}", name, raw)),
        None => Ok(default),
    }
}

impl QuizBotConfig {
    /// Loads from env. `token` overrides BOT_TOKEN when given.
    pub fn load(token: Option<String>) -> Result<Self> {
        let telegram = TelegramConfig::load(token)?;
        let bot_username =
            non_empty_var("BOT_USERNAME").map(|s| s.trim().trim_start_matches('@').to_string());
        let target_chat_id = non_empty_var("TARGET_CHAT_ID")
            .map(|raw| {
                raw.trim()
                    .parse::<i64>()
                    .with_context(|| format!("TARGET_CHAT_ID is not a chat id: {}", raw))
            })
            .transpose()?;
        let log_file = env::var("LOG_FILE").unwrap_or_else(|_| DEFAULT_LOG_FILE.to_string());
        let port = parse_var("PORT", DEFAULT_PORT)?;
        let retention_secs = parse_var("RETENTION_SECS", DEFAULT_RETENTION_SECS)?;
        let daily_question_time = env::var("DAILY_QUESTION_TIME")
            .unwrap_or_else(|_| DEFAULT_DAILY_QUESTION_TIME.to_string());
        let schedule_state_path = env::var("SCHEDULE_STATE_PATH")
            .unwrap_or_else(|_| DEFAULT_SCHEDULE_STATE_PATH.to_string())
            .into();
        let system_prompt =
            non_empty_var("SYSTEM_PROMPT").unwrap_or_else(|| DEFAULT_SYSTEM_MESSAGE.to_string());
        let failure_message =
            non_empty_var("FAILURE_MESSAGE").unwrap_or_else(|| DEFAULT_FAILURE_MESSAGE.to_string());

        Ok(Self {
            telegram,
            bot_username,
            target_chat_id,
            log_file,
            port,
            retention_secs,
            daily_question_time,
            schedule_state_path,
            system_prompt,
            failure_message,
        })
    }

    /// Config with the given token and every other value at its default.
    pub fn with_token(bot_token: String) -> Self {
        Self {
            telegram: TelegramConfig::with_token(bot_token),
            bot_username: None,
            target_chat_id: None,
            log_file: DEFAULT_LOG_FILE.to_string(),
            port: DEFAULT_PORT,
            retention_secs: DEFAULT_RETENTION_SECS,
            daily_question_time: DEFAULT_DAILY_QUESTION_TIME.to_string(),
            schedule_state_path: DEFAULT_SCHEDULE_STATE_PATH.into(),
            system_prompt: DEFAULT_SYSTEM_MESSAGE.to_string(),
            failure_message: DEFAULT_FAILURE_MESSAGE.to_string(),
        }
    }

    /// Validate config: Telegram API URL, non-zero retention, `HH:MM` daily time.
    pub fn validate(&self) -> Result<()> {
        self.telegram.validate()?;
        if self.retention_secs == 0 {
            anyhow::bail!("RETENTION_SECS must be greater than zero");
        }
        self.daily_trigger_time()?;
        Ok(())
    }

    pub fn retention(&self) -> Duration {
        Duration::from_secs(self.retention_secs)
    }

    /// Local time of day of the daily question.
    pub fn daily_trigger_time(&self) -> Result<NaiveTime> {
        NaiveTime::parse_from_str(self.daily_question_time.trim(), "%H:%M").with_context(|| {
            format!(
                "DAILY_QUESTION_TIME must be HH:MM, got: {}",
                self.daily_question_time
            )
        })
    }
}
