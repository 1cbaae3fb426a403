//! Daily question scheduler: startup catch-up plus a wall-clock daily trigger.

use std::sync::Arc;
use std::time::Duration;

use chrono::{DateTime, Days, Local, NaiveTime, TimeZone, Utc};
use telegram_bot::{Bot, DbotError};
use thiserror::Error;
use tracing::{debug, error, info, instrument, warn};

use super::clock::{Clock, SystemClock};
use super::questions::QuestionCatalog;
use super::state::{DailyScheduleState, ScheduleStateStore, StateError};
use super::target::TargetChat;
use crate::retention::{RetentionJob, RetentionKey, RetentionScheduler};

/// Why a daily send did not complete.
#[derive(Error, Debug)]
pub enum DailyError {
    #[error("no target chat for the daily question")]
    NoTargetChat,

    #[error("failed to send daily question: {0}")]
    Send(#[from] DbotError),

    #[error("daily question sent but state not saved: {0}")]
    State(#[from] StateError),
}

/// A question that went out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DailySend {
    pub chat_id: i64,
    pub message_id: String,
    pub question: String,
    pub retention_key: RetentionKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StartupOutcome {
    Sent(DailySend),
    NotDue { last_sent_at: DateTime<Utc> },
}

/// Timing knobs for the scheduler.
#[derive(Debug, Clone, Copy)]
pub struct DailySettings {
    /// Local time of day of the periodic trigger.
    pub trigger_at: NaiveTime,
    /// Minimum gap since the last send before the startup check sends again.
    pub catch_up_interval: chrono::Duration,
    /// How long a sent question stays in the chat.
    pub retention: Duration,
}

impl DailySettings {
    pub fn new(trigger_at: NaiveTime, retention: Duration) -> Self {
        Self {
            trigger_at,
            catch_up_interval: chrono::Duration::days(1),
            retention,
        }
    }
}

/// True when nothing was sent yet or at least `interval` passed since `last`.
pub fn is_due(
    last: Option<DateTime<Utc>>,
    now: DateTime<Utc>,
    interval: chrono::Duration,
) -> bool {
    match last {
        None => true,
        Some(last) => now.signed_duration_since(last) >= interval,
    }
}

/// Next instant strictly after `now` whose local time of day is `at`.
///
/// Skipped local times (DST gaps) move on to the following day; ambiguous ones take the earlier
/// instant.
pub fn next_trigger_after<Tz: TimeZone>(now: &DateTime<Tz>, at: NaiveTime) -> DateTime<Tz> {
    let tz = now.timezone();
    let today = now.date_naive();
    for offset in 0..=2 {
        let Some(date) = today.checked_add_days(Days::new(offset)) else {
            break;
        };
        if let Some(candidate) = tz.from_local_datetime(&date.and_time(at)).earliest() {
            if candidate > *now {
                return candidate;
            }
        }
    }
    now.clone() + chrono::Duration::days(1)
}

/// Sends one random question per day to the target chat.
pub struct DailyQuestionScheduler {
    bot: Arc<dyn Bot>,
    target: TargetChat,
    catalog: QuestionCatalog,
    state: ScheduleStateStore,
    retention: RetentionScheduler,
    settings: DailySettings,
    clock: Arc<dyn Clock>,
}

impl DailyQuestionScheduler {
    pub fn new(
        bot: Arc<dyn Bot>,
        target: TargetChat,
        catalog: QuestionCatalog,
        state: ScheduleStateStore,
        retention: RetentionScheduler,
        settings: DailySettings,
    ) -> Self {
        Self {
            bot,
            target,
            catalog,
            state,
            retention,
            settings,
            clock: Arc::new(SystemClock),
        }
    }

    /// Replaces the wall clock the daily loop reads.
    pub fn with_clock(mut self, clock: Arc<dyn Clock>) -> Self {
        self.clock = clock;
        self
    }

    /// Sends now if the last send is missing or older than the catch-up interval.
    ///
    /// An unreadable state file counts as "never sent".
    #[instrument(skip(self))]
    pub async fn startup_check(&self, now: DateTime<Utc>) -> Result<StartupOutcome, DailyError> {
        let last = match self.state.load().await {
            Ok(state) => state.map(|s| s.last_sent_at),
            Err(e) => {
                warn!(error = %e, "Schedule state unreadable, treating as never sent");
                None
            }
        };

        match last {
            Some(last_sent_at) if !is_due(last, now, self.settings.catch_up_interval) => {
                info!(%last_sent_at, "Daily question not due at startup");
                return Ok(StartupOutcome::NotDue { last_sent_at });
            }
            _ => {}
        }

        info!(last_sent_at = ?last, "Daily question overdue, sending catch-up");
        self.send_daily_question(now).await.map(StartupOutcome::Sent)
    }

    /// Picks a question, sends it, arms its deletion and records `now` as the last send.
    ///
    /// The state is only written after the send succeeded.
    #[instrument(skip(self))]
    pub async fn send_daily_question(&self, now: DateTime<Utc>) -> Result<DailySend, DailyError> {
        let chat_id = self.target.get().await.ok_or(DailyError::NoTargetChat)?;
        let question = self.catalog.pick().to_string();

        let message_id = self.bot.send_message(chat_id, &question).await?;

        let retention_key = self.retention.schedule(
            RetentionJob::single(chat_id, message_id.clone()),
            self.settings.retention,
        );

        self.state
            .save(&DailyScheduleState { last_sent_at: now })
            .await?;

        info!(chat_id, message_id = %message_id, question = %question, "Daily question sent");
        Ok(DailySend {
            chat_id,
            message_id,
            question,
            retention_key,
        })
    }

    /// Sends one question at every local occurrence of the trigger time. Never returns.
    ///
    /// The next trigger is computed from the later of the clock and the previous trigger, so a
    /// wall clock stepped back after a send cannot fire the same day twice.
    pub async fn run(&self) {
        info!(trigger_at = %self.settings.trigger_at, "Daily question loop started");
        let mut last_trigger: Option<DateTime<Local>> = None;
        loop {
            let now = self.clock.now();
            let from = match last_trigger {
                Some(last) if last > now => last,
                _ => now,
            };
            let next = next_trigger_after(&from, self.settings.trigger_at);
            let wait = (next - now).to_std().unwrap_or(Duration::ZERO);
            debug!(next = %next, wait_secs = wait.as_secs(), "Sleeping until next daily question");
            tokio::time::sleep(wait).await;

            last_trigger = Some(next);
            self.fire(self.clock.now().with_timezone(&Utc)).await;
        }
    }

    async fn fire(&self, now: DateTime<Utc>) {
        match self.send_daily_question(now).await {
            Ok(_) => {}
            Err(DailyError::NoTargetChat) => {
                debug!("No target chat yet, daily question skipped");
            }
            Err(e) => error!(error = %e, "Daily question failed"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::FixedOffset;

    /// **Test: due without a last send or after a full interval; not due otherwise.**
    #[test]
    fn test_is_due() {
        let now = Utc.with_ymd_and_hms(2024, 5, 2, 12, 0, 0).unwrap();
        let day = chrono::Duration::days(1);

        assert!(is_due(None, now, day));
        assert!(is_due(Some(now - chrono::Duration::hours(25)), now, day));
        assert!(is_due(Some(now - day), now, day));
        assert!(!is_due(Some(now - chrono::Duration::hours(23)), now, day));
        // clock moved backwards
        assert!(!is_due(Some(now + chrono::Duration::hours(1)), now, day));
    }

    /// **Test: before the trigger time the next trigger is later today.**
    #[test]
    fn test_next_trigger_later_today() {
        let tz = FixedOffset::east_opt(3 * 3600).unwrap();
        let now = tz.with_ymd_and_hms(2024, 5, 2, 8, 30, 0).unwrap();
        let at = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

        assert_eq!(
            next_trigger_after(&now, at),
            tz.with_ymd_and_hms(2024, 5, 2, 10, 0, 0).unwrap()
        );
    }

    /// **Test: at or after the trigger time the next trigger is tomorrow, across a year boundary too.**
    #[test]
    fn test_next_trigger_rolls_to_tomorrow() {
        let tz = FixedOffset::east_opt(0).unwrap();
        let at = NaiveTime::from_hms_opt(10, 0, 0).unwrap();

        let exactly = tz.with_ymd_and_hms(2024, 12, 31, 10, 0, 0).unwrap();
        assert_eq!(
            next_trigger_after(&exactly, at),
            tz.with_ymd_and_hms(2025, 1, 1, 10, 0, 0).unwrap()
        );

        let after = tz.with_ymd_and_hms(2024, 5, 2, 23, 59, 59).unwrap();
        assert_eq!(
            next_trigger_after(&after, at),
            tz.with_ymd_and_hms(2024, 5, 3, 10, 0, 0).unwrap()
        );
    }

    /// **Test: the catch-up interval defaults to one day.**
    #[test]
    fn test_settings_default_interval_is_one_day() {
        let settings = DailySettings::new(
            NaiveTime::from_hms_opt(10, 0, 0).unwrap(),
            Duration::from_secs(60),
        );
        assert_eq!(settings.catch_up_interval, chrono::Duration::days(1));
    }
}
