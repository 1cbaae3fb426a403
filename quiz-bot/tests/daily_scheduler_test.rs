//! Integration tests for [`quiz_bot::daily::DailyQuestionScheduler`].
//!
//! Covers: startup catch-up (stale, recent, missing state), state written only after a
//! successful send, missing target chat, the retention of the sent question, and the daily loop
//! on a paused clock (unconditional trigger, no target yet, wall clock stepped back).

use std::sync::Arc;
use std::time::Duration;

use chrono::{Local, NaiveTime, TimeZone, Utc};
use prompt::ChatMessage;
use quiz_bot::daily::{
    DailyError, DailyQuestionScheduler, DailyScheduleState, DailySettings, QuestionCatalog,
    ScheduleStateStore, StartupOutcome, TargetChat,
};
use quiz_bot::{ConversationStore, RetentionScheduler};
use telegram_bot::Bot;
use tempfile::TempDir;

mod common;
use common::{MockBot, TestClock};

const RETENTION: Duration = Duration::from_secs(600);

struct Fixture {
    _dir: TempDir,
    bot: Arc<MockBot>,
    store: ConversationStore,
    retention: RetentionScheduler,
    state: ScheduleStateStore,
    target: TargetChat,
    scheduler: Arc<DailyQuestionScheduler>,
}

fn fixture(target: Option<i64>) -> Fixture {
    build_fixture(target, None)
}

fn fixture_with_clock(target: Option<i64>, clock: Arc<TestClock>) -> Fixture {
    build_fixture(target, Some(clock))
}

fn build_fixture(target: Option<i64>, clock: Option<Arc<TestClock>>) -> Fixture {
    let dir = TempDir::new().unwrap();
    let bot = MockBot::new();
    let store = ConversationStore::new("system");
    let retention = RetentionScheduler::new(bot.clone() as Arc<dyn Bot>, store.clone());
    let state = ScheduleStateStore::new(dir.path().join("daily_question.json"));
    let target = TargetChat::new(target);
    let mut scheduler = DailyQuestionScheduler::new(
        bot.clone(),
        target.clone(),
        QuestionCatalog::builtin(),
        state.clone(),
        retention.clone(),
        DailySettings::new(NaiveTime::from_hms_opt(10, 0, 0).unwrap(), RETENTION),
    );
    if let Some(clock) = clock {
        scheduler = scheduler.with_clock(clock);
    }
    Fixture {
        _dir: dir,
        bot,
        store,
        retention,
        state,
        target,
        scheduler: Arc::new(scheduler),
    }
}

/// **Test: stale lastSentAt at startup ⇒ exactly one send; state updated to now.**
#[tokio::test]
async fn test_startup_with_stale_state_sends_once() {
    let f = fixture(Some(77));
    let now = Utc::now();
    f.state
        .save(&DailyScheduleState {
            last_sent_at: now - chrono::Duration::days(2),
        })
        .await
        .unwrap();

    let outcome = f.scheduler.startup_check(now).await.unwrap();

    let sent = f.bot.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 77);
    assert!(!sent[0].html);
    assert!(QuestionCatalog::builtin()
        .questions()
        .iter()
        .any(|q| *q == sent[0].text));

    match outcome {
        StartupOutcome::Sent(send) => {
            assert_eq!(send.message_id, sent[0].message_id);
            assert_eq!(send.question, sent[0].text);
            assert!(f.retention.is_armed(&send.retention_key));
        }
        other => panic!("expected a send, got {:?}", other),
    }

    let saved = f.state.load().await.unwrap().unwrap();
    assert_eq!(saved.last_sent_at.timestamp_millis(), now.timestamp_millis());
}

/// **Test: recent lastSentAt ⇒ no startup send, state untouched.**
#[tokio::test]
async fn test_startup_with_recent_state_does_nothing() {
    let f = fixture(Some(77));
    let now = Utc::now();
    let last = DailyScheduleState {
        last_sent_at: now - chrono::Duration::hours(3),
    };
    f.state.save(&last).await.unwrap();

    let outcome = f.scheduler.startup_check(now).await.unwrap();

    assert!(matches!(outcome, StartupOutcome::NotDue { .. }));
    assert!(f.bot.sent().is_empty());
    assert_eq!(
        f.state.load().await.unwrap().unwrap().last_sent_at.timestamp_millis(),
        last.last_sent_at.timestamp_millis()
    );
}

/// **Test: no state file at all ⇒ startup send.**
#[tokio::test]
async fn test_startup_without_state_sends() {
    let f = fixture(Some(5));

    let outcome = f.scheduler.startup_check(Utc::now()).await.unwrap();

    assert!(matches!(outcome, StartupOutcome::Sent(_)));
    assert_eq!(f.bot.sent().len(), 1);
    assert!(f.state.load().await.unwrap().is_some());
}

/// **Test: failed send leaves lastSentAt unchanged and arms nothing.**
#[tokio::test]
async fn test_failed_send_keeps_state() {
    let f = fixture(Some(77));
    let now = Utc::now();
    let last = DailyScheduleState {
        last_sent_at: now - chrono::Duration::days(2),
    };
    f.state.save(&last).await.unwrap();
    f.bot.fail_sends(true);

    let err = f.scheduler.send_daily_question(now).await.unwrap_err();

    assert!(matches!(err, DailyError::Send(_)));
    assert_eq!(
        f.state.load().await.unwrap().unwrap().last_sent_at.timestamp_millis(),
        last.last_sent_at.timestamp_millis()
    );
    assert_eq!(f.retention.pending(), 0);
}

/// **Test: no target chat ⇒ NoTargetChat, nothing sent, no state written.**
#[tokio::test]
async fn test_no_target_chat_is_skipped() {
    let f = fixture(None);

    let err = f.scheduler.startup_check(Utc::now()).await.unwrap_err();

    assert!(matches!(err, DailyError::NoTargetChat));
    assert!(f.bot.sent().is_empty());
    assert!(f.state.load().await.unwrap().is_none());
}

/// **Test: corrupt state file counts as never sent.**
#[tokio::test]
async fn test_corrupt_state_triggers_catch_up() {
    let f = fixture(Some(1));
    std::fs::write(f.state.path(), "{broken").unwrap();

    let outcome = f.scheduler.startup_check(Utc::now()).await.unwrap();

    assert!(matches!(outcome, StartupOutcome::Sent(_)));
    assert!(f.state.load().await.unwrap().is_some());
}

/// **Test: the question is deleted after the retention delay; chat history is kept.**
#[tokio::test(start_paused = true)]
async fn test_question_deleted_after_retention_history_kept() {
    let f = fixture(Some(8));
    f.store.append(8, ChatMessage::user("earlier question")).await;

    let send = f.scheduler.send_daily_question(Utc::now()).await.unwrap();
    tokio::time::sleep(RETENTION + Duration::from_secs(1)).await;

    let deletes = f.bot.deletes();
    assert_eq!(deletes.len(), 1);
    assert_eq!(deletes[0].chat_id, 8);
    assert_eq!(deletes[0].message_id, send.message_id);
    assert!(f.store.contains(8).await);
}

fn local(h: u32, m: u32, sec: u32) -> chrono::DateTime<Local> {
    Local
        .with_ymd_and_hms(2024, 1, 15, h, m, sec)
        .earliest()
        .unwrap()
}

fn spawn_loop(f: &Fixture) -> tokio::task::JoinHandle<()> {
    let scheduler = f.scheduler.clone();
    tokio::spawn(async move { scheduler.run().await })
}

const MINUTE: Duration = Duration::from_secs(60);
const HOUR: Duration = Duration::from_secs(3600);

/// **Test: the daily trigger sends once even though lastSentAt is only an hour old.**
#[tokio::test(start_paused = true)]
async fn test_trigger_sends_regardless_of_last_sent_at() {
    let clock = TestClock::starting_at(local(9, 59, 0));
    let f = fixture_with_clock(Some(77), clock.clone());
    let last = DailyScheduleState {
        last_sent_at: local(8, 59, 0).with_timezone(&Utc),
    };
    f.state.save(&last).await.unwrap();

    let task = spawn_loop(&f);

    tokio::time::sleep(Duration::from_secs(59)).await;
    assert!(f.bot.sent().is_empty());

    tokio::time::sleep(Duration::from_secs(2)).await;
    let sent = f.bot.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 77);
    let saved = f.state.load().await.unwrap().unwrap();
    assert!(saved.last_sent_at > last.last_sent_at);

    tokio::time::sleep(HOUR).await;
    assert_eq!(f.bot.sent().len(), 1);
    task.abort();
}

/// **Test: without a target chat the trigger is skipped; the loop sends once one is claimed.**
#[tokio::test(start_paused = true)]
async fn test_trigger_without_target_keeps_running() {
    let clock = TestClock::starting_at(local(9, 59, 0));
    let f = fixture_with_clock(None, clock);

    let task = spawn_loop(&f);

    tokio::time::sleep(2 * MINUTE).await;
    assert!(f.bot.sent().is_empty());
    assert!(f.state.load().await.unwrap().is_none());
    assert!(!task.is_finished());

    assert!(f.target.claim(5).await);
    tokio::time::sleep(24 * HOUR).await;

    let sent = f.bot.sent();
    assert_eq!(sent.len(), 1);
    assert_eq!(sent[0].chat_id, 5);
    task.abort();
}

/// **Test: a wall clock stepped back while waiting does not fire a second time the same day.**
#[tokio::test(start_paused = true)]
async fn test_clock_stepped_back_fires_once_per_day() {
    let clock = TestClock::starting_at(local(9, 0, 0));
    let f = fixture_with_clock(Some(3), clock.clone());

    let task = spawn_loop(&f);

    tokio::time::sleep(30 * MINUTE).await;
    clock.step(-chrono::Duration::hours(1));

    tokio::time::sleep(31 * MINUTE).await;
    assert_eq!(f.bot.sent().len(), 1);

    tokio::time::sleep(2 * HOUR).await;
    assert_eq!(f.bot.sent().len(), 1);

    tokio::time::sleep(23 * HOUR).await;
    assert_eq!(f.bot.sent().len(), 2);
    task.abort();
}
