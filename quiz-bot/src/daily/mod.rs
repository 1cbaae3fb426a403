//! Daily random interview question.
//!
//! [`DailyQuestionScheduler`] sends one question from the [`QuestionCatalog`] to the
//! [`TargetChat`] on startup when overdue and then every day at a fixed local time. The time of
//! the last send survives restarts through [`ScheduleStateStore`].

mod clock;
mod questions;
mod scheduler;
mod state;
mod target;

pub use clock::{Clock, SystemClock};
pub use questions::QuestionCatalog;
pub use scheduler::{
    is_due, next_trigger_after, DailyError, DailyQuestionScheduler, DailySend, DailySettings,
    StartupOutcome,
};
pub use state::{DailyScheduleState, ScheduleStateStore, StateError};
pub use target::TargetChat;
