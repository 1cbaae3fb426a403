//! Wall-clock source for the daily trigger.

use chrono::{DateTime, Local};

/// Current local wall-clock time. Tests substitute a controllable clock.
pub trait Clock: Send + Sync {
    fn now(&self) -> DateTime<Local>;
}

/// The host's clock.
#[derive(Debug, Clone, Copy, Default)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> DateTime<Local> {
        Local::now()
    }
}
