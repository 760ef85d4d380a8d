//! Blocking delays and wall-clock reads, injectable so tests never wait.

use chrono::NaiveDateTime;
use std::time::Duration;

/// Blocking pause between provider requests.
pub trait Sleeper: Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Source of collection timestamps.
pub trait Clock: Send + Sync {
    fn now(&self) -> NaiveDateTime;
}

/// Real blocking sleep on the calling thread.
#[derive(Debug, Default, Clone, Copy)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        std::thread::sleep(duration);
    }
}

/// Local wall-clock time.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> NaiveDateTime {
        chrono::Local::now().naive_local()
    }
}
