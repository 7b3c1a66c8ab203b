// src/core/clock.rs
//
// Time sources behind traits so the cache TTL and the retry backoff can be
// driven by tests without waiting on the wall clock.

use std::sync::{Arc, Mutex};
use std::thread;
use std::time::{Duration, SystemTime};

use super::cancel::CancelToken;
use crate::error::Result;

pub trait Clock {
    fn now(&self) -> SystemTime;
}

impl<C: Clock + ?Sized> Clock for Arc<C> {
    fn now(&self) -> SystemTime {
        (**self).now()
    }
}

pub struct SystemClock;

impl Clock for SystemClock {
    fn now(&self) -> SystemTime {
        SystemTime::now()
    }
}

/// A clock that only moves when told to.
pub struct ManualClock {
    now: Mutex<SystemTime>,
}

impl ManualClock {
    pub fn new(start: SystemTime) -> Self {
        Self { now: Mutex::new(start) }
    }

    pub fn advance(&self, by: Duration) {
        if let Ok(mut now) = self.now.lock() {
            *now += by;
        }
    }
}

impl Clock for ManualClock {
    fn now(&self) -> SystemTime {
        match self.now.lock() {
            Ok(now) => *now,
            Err(poisoned) => *poisoned.into_inner(),
        }
    }
}

/// Blocking pause that gives up early when the token is cancelled.
pub trait Sleeper {
    fn sleep(&self, dur: Duration, cancel: &CancelToken) -> Result<()>;
}

impl<S: Sleeper + ?Sized> Sleeper for &S {
    fn sleep(&self, dur: Duration, cancel: &CancelToken) -> Result<()> {
        (**self).sleep(dur, cancel)
    }
}

/// Real sleeper. Sleeps in short slices and re-checks the token between them.
pub struct ThreadSleeper {
    slice: Duration,
}

impl Default for ThreadSleeper {
    fn default() -> Self {
        Self { slice: Duration::from_millis(50) }
    }
}

impl Sleeper for ThreadSleeper {
    fn sleep(&self, dur: Duration, cancel: &CancelToken) -> Result<()> {
        let mut left = dur;
        while !left.is_zero() {
            cancel.check()?;
            let step = left.min(self.slice);
            thread::sleep(step);
            left -= step;
        }
        cancel.check()
    }
}

/// Records requested pauses instead of sleeping.
#[derive(Default)]
pub struct RecordingSleeper {
    pauses: Mutex<Vec<Duration>>,
}

impl RecordingSleeper {
    pub fn pauses(&self) -> Vec<Duration> {
        self.pauses.lock().map(|p| p.clone()).unwrap_or_default()
    }
}

impl Sleeper for RecordingSleeper {
    fn sleep(&self, dur: Duration, cancel: &CancelToken) -> Result<()> {
        cancel.check()?;
        if let Ok(mut p) = self.pauses.lock() {
            p.push(dur);
        }
        Ok(())
    }
}
