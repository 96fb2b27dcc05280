//! Blocking wait strategies used between retry attempts.

use parking_lot::Mutex;
use std::fmt::Debug;
use std::sync::Arc;
use std::time::Duration;

pub trait Sleeper: Debug + Send + Sync {
    fn sleep(&self, duration: Duration);
}

/// Blocks the calling thread.
#[derive(Debug, Clone, Copy, Default)]
pub struct ThreadSleeper;

impl Sleeper for ThreadSleeper {
    fn sleep(&self, duration: Duration) {
        if !duration.is_zero() {
            std::thread::sleep(duration);
        }
    }
}

/// Returns immediately.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopSleeper;

impl Sleeper for NoopSleeper {
    fn sleep(&self, _duration: Duration) {}
}

/// Records requested waits without blocking. Clones share the record.
#[derive(Debug, Clone, Default)]
pub struct TrackingSleeper {
    waits: Arc<Mutex<Vec<Duration>>>,
}

impl TrackingSleeper {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn waits(&self) -> Vec<Duration> {
        self.waits.lock().clone()
    }

    pub fn total(&self) -> Duration {
        self.waits.lock().iter().sum()
    }
}

impl Sleeper for TrackingSleeper {
    fn sleep(&self, duration: Duration) {
        self.waits.lock().push(duration);
    }
}
