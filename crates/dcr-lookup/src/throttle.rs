//! Minimum spacing between outbound requests.

use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::{Duration, Instant};

use tracing::trace;

/// Enforces a minimum interval between calls to [`Throttle::wait`].
///
/// The lock is held across check, sleep and stamp, so concurrent callers
/// queue up instead of racing past the same deadline.
#[derive(Debug)]
pub struct Throttle {
    interval: Duration,
    last: Mutex<Option<Instant>>,
}

impl Throttle {
    pub fn new(interval: Duration) -> Self {
        Self {
            interval,
            last: Mutex::new(None),
        }
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Blocks until the interval since the previous call has elapsed.
    pub fn wait(&self) {
        let mut last = self.last.lock().unwrap_or_else(PoisonError::into_inner);
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                let pause = self.interval - elapsed;
                trace!(pause_ms = pause.as_millis() as u64, "throttling request");
                thread::sleep(pause);
            }
        }
        *last = Some(Instant::now());
    }
}
