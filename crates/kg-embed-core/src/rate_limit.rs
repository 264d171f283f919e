use std::time::Duration;

use tokio::sync::Mutex;
use tokio::time::{Instant, sleep};
use tracing::info;

/// Fixed minimum spacing between outbound calls, shared by every caller.
///
/// There is no burst allowance: each `acquire` waits until at least
/// `1 / calls_per_second` has elapsed since the previous one was granted.
/// The last-call timestamp is held under an async mutex for the whole
/// check-wait-record sequence, so concurrent callers queue up in arrival
/// order and each one observes the timestamp written by its predecessor.
#[derive(Debug)]
pub struct RateLimiter {
    calls_per_second: u32,
    interval: Duration,
    last_call: Mutex<Option<Instant>>,
}

impl RateLimiter {
    /// Create a limiter allowing `calls` outbound calls per second.
    /// Zero is treated as one call per second.
    pub fn per_second(calls: u32) -> Self {
        let calls = calls.max(1);
        Self {
            calls_per_second: calls,
            interval: Duration::from_secs_f64(1.0 / f64::from(calls)),
            last_call: Mutex::new(None),
        }
    }

    /// Wait until the next call is allowed, then record it.
    ///
    /// Returns how long this caller slept (zero when no wait was needed).
    /// Time spent queued behind other callers on the mutex is not included.
    pub async fn acquire(&self) -> Duration {
        let mut last_call = self.last_call.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last_call {
            let elapsed = previous.elapsed();
            if elapsed < self.interval {
                waited = self.interval - elapsed;
                info!("Rate limiting: sleeping for {:.2}s", waited.as_secs_f64());
                sleep(waited).await;
            }
        }

        *last_call = Some(Instant::now());
        waited
    }

    pub fn calls_per_second(&self) -> u32 {
        self.calls_per_second
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Human-readable rate, e.g. `"3 req/sec"`.
    pub fn describe(&self) -> String {
        format!("{} req/sec", self.calls_per_second)
    }
}
