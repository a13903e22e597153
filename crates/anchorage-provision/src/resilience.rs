//! Request pacing for the control-plane client.

use std::sync::Arc;

use tokio::sync::Semaphore;
use tokio::time::{sleep, Duration};

/// Client-side rate limiter for control-plane requests.
///
/// Serialises requests through a single-permit [`Semaphore`] and holds the
/// permit for a fixed interval, capping throughput at the configured
/// number of requests per second.
#[derive(Debug, Clone)]
pub struct RateLimiter {
    semaphore: Arc<Semaphore>,
    interval: Duration,
}

impl RateLimiter {
    /// Creates a limiter allowing at most `requests_per_second` requests
    /// per second. Zero is treated as one.
    pub fn new(requests_per_second: u32) -> Self {
        Self {
            semaphore: Arc::new(Semaphore::new(1)),
            interval: Duration::from_millis(1000 / u64::from(requests_per_second.max(1))),
        }
    }

    /// Interval each request holds its slot for.
    pub fn interval(&self) -> Duration {
        self.interval
    }

    /// Waits until a request slot is available, then holds it for the
    /// configured interval.
    pub async fn acquire(&self) {
        // The semaphore is never closed.
        let _permit = self.semaphore.acquire().await.ok();
        sleep(self.interval).await;
    }
}
