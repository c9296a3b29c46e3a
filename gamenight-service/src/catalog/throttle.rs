use std::time::Duration;
use tokio::sync::Mutex;
use tokio::time::{sleep, Instant};

/// Single-slot limiter: at most one dispatch per `min_interval`.
///
/// The last dispatch time is held behind an async mutex for the whole
/// read-wait-update sequence, so concurrent callers queue (FIFO, tokio's mutex
/// is fair) instead of computing overlapping wait windows. Nobody is dropped.
///
/// Time comes from `tokio::time`, so a paused test runtime drives it.
#[derive(Debug)]
pub struct RequestThrottle {
    min_interval: Duration,
    last_dispatch: Mutex<Option<Instant>>,
}

impl RequestThrottle {
    pub fn new(min_interval: Duration) -> Self {
        Self {
            min_interval,
            last_dispatch: Mutex::new(None),
        }
    }

    pub fn min_interval(&self) -> Duration {
        self.min_interval
    }

    /// Waits until a dispatch is allowed and claims the slot.
    ///
    /// Returns how long the caller was held back by the interval (queueing
    /// behind other callers on the mutex is not counted).
    pub async fn acquire(&self) -> Duration {
        let mut last = self.last_dispatch.lock().await;

        let mut waited = Duration::ZERO;
        if let Some(previous) = *last {
            let elapsed = previous.elapsed();
            if elapsed < self.min_interval {
                waited = self.min_interval - elapsed;
                tracing::debug!(
                    wait_ms = waited.as_millis() as u64,
                    "Throttling before next catalog request"
                );
                sleep(waited).await;
            }
        }

        *last = Some(Instant::now());
        waited
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Arc;

    #[tokio::test(start_paused = true)]
    async fn first_call_is_not_delayed() {
        let throttle = RequestThrottle::new(Duration::from_secs(5));
        let start = Instant::now();

        let waited = throttle.acquire().await;

        assert_eq!(waited, Duration::ZERO);
        assert_eq!(Instant::now(), start);
    }

    #[tokio::test(start_paused = true)]
    async fn second_call_waits_out_the_remainder() {
        let throttle = RequestThrottle::new(Duration::from_secs(5));
        throttle.acquire().await;

        tokio::time::advance(Duration::from_secs(2)).await;
        let before = Instant::now();
        let waited = throttle.acquire().await;

        assert_eq!(waited, Duration::from_secs(3));
        assert!(Instant::now() - before >= Duration::from_secs(3));
    }

    #[tokio::test(start_paused = true)]
    async fn no_wait_once_interval_has_passed() {
        let throttle = RequestThrottle::new(Duration::from_secs(5));
        throttle.acquire().await;

        tokio::time::advance(Duration::from_secs(6)).await;

        assert_eq!(throttle.acquire().await, Duration::ZERO);
    }

    #[tokio::test(start_paused = true)]
    async fn concurrent_callers_are_spaced_by_interval() {
        const CALLERS: usize = 6;
        let interval = Duration::from_secs(5);
        let throttle = Arc::new(RequestThrottle::new(interval));
        let dispatches = Arc::new(std::sync::Mutex::new(Vec::new()));
        let start = Instant::now();

        let handles: Vec<_> = (0..CALLERS)
            .map(|_| {
                let throttle = throttle.clone();
                let dispatches = dispatches.clone();
                tokio::spawn(async move {
                    throttle.acquire().await;
                    dispatches.lock().unwrap().push(Instant::now());
                })
            })
            .collect();

        for handle in handles {
            handle.await.unwrap();
        }

        let mut times = dispatches.lock().unwrap().clone();
        assert_eq!(times.len(), CALLERS);
        times.sort();
        for (n, at) in times.iter().enumerate() {
            assert!(
                *at >= start + interval * n as u32,
                "dispatch {} happened {:?} after start",
                n,
                *at - start
            );
        }
        for pair in times.windows(2) {
            assert!(pair[1] - pair[0] >= interval);
        }
    }
}
