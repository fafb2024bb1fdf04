//! Rate Limiting Infrastructure
//!
//! Fixed-window request counting per client key.
//!
//! Every client's counter is cleared at the same moment, once per window, by
//! a background task. A client can therefore get up to `2 * max_requests`
//! requests through in a short span that straddles a reset.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;

use tokio::task::JoinHandle;
use tokio::time::{Instant, MissedTickBehavior, interval_at};

/// Rate limit configuration
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Maximum requests allowed in the window
    pub max_requests: u32,
    /// Time window duration
    pub window: Duration,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        Self {
            max_requests: 200,
            window: Duration::from_secs(60),
        }
    }
}

impl RateLimitConfig {
    pub fn new(max_requests: u32, window: Duration) -> Self {
        Self {
            max_requests,
            window,
        }
    }
}

/// Outcome of one counted request
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateLimitDecision {
    Allowed,
    Limited,
}

impl RateLimitDecision {
    pub fn is_allowed(self) -> bool {
        matches!(self, Self::Allowed)
    }
}

type Counters = Arc<Mutex<HashMap<String, u32>>>;

/// In-process fixed-window limiter
///
/// Counters are only ever incremented or cleared all at once; a rejected
/// request still counts. One lock guards both paths.
#[derive(Debug)]
pub struct FixedWindowRateLimiter {
    config: RateLimitConfig,
    counters: Counters,
    reset_task: Mutex<Option<JoinHandle<()>>>,
}

impl FixedWindowRateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            counters: Arc::new(Mutex::new(HashMap::new())),
            reset_task: Mutex::new(None),
        }
    }

    pub fn config(&self) -> &RateLimitConfig {
        &self.config
    }

    /// Count one request for `key` and decide whether it may proceed
    pub fn allow(&self, key: &str) -> RateLimitDecision {
        let mut counters = self.counters.lock().unwrap_or_else(PoisonError::into_inner);

        let count = match counters.get_mut(key) {
            Some(count) => {
                *count = count.saturating_add(1);
                *count
            }
            None => {
                counters.insert(key.to_string(), 1);
                1
            }
        };

        if count > self.config.max_requests {
            RateLimitDecision::Limited
        } else {
            RateLimitDecision::Allowed
        }
    }

    /// Clear every client's counter
    pub fn reset(&self) {
        clear(&self.counters);
    }

    /// Spawn the periodic reset task on the current tokio runtime
    ///
    /// The first reset happens one full window from now. Calling `start`
    /// again replaces the running task.
    pub fn start(&self) {
        let counters = Arc::clone(&self.counters);
        let window = self.config.window;

        let handle = tokio::spawn(async move {
            let mut ticker = interval_at(Instant::now() + window, window);
            ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);
            loop {
                ticker.tick().await;
                clear(&counters);
                tracing::debug!("Rate limit window reset");
            }
        });

        let previous = self
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
        tracing::info!(
            max_requests = self.config.max_requests,
            window = ?window,
            "Rate limiter started"
        );
    }

    /// Stop the periodic reset task, if running
    pub fn stop(&self) {
        let handle = self
            .reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
            tracing::info!("Rate limiter stopped");
        }
    }

    pub fn is_running(&self) -> bool {
        self.reset_task
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .as_ref()
            .is_some_and(|handle| !handle.is_finished())
    }
}

impl Drop for FixedWindowRateLimiter {
    fn drop(&mut self) {
        let handle = self
            .reset_task
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take();
        if let Some(handle) = handle {
            handle.abort();
        }
    }
}

fn clear(counters: &Counters) {
    let mut counters = counters.lock().unwrap_or_else(PoisonError::into_inner);
    *counters = HashMap::new();
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Barrier;
    use std::thread;

    fn limiter(max_requests: u32, window: Duration) -> FixedWindowRateLimiter {
        FixedWindowRateLimiter::new(RateLimitConfig::new(max_requests, window))
    }

    #[test]
    fn test_boundary() {
        let limiter = limiter(3, Duration::from_secs(60));

        for _ in 0..3 {
            assert_eq!(limiter.allow("10.0.0.1"), RateLimitDecision::Allowed);
        }
        assert_eq!(limiter.allow("10.0.0.1"), RateLimitDecision::Limited);
        assert_eq!(limiter.allow("10.0.0.1"), RateLimitDecision::Limited);
    }

    #[test]
    fn test_clients_are_counted_separately() {
        let limiter = limiter(1, Duration::from_secs(60));

        assert!(limiter.allow("10.0.0.1").is_allowed());
        assert!(limiter.allow("10.0.0.2").is_allowed());
        assert!(!limiter.allow("10.0.0.1").is_allowed());
    }

    #[test]
    fn test_rejected_requests_still_count() {
        let limiter = limiter(1, Duration::from_secs(60));
        for _ in 0..5 {
            limiter.allow("c");
        }
        let counters = limiter.counters.lock().unwrap();
        assert_eq!(counters.get("c"), Some(&5));
    }

    #[test]
    fn test_manual_reset() {
        let limiter = limiter(1, Duration::from_secs(60));
        assert!(limiter.allow("c").is_allowed());
        assert!(!limiter.allow("c").is_allowed());

        limiter.reset();
        assert!(limiter.allow("c").is_allowed());
    }

    #[test]
    fn test_concurrent_calls_lose_no_updates() {
        const THREADS: usize = 64;
        const LIMIT: u32 = 10;

        let limiter = Arc::new(limiter(LIMIT, Duration::from_secs(60)));
        let barrier = Arc::new(Barrier::new(THREADS));

        let handles: Vec<_> = (0..THREADS)
            .map(|_| {
                let limiter = Arc::clone(&limiter);
                let barrier = Arc::clone(&barrier);
                thread::spawn(move || {
                    barrier.wait();
                    limiter.allow("same-client")
                })
            })
            .collect();

        let decisions: Vec<_> = handles.into_iter().map(|h| h.join().unwrap()).collect();
        let allowed = decisions.iter().filter(|d| d.is_allowed()).count();

        assert_eq!(allowed, LIMIT as usize);
        assert_eq!(decisions.len() - allowed, THREADS - LIMIT as usize);
    }

    #[tokio::test]
    async fn test_window_elapses() {
        let limiter = limiter(2, Duration::from_millis(100));
        limiter.start();
        assert!(limiter.is_running());

        assert!(limiter.allow("c").is_allowed());
        assert!(limiter.allow("c").is_allowed());
        assert!(!limiter.allow("c").is_allowed());

        tokio::time::sleep(Duration::from_millis(250)).await;
        assert!(limiter.allow("c").is_allowed());

        limiter.stop();
        assert!(!limiter.is_running());
    }

    #[tokio::test]
    async fn test_stopped_limiter_no_longer_resets() {
        let limiter = limiter(1, Duration::from_millis(50));
        limiter.start();
        limiter.stop();

        assert!(limiter.allow("c").is_allowed());
        tokio::time::sleep(Duration::from_millis(150)).await;
        assert!(!limiter.allow("c").is_allowed());
    }
}
