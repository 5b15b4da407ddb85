//! Rate limiting service for controlling request frequency.

use crate::{
    config::RateLimitConfig,
    utils::clock::{Clock, SystemClock},
};
use std::{
    collections::HashMap,
    sync::{Arc, Mutex},
    time::{Duration, Instant},
};

/// Per-client request counter for the current window.
#[derive(Debug, Clone, Copy)]
struct RateLimitWindow {
    count: usize,
    started_at: Instant,
}

/// Simple in-memory rate limiter
///
/// Fixed-window counter keyed by client identity. A client gets
/// `requests_per_window` accepted requests per `period_seconds`; the window
/// restarts with the first request after it elapses.
#[derive(Clone)]
pub struct SimpleRateLimiter {
    config: RateLimitConfig,
    clock: Arc<dyn Clock>,
    storage: Arc<Mutex<HashMap<String, RateLimitWindow>>>,
}

impl SimpleRateLimiter {
    /// Create a new rate limiter with the given configuration
    pub fn new(config: RateLimitConfig) -> Self {
        Self::with_clock(config, Arc::new(SystemClock))
    }

    pub fn with_clock(config: RateLimitConfig, clock: Arc<dyn Clock>) -> Self {
        Self {
            config,
            clock,
            storage: Arc::new(Mutex::new(HashMap::new())),
        }
    }

    /// Window length; a zero period would expire every window at once
    fn period(&self) -> Duration {
        Duration::from_secs(self.config.period_seconds.max(1))
    }

    /// Check whether `client_id` may make another request.
    ///
    /// Returns `true` and counts the request if the client is within quota,
    /// `false` if rate limited. Denied requests are not counted.
    pub fn allow(&self, client_id: &str) -> bool {
        let mut storage = self.storage.lock().unwrap_or_else(|e| e.into_inner());
        let now = self.clock.now();
        let period = self.period();

        storage.retain(|_, window| now.duration_since(window.started_at) < period);

        match storage.get_mut(client_id) {
            Some(window) => {
                if window.count >= self.config.requests_per_window {
                    false
                } else {
                    window.count += 1;
                    true
                }
            }
            None => {
                if self.config.requests_per_window == 0 {
                    return false;
                }
                storage.insert(
                    client_id.to_string(),
                    RateLimitWindow {
                        count: 1,
                        started_at: now,
                    },
                );
                true
            }
        }
    }

    /// Number of clients with an open window.
    pub fn tracked_clients(&self) -> usize {
        self.storage.lock().unwrap_or_else(|e| e.into_inner()).len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::clock::ManualClock;

    fn limiter(clock: Arc<ManualClock>) -> SimpleRateLimiter {
        SimpleRateLimiter::with_clock(RateLimitConfig::default(), clock)
    }

    #[test]
    fn test_sixth_request_in_window_is_rejected() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(clock.clone());

        for i in 0..5 {
            assert!(limiter.allow("10.0.0.1"), "request {} should pass", i + 1);
            clock.advance(Duration::from_secs(5));
        }
        assert!(!limiter.allow("10.0.0.1"));
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_clients_are_counted_separately() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(clock);

        for _ in 0..5 {
            assert!(limiter.allow("10.0.0.1"));
        }
        assert!(!limiter.allow("10.0.0.1"));
        assert!(limiter.allow("10.0.0.2"));
        assert_eq!(limiter.tracked_clients(), 2);
    }

    #[test]
    fn test_window_resets_after_period() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(clock.clone());

        for _ in 0..5 {
            assert!(limiter.allow("10.0.0.1"));
        }
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(59));
        assert!(!limiter.allow("10.0.0.1"));

        clock.advance(Duration::from_secs(1));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_expired_windows_are_swept() {
        let clock = Arc::new(ManualClock::new());
        let limiter = limiter(clock.clone());

        limiter.allow("10.0.0.1");
        limiter.allow("10.0.0.2");
        assert_eq!(limiter.tracked_clients(), 2);

        clock.advance(Duration::from_secs(61));
        limiter.allow("10.0.0.3");
        assert_eq!(limiter.tracked_clients(), 1);
    }

    #[test]
    fn test_zero_quota_rejects_everything() {
        let limiter = SimpleRateLimiter::new(RateLimitConfig {
            requests_per_window: 0,
            period_seconds: 60,
        });
        assert!(!limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_zero_period_still_enforces_quota() {
        let clock = Arc::new(ManualClock::new());
        let limiter = SimpleRateLimiter::with_clock(
            RateLimitConfig {
                requests_per_window: 5,
                period_seconds: 0,
            },
            clock.clone(),
        );

        let accepted = (0..100).filter(|_| limiter.allow("10.0.0.1")).count();
        assert_eq!(accepted, 5);

        clock.advance(Duration::from_secs(1));
        assert!(limiter.allow("10.0.0.1"));
    }

    #[test]
    fn test_concurrent_requests_are_counted_consistently() {
        let limiter = SimpleRateLimiter::new(RateLimitConfig {
            requests_per_window: 50,
            period_seconds: 60,
        });

        let handles: Vec<_> = (0..8)
            .map(|_| {
                let limiter = limiter.clone();
                std::thread::spawn(move || (0..20).filter(|_| limiter.allow("shared")).count())
            })
            .collect();

        let accepted: usize = handles.into_iter().map(|h| h.join().unwrap()).sum();
        assert_eq!(accepted, 50);
    }
}
