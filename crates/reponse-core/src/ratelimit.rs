//! Process-wide sliding-window rate limiting.
//!
//! One limiter instance is created at startup and shared by every
//! evaluation call; there is no module-level singleton. The bucket map
//! is swept lazily so memory stays bounded without a timer thread.

use std::collections::HashMap;
use std::sync::Mutex;
use std::time::{Duration, Instant};

/// How often the lazy bucket sweep may run.
const SWEEP_INTERVAL: Duration = Duration::from_secs(300);

/// Settings for the sliding window.
#[derive(Debug, Clone, Copy)]
pub struct RateLimitConfig {
    /// Length of the rolling window.
    pub window: Duration,
    /// Maximum admitted requests per key within any rolling window.
    pub max_requests: usize,
}

impl Default for RateLimitConfig {
    fn default() -> Self {
        // Classroom-scale traffic: 30 evaluations per minute per caller.
        Self {
            window: Duration::from_secs(60),
            max_requests: 30,
        }
    }
}

/// Outcome of an admission check.
#[derive(Debug, Clone, Copy)]
pub struct RateDecision {
    pub allowed: bool,
    /// Admissions left in the current window (after this one, if allowed).
    pub remaining: usize,
    /// When the window frees up: for rejections, when the oldest
    /// in-window request expires.
    pub reset_at: Instant,
}

impl RateDecision {
    /// Seconds until the caller may retry, rounded up. Zero when allowed.
    pub fn retry_after_secs(&self, now: Instant) -> u64 {
        if self.allowed {
            return 0;
        }
        let wait = self.reset_at.saturating_duration_since(now);
        wait.as_secs() + u64::from(wait.subsec_nanos() > 0)
    }
}

/// Sliding-window admission control keyed by caller identity.
pub struct RateLimiter {
    config: RateLimitConfig,
    buckets: Mutex<Buckets>,
}

struct Buckets {
    by_key: HashMap<String, Vec<Instant>>,
    last_sweep: Instant,
}

impl RateLimiter {
    pub fn new(config: RateLimitConfig) -> Self {
        Self {
            config,
            buckets: Mutex::new(Buckets {
                by_key: HashMap::new(),
                last_sweep: Instant::now(),
            }),
        }
    }

    /// Admit or reject one request for `key`, recording it if admitted.
    pub fn check(&self, key: &str) -> RateDecision {
        self.check_at(key, Instant::now())
    }

    // Separated out so tests can drive the clock.
    fn check_at(&self, key: &str, now: Instant) -> RateDecision {
        let window = self.config.window;
        let mut buckets = self
            .buckets
            .lock()
            .expect("rate limiter mutex poisoned");

        if now.duration_since(buckets.last_sweep) >= SWEEP_INTERVAL {
            buckets
                .by_key
                .retain(|_, stamps| stamps.iter().any(|t| now.duration_since(*t) < window));
            buckets.last_sweep = now;
        }

        let stamps = buckets.by_key.entry(key.to_string()).or_default();
        stamps.retain(|t| now.duration_since(*t) < window);

        if stamps.len() < self.config.max_requests {
            stamps.push(now);
            RateDecision {
                allowed: true,
                remaining: self.config.max_requests - stamps.len(),
                reset_at: now + window,
            }
        } else {
            // Timestamps are appended in order, so the first is the oldest.
            let oldest = stamps[0];
            RateDecision {
                allowed: false,
                remaining: 0,
                reset_at: oldest + window,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn limiter(window_ms: u64, max: usize) -> RateLimiter {
        RateLimiter::new(RateLimitConfig {
            window: Duration::from_millis(window_ms),
            max_requests: max,
        })
    }

    #[test]
    fn admits_up_to_max_then_rejects() {
        let limiter = limiter(60_000, 3);
        assert!(limiter.check("alice").allowed);
        assert!(limiter.check("alice").allowed);
        let third = limiter.check("alice");
        assert!(third.allowed);
        assert_eq!(third.remaining, 0);

        let rejected = limiter.check("alice");
        assert!(!rejected.allowed);
        assert!(rejected.retry_after_secs(Instant::now()) > 0);
    }

    #[test]
    fn keys_are_independent() {
        let limiter = limiter(60_000, 1);
        assert!(limiter.check("alice").allowed);
        assert!(limiter.check("bob").allowed);
        assert!(!limiter.check("alice").allowed);
    }

    #[test]
    fn window_slides() {
        let limiter = limiter(60_000, 2);
        let start = Instant::now();
        assert!(limiter.check_at("k", start).allowed);
        assert!(limiter.check_at("k", start).allowed);
        assert!(!limiter.check_at("k", start + Duration::from_secs(30)).allowed);
        // First two timestamps have aged out.
        assert!(limiter.check_at("k", start + Duration::from_secs(61)).allowed);
    }

    #[test]
    fn rejection_reports_oldest_expiry() {
        let limiter = limiter(60_000, 1);
        let start = Instant::now();
        assert!(limiter.check_at("k", start).allowed);
        let rejected = limiter.check_at("k", start + Duration::from_secs(10));
        assert_eq!(rejected.reset_at, start + Duration::from_secs(60));
    }

    #[test]
    fn sweep_drops_expired_buckets() {
        let limiter = limiter(1_000, 5);
        let start = Instant::now();
        limiter.check_at("old", start);
        // Past the sweep interval, with the bucket's entries all expired.
        limiter.check_at("new", start + SWEEP_INTERVAL + Duration::from_secs(1));
        let buckets = limiter.buckets.lock().unwrap();
        assert!(!buckets.by_key.contains_key("old"));
        assert!(buckets.by_key.contains_key("new"));
    }

    #[test]
    fn never_over_admits_under_concurrency() {
        let limiter = Arc::new(limiter(60_000, 10));
        let admitted = Arc::new(AtomicUsize::new(0));
        let mut handles = Vec::new();
        for _ in 0..8 {
            let limiter = Arc::clone(&limiter);
            let admitted = Arc::clone(&admitted);
            handles.push(std::thread::spawn(move || {
                for _ in 0..50 {
                    if limiter.check("shared").allowed {
                        admitted.fetch_add(1, Ordering::Relaxed);
                    }
                }
            }));
        }
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(admitted.load(Ordering::Relaxed), 10);
    }
}
