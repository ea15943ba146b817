//! In-memory per-key rate limiting.
//!
//! Sliding 60-second window: each accepted request is recorded with its
//! arrival instant, entries older than the window are evicted on the
//! next check, and the request is rejected once the window holds the
//! configured limit. State is process-local and not persisted.

use std::collections::{HashMap, VecDeque};
use std::sync::Mutex;
use std::time::{Duration, Instant};
use thiserror::Error;

/// The sliding window length
const WINDOW: Duration = Duration::from_secs(60);

/// Rate limit exceeded
#[derive(Debug, Error)]
#[error("Rate limit of {limit_per_minute} requests per minute exceeded")]
pub struct RateLimitError {
    /// The configured per-minute limit
    pub limit_per_minute: u32,
}

/// Per-key sliding-window rate limiter
#[derive(Debug)]
pub struct RateLimiter {
    limit_per_minute: u32,
    store: Mutex<HashMap<String, VecDeque<Instant>>>,
}

impl RateLimiter {
    /// Create a limiter with the given per-minute limit
    pub fn new(limit_per_minute: u32) -> Self {
        Self {
            limit_per_minute: limit_per_minute.max(1),
            store: Mutex::new(HashMap::new()),
        }
    }

    /// Record one request for the key, rejecting it if the key already
    /// used its budget within the last 60 seconds.
    pub fn check(&self, api_key: &str) -> Result<(), RateLimitError> {
        self.check_at(api_key, Instant::now())
    }

    fn check_at(&self, api_key: &str, now: Instant) -> Result<(), RateLimitError> {
        let mut store = self.store.lock().unwrap_or_else(|e| e.into_inner());
        let bucket = store.entry(api_key.to_string()).or_default();

        while let Some(&front) = bucket.front() {
            if now.duration_since(front) >= WINDOW {
                bucket.pop_front();
            } else {
                break;
            }
        }

        if bucket.len() >= self.limit_per_minute as usize {
            return Err(RateLimitError {
                limit_per_minute: self.limit_per_minute,
            });
        }

        bucket.push_back(now);
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_allows_up_to_limit() {
        let limiter = RateLimiter::new(3);
        assert!(limiter.check("key").is_ok());
        assert!(limiter.check("key").is_ok());
        assert!(limiter.check("key").is_ok());
        assert!(limiter.check("key").is_err());
    }

    #[test]
    fn test_keys_are_independent() {
        let limiter = RateLimiter::new(1);
        assert!(limiter.check("alpha").is_ok());
        assert!(limiter.check("beta").is_ok());
        assert!(limiter.check("alpha").is_err());
    }

    #[test]
    fn test_window_eviction() {
        let limiter = RateLimiter::new(2);
        let start = Instant::now();

        assert!(limiter.check_at("key", start).is_ok());
        assert!(limiter.check_at("key", start).is_ok());
        assert!(limiter.check_at("key", start).is_err());

        // Both entries fall out of the window 61 seconds later.
        let later = start + Duration::from_secs(61);
        assert!(limiter.check_at("key", later).is_ok());
        assert!(limiter.check_at("key", later).is_ok());
        assert!(limiter.check_at("key", later).is_err());
    }

    #[test]
    fn test_zero_limit_is_raised_to_one() {
        let limiter = RateLimiter::new(0);
        assert!(limiter.check("key").is_ok());
        assert!(limiter.check("key").is_err());
    }

    #[test]
    fn test_error_reports_limit() {
        let limiter = RateLimiter::new(1);
        limiter.check("key").unwrap();
        let err = limiter.check("key").unwrap_err();
        assert_eq!(err.limit_per_minute, 1);
    }
}
