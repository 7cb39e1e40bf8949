//! Bounded retry with exponential backoff.
//!
//! The policy is plain data handed to the transport through its
//! configuration.  The transport asks it whether a failed attempt should be
//! retried and how long to wait first.

use std::time::Duration;

use crate::error::Error;

/// Default number of retries after the first attempt.
const DEFAULT_MAX_RETRIES: u32 = 3;
/// Default delay before the first retry.
const DEFAULT_INITIAL_BACKOFF: Duration = Duration::from_millis(100);
/// Default ceiling on any single delay.
const DEFAULT_MAX_BACKOFF: Duration = Duration::from_secs(10);
/// Default growth factor between consecutive delays.
const DEFAULT_MULTIPLIER: f64 = 2.0;

/// Retry policy for requests to the chat endpoint.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryPolicy {
    /// Retries allowed after the first attempt.  Zero disables retry.
    pub max_retries: u32,
    /// Delay before the first retry.
    pub initial_backoff: Duration,
    /// Ceiling on any single delay, including server-requested ones.
    pub max_backoff: Duration,
    /// Growth factor applied per retry.
    pub multiplier: f64,
}

impl RetryPolicy {
    /// Creates the default policy: 3 retries, 100ms doubling, capped at 10s.
    pub fn new() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            initial_backoff: DEFAULT_INITIAL_BACKOFF,
            max_backoff: DEFAULT_MAX_BACKOFF,
            multiplier: DEFAULT_MULTIPLIER,
        }
    }

    /// A policy that never retries.
    pub fn none() -> Self {
        Self {
            max_retries: 0,
            ..Self::new()
        }
    }

    /// Sets the number of retries.
    pub fn with_max_retries(mut self, max_retries: u32) -> Self {
        self.max_retries = max_retries;
        self
    }

    /// Sets the initial and maximum backoff.
    pub fn with_backoff(mut self, initial: Duration, max: Duration) -> Self {
        self.initial_backoff = initial;
        self.max_backoff = max;
        self
    }

    /// Sets the growth factor.
    pub fn with_multiplier(mut self, multiplier: f64) -> Self {
        self.multiplier = multiplier;
        self
    }

    /// Returns true if `err`, raised by attempt number `attempt` (0-based),
    /// should be retried.
    pub fn should_retry(&self, err: &Error, attempt: u32) -> bool {
        attempt < self.max_retries && err.is_retryable()
    }

    /// The exponential delay before retry number `attempt + 1`.
    pub fn backoff(&self, attempt: u32) -> Duration {
        let exponent = i32::try_from(attempt).unwrap_or(i32::MAX);
        let factor = self.multiplier.max(1.0).powi(exponent);
        let secs = self.initial_backoff.as_secs_f64() * factor;
        if !secs.is_finite() || secs >= self.max_backoff.as_secs_f64() {
            self.max_backoff
        } else {
            Duration::from_secs_f64(secs)
        }
    }

    /// The delay to wait after `err` on attempt `attempt`.
    ///
    /// A server-provided `retry-after` wins over the exponential schedule but
    /// is still capped by `max_backoff`.
    pub fn delay_for(&self, err: &Error, attempt: u32) -> Duration {
        match err.retry_after() {
            Some(secs) => Duration::from_secs(secs).min(self.max_backoff),
            None => self.backoff(attempt),
        }
    }
}

impl Default for RetryPolicy {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_policy() {
        let policy = RetryPolicy::default();
        assert_eq!(policy.max_retries, 3);
        assert_eq!(policy.initial_backoff, Duration::from_millis(100));
        assert_eq!(policy.max_backoff, Duration::from_secs(10));
    }

    #[test]
    fn backoff_grows_and_caps() {
        let policy = RetryPolicy::new()
            .with_backoff(Duration::from_millis(100), Duration::from_millis(500))
            .with_multiplier(2.0);
        assert_eq!(policy.backoff(0), Duration::from_millis(100));
        assert_eq!(policy.backoff(1), Duration::from_millis(200));
        assert_eq!(policy.backoff(2), Duration::from_millis(400));
        assert_eq!(policy.backoff(3), Duration::from_millis(500));
        assert_eq!(policy.backoff(u32::MAX), Duration::from_millis(500));
    }

    #[test]
    fn retry_after_is_capped() {
        let policy =
            RetryPolicy::new().with_backoff(Duration::from_millis(100), Duration::from_secs(2));
        let err = Error::rate_limit("slow down", Some(30));
        assert_eq!(policy.delay_for(&err, 0), Duration::from_secs(2));
        let err = Error::rate_limit("slow down", Some(1));
        assert_eq!(policy.delay_for(&err, 0), Duration::from_secs(1));
    }

    #[test]
    fn bounded_attempts() {
        let policy = RetryPolicy::new().with_max_retries(2);
        let err = Error::api(503, None, "unavailable", None);
        assert!(policy.should_retry(&err, 0));
        assert!(policy.should_retry(&err, 1));
        assert!(!policy.should_retry(&err, 2));
    }

    #[test]
    fn non_retryable_errors() {
        let policy = RetryPolicy::new();
        assert!(!policy.should_retry(&Error::api(401, None, "no", None), 0));
        assert!(!RetryPolicy::none().should_retry(&Error::rate_limit("x", None), 0));
    }
}
