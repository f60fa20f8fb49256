//! Client configuration types.

use std::time::Duration;

/// Retry configuration for failed requests
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of retry attempts
    pub max_retries: u32,

    /// Initial backoff duration
    pub initial_backoff: Duration,

    /// Maximum backoff duration
    pub max_backoff: Duration,

    /// Whether to retry on rate limit errors
    pub retry_on_rate_limit: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self::new()
    }
}

impl RetryConfig {
    /// Create a new retry configuration
    #[must_use]
    pub const fn new() -> Self {
        Self {
            max_retries: 3,
            initial_backoff: Duration::from_millis(500),
            max_backoff: Duration::from_secs(30),
            retry_on_rate_limit: true,
        }
    }

    /// Never retry
    #[must_use]
    pub const fn disabled() -> Self {
        Self::new().max_retries(0)
    }

    /// Set maximum retries
    #[must_use]
    pub const fn max_retries(mut self, max: u32) -> Self {
        self.max_retries = max;
        self
    }

    /// Set initial backoff duration
    #[must_use]
    pub const fn initial_backoff(mut self, duration: Duration) -> Self {
        self.initial_backoff = duration;
        self
    }

    /// Set maximum backoff duration
    #[must_use]
    pub const fn max_backoff(mut self, duration: Duration) -> Self {
        self.max_backoff = duration;
        self
    }

    /// Calculate backoff for a given attempt
    #[must_use]
    pub fn backoff_for(&self, attempt: u32) -> Duration {
        let initial = u64::try_from(self.initial_backoff.as_millis()).unwrap_or(u64::MAX);
        let max = u64::try_from(self.max_backoff.as_millis()).unwrap_or(u64::MAX);
        let backoff = initial.saturating_mul(2u64.saturating_pow(attempt));
        Duration::from_millis(backoff.min(max))
    }

    /// Whether an error on the given attempt should be retried
    #[must_use]
    pub const fn should_retry(&self, error: &dnspin_core::DnsPinError, attempt: u32) -> bool {
        if attempt >= self.max_retries || !error.is_retryable() {
            return false;
        }
        if matches!(error, dnspin_core::DnsPinError::RateLimited { .. }) {
            return self.retry_on_rate_limit;
        }
        true
    }

    /// Like [`should_retry`](Self::should_retry), for a request that is
    /// not idempotent when `idempotent` is false. Such a request may have
    /// landed before a timeout or dropped connection, so it is only resent
    /// after the server refused it with a rate limit.
    #[must_use]
    pub const fn should_retry_request(
        &self,
        error: &dnspin_core::DnsPinError,
        attempt: u32,
        idempotent: bool,
    ) -> bool {
        if !idempotent && !matches!(error, dnspin_core::DnsPinError::RateLimited { .. }) {
            return false;
        }
        self.should_retry(error, attempt)
    }
}

/// Client-side request rate limit
#[derive(Debug, Clone)]
pub struct RateLimitConfig {
    /// Sustained requests per second
    pub requests_per_second: u32,

    /// Burst allowance
    pub burst_size: u32,
}

impl Default for RateLimitConfig {
    /// Cloudflare allows 1200 requests per 5 minutes per token; stay well
    /// under it.
    fn default() -> Self {
        Self {
            requests_per_second: 4,
            burst_size: 8,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use dnspin_core::DnsPinError;

    #[test]
    fn test_backoff_doubles_and_caps() {
        let config = RetryConfig::new()
            .initial_backoff(Duration::from_millis(100))
            .max_backoff(Duration::from_millis(350));
        assert_eq!(config.backoff_for(0), Duration::from_millis(100));
        assert_eq!(config.backoff_for(1), Duration::from_millis(200));
        assert_eq!(config.backoff_for(2), Duration::from_millis(350));
        assert_eq!(config.backoff_for(40), Duration::from_millis(350));
    }

    #[test]
    fn test_should_retry() {
        let config = RetryConfig::new().max_retries(2);
        let limited = DnsPinError::RateLimited { retry_after: None };
        assert!(config.should_retry(&limited, 0));
        assert!(config.should_retry(&limited, 1));
        assert!(!config.should_retry(&limited, 2));
        assert!(!config.should_retry(&DnsPinError::Unauthorized, 0));

        let mut no_rate = config;
        no_rate.retry_on_rate_limit = false;
        assert!(!no_rate.should_retry(&limited, 0));
        assert!(no_rate.should_retry(&DnsPinError::Timeout(Duration::from_secs(30)), 0));

        assert!(!RetryConfig::disabled().should_retry(&DnsPinError::Timeout(Duration::from_secs(30)), 0));
    }

    #[test]
    fn test_non_idempotent_requests_only_retry_rate_limits() {
        let config = RetryConfig::new();
        let timeout = DnsPinError::Timeout(Duration::from_secs(30));
        let dropped = DnsPinError::Connection("reset".into());
        let limited = DnsPinError::RateLimited { retry_after: Some(1) };

        assert!(config.should_retry_request(&timeout, 0, true));
        assert!(!config.should_retry_request(&timeout, 0, false));
        assert!(!config.should_retry_request(&dropped, 0, false));
        assert!(config.should_retry_request(&limited, 0, false));
        assert!(!config.should_retry_request(&limited, 3, false));
    }
}
