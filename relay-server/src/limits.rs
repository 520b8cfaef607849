//! Rate limiting for chatrelay-server.
//!
//! Posts are limited per client address so one noisy client cannot flood the
//! shared log. Fetches are never limited: clients poll at whatever cadence
//! their UI picks, and a burst of fetches only reads.
//!
//! Uses the governor crate's keyed rate limiter backed by DashMap.

use crate::config::LimitsConfig;
use governor::clock::DefaultClock;
use governor::middleware::NoOpMiddleware;
use governor::state::InMemoryState;
use governor::{Quota, RateLimiter};
use std::net::IpAddr;
use std::num::NonZeroU32;
use std::sync::Arc;

/// Type alias for a keyed rate limiter using DashMap.
type KeyedLimiter<K> = RateLimiter<
    K,
    dashmap::DashMap<K, InMemoryState>,
    DefaultClock,
    NoOpMiddleware<governor::clock::QuantaInstant>,
>;

/// Rate limiters for the relay server.
#[derive(Clone)]
pub struct RateLimits {
    /// Limits posts per client address.
    ///
    /// Configured via `limits.posts_per_minute`.
    post_limiter: Arc<KeyedLimiter<IpAddr>>,
}

impl std::fmt::Debug for RateLimits {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RateLimits")
            .field("post_limiter", &"KeyedLimiter<IpAddr>")
            .field("tracked_clients", &self.post_limiter.len())
            .finish()
    }
}

impl RateLimits {
    /// Create rate limiters from configuration.
    ///
    /// A zero `posts_per_minute` is rejected by `Config::validate`; if one
    /// slips through anyway it is treated as one post per minute.
    pub fn new(config: &LimitsConfig) -> Self {
        let posts_per_minute = NonZeroU32::new(config.posts_per_minute).unwrap_or(NonZeroU32::MIN);
        let post_quota = Quota::per_minute(posts_per_minute);

        Self {
            post_limiter: Arc::new(RateLimiter::keyed(post_quota)),
        }
    }

    /// Check if a post from `client` is allowed.
    ///
    /// # Returns
    ///
    /// `Ok(())` if allowed, `Err` if the client has used its quota.
    pub fn check_post(&self, client: IpAddr) -> Result<(), RateLimitError> {
        self.post_limiter
            .check_key(&client)
            .map_err(|_| RateLimitError::PostLimitExceeded)
    }

    /// Get the number of tracked client keys (for metrics).
    pub fn post_keys_count(&self) -> usize {
        self.post_limiter.len()
    }

    /// Evict stale entries from the keyed limiter.
    ///
    /// `retain_recent()` removes clients whose quota has fully recharged.
    /// Called periodically from the maintenance task.
    pub fn shrink(&self) {
        self.post_limiter.retain_recent();
    }
}

/// Rate limit error types.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RateLimitError {
    /// Too many posts from this client.
    #[error("post rate limit exceeded")]
    PostLimitExceeded,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::net::{Ipv4Addr, Ipv6Addr};

    fn test_config(posts_per_minute: u32) -> LimitsConfig {
        LimitsConfig {
            max_message_bytes: 1024,
            posts_per_minute,
        }
    }

    #[test]
    fn create_rate_limits() {
        let limits = RateLimits::new(&test_config(10));
        assert_eq!(limits.post_keys_count(), 0);
    }

    #[test]
    fn post_limit_allows_within_quota() {
        let limits = RateLimits::new(&test_config(5));
        let client = IpAddr::V4(Ipv4Addr::new(10, 0, 0, 1));

        // First 5 should succeed
        for _ in 0..5 {
            assert!(limits.check_post(client).is_ok());
        }

        // 6th should fail
        assert_eq!(
            limits.check_post(client),
            Err(RateLimitError::PostLimitExceeded)
        );
    }

    #[test]
    fn different_clients_have_independent_limits() {
        let limits = RateLimits::new(&test_config(2));

        let client_a = IpAddr::V4(Ipv4Addr::LOCALHOST);
        let client_b = IpAddr::V6(Ipv6Addr::LOCALHOST);

        assert!(limits.check_post(client_a).is_ok());
        assert!(limits.check_post(client_a).is_ok());
        assert!(limits.check_post(client_a).is_err());

        // Client B still has full quota
        assert!(limits.check_post(client_b).is_ok());
        assert!(limits.check_post(client_b).is_ok());
        assert!(limits.check_post(client_b).is_err());

        assert_eq!(limits.post_keys_count(), 2);
    }

    #[test]
    fn zero_quota_falls_back_to_one() {
        let limits = RateLimits::new(&test_config(0));
        let client = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limits.check_post(client).is_ok());
        assert!(limits.check_post(client).is_err());
    }

    #[test]
    fn clones_share_state() {
        let limits = RateLimits::new(&test_config(1));
        let cloned = limits.clone();
        let client = IpAddr::V4(Ipv4Addr::LOCALHOST);
        assert!(limits.check_post(client).is_ok());
        assert!(cloned.check_post(client).is_err());
    }

    #[test]
    fn rate_limits_are_debug() {
        let limits = RateLimits::new(&test_config(10));
        let debug = format!("{:?}", limits);
        assert!(debug.contains("RateLimits"));
    }

    #[test]
    fn rate_limit_error_display() {
        assert_eq!(
            RateLimitError::PostLimitExceeded.to_string(),
            "post rate limit exceeded"
        );
    }

    #[test]
    fn shrink_does_not_panic() {
        let limits = RateLimits::new(&test_config(10));
        let _ = limits.check_post(IpAddr::V4(Ipv4Addr::new(1, 2, 3, 4)));
        let _ = limits.check_post(IpAddr::V4(Ipv4Addr::new(5, 6, 7, 8)));
        assert!(limits.post_keys_count() > 0);

        // Freshly used entries may or may not be evicted depending on timing
        limits.shrink();
    }
}
