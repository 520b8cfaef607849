//! Main ChatRelay server coordination.
//!
//! ChatRelay owns the sync service, rate limiters and counters, and is shared
//! behind an `Arc` with the HTTP layer and background tasks.

use crate::config::Config;
use crate::error::{ServiceError, ServiceResult};
use crate::limits::RateLimits;
use crate::service::SyncService;
use crate::storage::{MemoryStore, MessageStorage};
use relay_types::{FetchResponse, PostAck};
use std::net::IpAddr;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::Arc;

/// Operational metrics for monitoring relay activity.
///
/// All counters are monotonically increasing (reset only on restart).
#[derive(Debug, Default)]
pub struct RelayMetrics {
    /// Total post requests appended successfully.
    pub posts_total: AtomicU64,
    /// Total fetch requests answered successfully.
    pub fetches_total: AtomicU64,
    /// Total message entries returned across all fetches.
    pub messages_delivered: AtomicU64,
    /// Total message text bytes received (post bodies).
    pub bytes_received: AtomicU64,
    /// Total post rejections due to rate limiting.
    pub rate_limit_hits: AtomicU64,
    /// Total requests rejected as invalid.
    pub errors_total: AtomicU64,
}

/// Main relay server.
pub struct ChatRelay {
    config: Config,
    service: SyncService,
    /// Rate limiters for posts.
    rate_limits: RateLimits,
    /// Operational metrics (counters).
    metrics: RelayMetrics,
}

impl std::fmt::Debug for ChatRelay {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ChatRelay")
            .field("config", &self.config)
            .field("service", &self.service)
            .field("rate_limits", &self.rate_limits)
            .field("metrics", &self.metrics)
            .finish()
    }
}

impl ChatRelay {
    /// Create a relay with a fresh in-memory log.
    pub fn new(config: Config) -> Self {
        Self::with_store(config, Arc::new(MemoryStore::new()))
    }

    /// Create a relay over an existing store.
    pub fn with_store(config: Config, store: Arc<dyn MessageStorage>) -> Self {
        let rate_limits = RateLimits::new(&config.limits);
        let service = SyncService::new(store, config.limits.max_message_bytes);
        Self {
            config,
            service,
            rate_limits,
            metrics: RelayMetrics::default(),
        }
    }

    /// Get the relay configuration.
    pub fn config(&self) -> &Config {
        &self.config
    }

    /// Get the sync service.
    pub fn service(&self) -> &SyncService {
        &self.service
    }

    /// Get access to the rate limiters.
    pub fn rate_limits(&self) -> &RateLimits {
        &self.rate_limits
    }

    /// Get access to the operational metrics.
    pub fn metrics(&self) -> &RelayMetrics {
        &self.metrics
    }

    /// Handle a raw post body from `client`.
    ///
    /// The rate limit is checked before the body is decoded, so a rejected
    /// post never reaches the store.
    pub fn post(&self, client: IpAddr, body: &[u8]) -> ServiceResult<PostAck> {
        if let Err(e) = self.rate_limits.check_post(client) {
            tracing::warn!("Post rate limited for {}: {}", client, e);
            self.metrics.rate_limit_hits.fetch_add(1, Ordering::Relaxed);
            return Err(e.into());
        }

        let ack = self
            .service
            .handle_post(body)
            .inspect_err(|e| self.record_rejection("post", client, e))?;

        self.metrics.posts_total.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .bytes_received
            .fetch_add(body.len() as u64, Ordering::Relaxed);

        Ok(ack)
    }

    /// Handle a raw fetch body from `client`.
    pub fn fetch(&self, client: IpAddr, body: &[u8]) -> ServiceResult<FetchResponse> {
        let response = self
            .service
            .handle_fetch(body)
            .inspect_err(|e| self.record_rejection("fetch", client, e))?;

        self.metrics.fetches_total.fetch_add(1, Ordering::Relaxed);
        self.metrics
            .messages_delivered
            .fetch_add(response.messages.len() as u64, Ordering::Relaxed);

        Ok(response)
    }

    /// Number of messages currently in the log.
    pub fn total_messages(&self) -> usize {
        self.service.store().len()
    }

    fn record_rejection(&self, action: &str, client: IpAddr, err: &ServiceError) {
        tracing::debug!("Rejected {} from {}: {}", action, client, err);
        self.metrics.errors_total.fetch_add(1, Ordering::Relaxed);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use relay_types::{ErrorKind, Position};
    use std::net::Ipv4Addr;

    const CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::LOCALHOST);

    fn test_relay() -> ChatRelay {
        ChatRelay::new(Config::default())
    }

    #[test]
    fn post_then_fetch() {
        let relay = test_relay();

        let ack = relay.post(CLIENT, br#"{"message":"hi"}"#).unwrap();
        assert_eq!(ack.index, Position::FIRST);

        let response = relay.fetch(CLIENT, br#"{"index":-1}"#).unwrap();
        assert_eq!(response.messages.len(), 1);
        assert_eq!(response.messages[0].message, "hi");
        assert_eq!(relay.total_messages(), 1);
    }

    #[test]
    fn metrics_count_successful_requests() {
        let relay = test_relay();
        relay.post(CLIENT, br#"{"message":"a"}"#).unwrap();
        relay.post(CLIENT, br#"{"message":"b"}"#).unwrap();
        relay.fetch(CLIENT, br#"{"index":-1}"#).unwrap();
        relay.fetch(CLIENT, br#"{"index":1}"#).unwrap();

        let m = relay.metrics();
        assert_eq!(m.posts_total.load(Ordering::Relaxed), 2);
        assert_eq!(m.fetches_total.load(Ordering::Relaxed), 2);
        assert_eq!(m.messages_delivered.load(Ordering::Relaxed), 2);
        assert!(m.bytes_received.load(Ordering::Relaxed) > 0);
        assert_eq!(m.errors_total.load(Ordering::Relaxed), 0);
    }

    #[test]
    fn invalid_requests_are_counted() {
        let relay = test_relay();
        assert!(relay.post(CLIENT, b"{}").is_err());
        assert!(relay.fetch(CLIENT, br#"{"index":-5}"#).is_err());
        assert_eq!(relay.metrics().errors_total.load(Ordering::Relaxed), 2);
        assert_eq!(relay.total_messages(), 0);
    }

    #[test]
    fn post_quota_is_enforced_per_client() {
        let mut config = Config::default();
        config.limits.posts_per_minute = 2;
        let relay = ChatRelay::new(config);

        relay.post(CLIENT, br#"{"message":"1"}"#).unwrap();
        relay.post(CLIENT, br#"{"message":"2"}"#).unwrap();
        let err = relay.post(CLIENT, br#"{"message":"3"}"#).unwrap_err();
        assert_eq!(err.kind(), ErrorKind::RateLimited);
        assert_eq!(relay.total_messages(), 2);
        assert_eq!(relay.metrics().rate_limit_hits.load(Ordering::Relaxed), 1);

        let other = IpAddr::V4(Ipv4Addr::new(192, 168, 1, 9));
        assert!(relay.post(other, br#"{"message":"4"}"#).is_ok());
    }

    #[test]
    fn fetches_are_never_rate_limited() {
        let mut config = Config::default();
        config.limits.posts_per_minute = 1;
        let relay = ChatRelay::new(config);

        for _ in 0..1000 {
            assert!(relay.fetch(CLIENT, br#"{"index":-1}"#).is_ok());
        }
    }

    #[test]
    fn relays_with_shared_store_see_same_log() {
        let store: Arc<dyn MessageStorage> = Arc::new(MemoryStore::new());
        let a = ChatRelay::with_store(Config::default(), Arc::clone(&store));
        let b = ChatRelay::with_store(Config::default(), store);

        a.post(CLIENT, br#"{"message":"shared"}"#).unwrap();
        assert_eq!(b.total_messages(), 1);
    }

    #[test]
    fn relay_is_debug() {
        let debug = format!("{:?}", test_relay());
        assert!(debug.contains("ChatRelay"));
    }
}
