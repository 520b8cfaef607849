//! Prometheus metrics endpoint.

use crate::server::ChatRelay;
use axum::{http::header::CONTENT_TYPE, response::IntoResponse, Extension};
use std::sync::atomic::Ordering;
use std::sync::Arc;

/// Prometheus metrics handler.
///
/// Returns metrics in Prometheus text format.
/// Includes both gauges (current state) and counters (monotonic since startup).
pub async fn metrics_handler(Extension(relay): Extension<Arc<ChatRelay>>) -> impl IntoResponse {
    let body = render(&relay);
    (
        [(CONTENT_TYPE, "text/plain; version=0.0.4; charset=utf-8")],
        body,
    )
}

fn render(relay: &ChatRelay) -> String {
    let m = relay.metrics();

    // Gauges: current state
    let messages = relay.total_messages();
    let tracked_clients = relay.rate_limits().post_keys_count();

    // Counters: monotonic since startup
    let posts = m.posts_total.load(Ordering::Relaxed);
    let fetches = m.fetches_total.load(Ordering::Relaxed);
    let delivered = m.messages_delivered.load(Ordering::Relaxed);
    let bytes_rx = m.bytes_received.load(Ordering::Relaxed);
    let rate_limits = m.rate_limit_hits.load(Ordering::Relaxed);
    let errors = m.errors_total.load(Ordering::Relaxed);

    format!(
        r#"# HELP chatrelay_info Server information
# TYPE chatrelay_info gauge
chatrelay_info{{version="{version}"}} 1

# HELP chatrelay_messages_stored Number of messages in the log
# TYPE chatrelay_messages_stored gauge
chatrelay_messages_stored {messages}

# HELP chatrelay_rate_limit_clients Number of client addresses tracked by the post limiter
# TYPE chatrelay_rate_limit_clients gauge
chatrelay_rate_limit_clients {tracked_clients}

# HELP chatrelay_posts_total Total posts appended
# TYPE chatrelay_posts_total counter
chatrelay_posts_total {posts}

# HELP chatrelay_fetches_total Total fetches answered
# TYPE chatrelay_fetches_total counter
chatrelay_fetches_total {fetches}

# HELP chatrelay_messages_delivered_total Total message entries returned by fetches
# TYPE chatrelay_messages_delivered_total counter
chatrelay_messages_delivered_total {delivered}

# HELP chatrelay_bytes_received_total Total post body bytes received
# TYPE chatrelay_bytes_received_total counter
chatrelay_bytes_received_total {bytes_rx}

# HELP chatrelay_rate_limit_hits_total Total posts rejected by rate limiting
# TYPE chatrelay_rate_limit_hits_total counter
chatrelay_rate_limit_hits_total {rate_limits}

# HELP chatrelay_errors_total Total requests rejected as invalid
# TYPE chatrelay_errors_total counter
chatrelay_errors_total {errors}
"#,
        version = env!("CARGO_PKG_VERSION"),
    )
}
