//! HTTP endpoints for chatrelay-server.
//!
//! Provides the post/fetch API, health checks, and metrics.

mod api;
pub mod health;
mod metrics;

use crate::server::ChatRelay;
use axum::routing::{get, post};
use axum::{Extension, Router};
use std::future::Future;
use std::net::SocketAddr;
use std::sync::Arc;
use tokio::net::TcpListener;

pub use api::ApiError;
pub use health::HealthStatus;

/// Build the HTTP router with all endpoints.
pub fn build_router(relay: Arc<ChatRelay>) -> Router {
    let mut router = Router::new()
        .route("/api/postMessage", post(api::post_message))
        .route("/api/getMessages", post(api::get_messages))
        .route("/health", get(health::health_handler));

    if relay.config().http.metrics_enabled {
        router = router.route("/metrics", get(metrics::metrics_handler));
    }

    router.fallback(api::not_found).layer(Extension(relay))
}

/// Serve the router on `listener` until `shutdown` resolves.
///
/// Client addresses are attached to each request for per-client rate limiting.
pub async fn serve<F>(relay: Arc<ChatRelay>, listener: TcpListener, shutdown: F) -> std::io::Result<()>
where
    F: Future<Output = ()> + Send + 'static,
{
    let app = build_router(relay);
    axum::serve(
        listener,
        app.into_make_service_with_connect_info::<SocketAddr>(),
    )
    .with_graceful_shutdown(shutdown)
    .await
}
