//! Post and fetch endpoints.

use crate::error::ServiceError;
use crate::server::ChatRelay;
use axum::body::Bytes;
use axum::extract::ConnectInfo;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::{Extension, Json};
use relay_types::{ErrorBody, ErrorKind, FetchResponse, PostAck};
use std::net::{IpAddr, Ipv4Addr, SocketAddr};
use std::sync::Arc;

/// Error returned by API handlers, rendered as a JSON [`ErrorBody`].
#[derive(Debug)]
pub enum ApiError {
    /// Rejected by the sync service or rate limiter.
    Service(ServiceError),
    /// No route matched.
    NotFound,
}

impl From<ServiceError> for ApiError {
    fn from(err: ServiceError) -> Self {
        Self::Service(err)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            Self::Service(err) => {
                let status = match err.kind() {
                    ErrorKind::RateLimited => StatusCode::TOO_MANY_REQUESTS,
                    _ => StatusCode::BAD_REQUEST,
                };
                (status, ErrorBody::new(err.kind(), err.to_string()))
            }
            Self::NotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new(ErrorKind::NotFound, "no such endpoint"),
            ),
        };
        (status, Json(body)).into_response()
    }
}

/// Address used for rate limiting when the listener supplies no peer address.
const UNKNOWN_CLIENT: IpAddr = IpAddr::V4(Ipv4Addr::UNSPECIFIED);

fn client_ip(connect_info: Option<ConnectInfo<SocketAddr>>) -> IpAddr {
    connect_info
        .map(|ConnectInfo(addr)| addr.ip())
        .unwrap_or(UNKNOWN_CLIENT)
}

/// `POST /api/postMessage` with `{"message": "..."}`.
pub async fn post_message(
    Extension(relay): Extension<Arc<ChatRelay>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Json<PostAck>, ApiError> {
    let ack = relay.post(client_ip(connect_info), &body)?;
    Ok(Json(ack))
}

/// `POST /api/getMessages` with `{"index": <cursor>}`.
pub async fn get_messages(
    Extension(relay): Extension<Arc<ChatRelay>>,
    connect_info: Option<ConnectInfo<SocketAddr>>,
    body: Bytes,
) -> Result<Json<FetchResponse>, ApiError> {
    let response = relay.fetch(client_ip(connect_info), &body)?;
    Ok(Json(response))
}

/// Fallback for unknown routes.
pub async fn not_found() -> ApiError {
    ApiError::NotFound
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn client_ip_defaults_to_unspecified() {
        assert_eq!(client_ip(None), UNKNOWN_CLIENT);
    }

    #[test]
    fn client_ip_uses_peer_address() {
        let addr: SocketAddr = "10.1.2.3:5555".parse().unwrap();
        assert_eq!(client_ip(Some(ConnectInfo(addr))), addr.ip());
    }

    #[test]
    fn invalid_input_maps_to_bad_request() {
        let response = ApiError::from(ServiceError::invalid("nope")).into_response();
        assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    }

    #[test]
    fn rate_limited_maps_to_too_many_requests() {
        let err = ServiceError::RateLimited {
            reason: "slow down".into(),
        };
        let response = ApiError::from(err).into_response();
        assert_eq!(response.status(), StatusCode::TOO_MANY_REQUESTS);
    }
}
