//! HTTP transport using reqwest.

use super::{Transport, TransportError};
use async_trait::async_trait;
use relay_types::{ErrorBody, FetchMessages, FetchResponse, PostAck, PostMessage};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::time::Duration;

/// Default per-request timeout.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(10);

/// HTTP transport talking to a chatrelay server.
#[derive(Debug, Clone)]
pub struct HttpTransport {
    client: reqwest::Client,
    base_url: String,
}

impl HttpTransport {
    /// Create a transport for the relay at `base_url` (e.g. `http://127.0.0.1:8000`).
    pub fn new(base_url: &str) -> Result<Self, TransportError> {
        Self::with_timeout(base_url, DEFAULT_TIMEOUT)
    }

    /// Create a transport with a custom per-request timeout.
    pub fn with_timeout(base_url: &str, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| TransportError::ConnectionFailed(e.to_string()))?;
        Ok(Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }

    /// The relay base URL (without trailing slash).
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    async fn call<Req, Resp>(&self, path: &str, request: &Req) -> Result<Resp, TransportError>
    where
        Req: Serialize + Sync,
        Resp: DeserializeOwned,
    {
        let response = self
            .client
            .post(self.url(path))
            .json(request)
            .send()
            .await
            .map_err(map_reqwest_error)?;

        let status = response.status();
        let bytes = response.bytes().await.map_err(map_reqwest_error)?;

        if !status.is_success() {
            tracing::debug!("{} returned {}", path, status);
            return Err(match relay_types::decode::<ErrorBody>(&bytes) {
                Ok(body) => TransportError::Rejected {
                    status: status.as_u16(),
                    kind: body.error,
                    message: body.message,
                },
                Err(_) => TransportError::Status(status.as_u16()),
            });
        }

        relay_types::decode(&bytes).map_err(|e| TransportError::InvalidResponse(e.to_string()))
    }
}

fn map_reqwest_error(err: reqwest::Error) -> TransportError {
    if err.is_timeout() {
        TransportError::Timeout
    } else {
        TransportError::ConnectionFailed(err.to_string())
    }
}

#[async_trait]
impl Transport for HttpTransport {
    async fn post_message(&self, request: &PostMessage) -> Result<PostAck, TransportError> {
        self.call("/api/postMessage", request).await
    }

    async fn get_messages(&self, request: &FetchMessages) -> Result<FetchResponse, TransportError> {
        self.call("/api/getMessages", request).await
    }
}
