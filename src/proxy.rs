//! `/api` reverse proxy to the WAF backend.
//!
//! SYSTEM CONTEXT
//! ==============
//! The browser only ever talks to this server. Every `/api/*` request is
//! replayed against `BACKEND_URL` with its method, path, query, body and
//! end-to-end headers intact, so the client's `Authorization` header reaches
//! the backend unchanged. `Host` is rewritten to the backend origin.
//!
//! ERROR HANDLING
//! ==============
//! Backend responses, 401 included, are relayed verbatim. Only failures of
//! the proxy hop itself become [`ProxyError`]: 502 when the backend cannot be
//! reached, 504 when the deadline expires.

use std::time::Duration;

use axum::Json;
use axum::body::{Body, to_bytes};
use axum::extract::{Request, State};
use axum::http::{HeaderMap, HeaderName, StatusCode, header};
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use crate::config::Config;

/// Largest request body relayed upstream.
pub const MAX_BODY_BYTES: usize = 16 * 1024 * 1024;

/// Connection-scoped headers that must not cross the proxy hop.
static HOP_BY_HOP: [HeaderName; 9] = [
    header::CONNECTION,
    HeaderName::from_static("keep-alive"),
    header::PROXY_AUTHENTICATE,
    header::PROXY_AUTHORIZATION,
    header::TE,
    header::TRAILER,
    header::TRANSFER_ENCODING,
    header::UPGRADE,
    header::CONTENT_LENGTH,
];

#[derive(Debug, thiserror::Error)]
pub enum ProxyError {
    #[error("failed to read request body: {0}")]
    RequestBody(String),
    #[error("backend unreachable: {0}")]
    Unreachable(String),
    #[error("backend did not answer within {}s", .0.as_secs())]
    Timeout(Duration),
    #[error("failed to read backend response: {0}")]
    ResponseBody(String),
}

impl ProxyError {
    #[must_use]
    pub fn status(&self) -> StatusCode {
        match self {
            Self::RequestBody(_) => StatusCode::PAYLOAD_TOO_LARGE,
            Self::Unreachable(_) | Self::ResponseBody(_) => StatusCode::BAD_GATEWAY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
        }
    }
}

/// Error body in the backend's own `{detail}` shape so the client decodes
/// proxy failures like any other error.
#[derive(Debug, Serialize)]
struct ErrorBody {
    detail: String,
}

impl IntoResponse for ProxyError {
    fn into_response(self) -> Response {
        let status = self.status();
        tracing::warn!(%status, error = %self, "proxy hop failed");
        (status, Json(ErrorBody { detail: self.to_string() })).into_response()
    }
}

/// Shared upstream client and target.
#[derive(Clone, Debug)]
pub struct Proxy {
    client: reqwest::Client,
    backend_url: String,
    timeout: Duration,
}

impl Proxy {
    /// # Errors
    ///
    /// Returns the `reqwest` builder error if the TLS backend fails to load.
    pub fn new(config: &Config) -> Result<Self, reqwest::Error> {
        let client = reqwest::Client::builder().redirect(reqwest::redirect::Policy::none()).build()?;
        Ok(Self { client, backend_url: config.backend_url.clone(), timeout: config.proxy_timeout })
    }

    #[must_use]
    pub fn backend_url(&self) -> &str {
        &self.backend_url
    }

    /// Upstream URL for an incoming path-and-query.
    #[must_use]
    pub fn target(&self, path_and_query: &str) -> String {
        format!("{}{path_and_query}", self.backend_url)
    }
}

/// Copy `source` minus hop-by-hop headers and `Host`.
#[must_use]
pub fn forwardable_headers(source: &HeaderMap) -> HeaderMap {
    let mut headers = source.clone();
    headers.remove(header::HOST);
    for name in &HOP_BY_HOP {
        headers.remove(name);
    }
    headers
}

/// Axum handler: relay one request to the backend.
///
/// # Errors
///
/// Returns [`ProxyError`] when the body cannot be read, the backend is
/// unreachable or the deadline expires.
pub async fn forward(State(proxy): State<Proxy>, request: Request) -> Result<Response, ProxyError> {
    let (parts, body) = request.into_parts();
    let path_and_query = parts.uri.path_and_query().map_or_else(|| parts.uri.path(), |pq| pq.as_str());
    let target = proxy.target(path_and_query);
    let body = to_bytes(body, MAX_BODY_BYTES).await.map_err(|e| ProxyError::RequestBody(e.to_string()))?;

    tracing::debug!(method = %parts.method, %target, "proxying request");
    let upstream = proxy
        .client
        .request(parts.method.clone(), &target)
        .headers(forwardable_headers(&parts.headers))
        .body(body)
        .timeout(proxy.timeout)
        .send()
        .await
        .map_err(|e| {
            if e.is_timeout() {
                ProxyError::Timeout(proxy.timeout)
            } else {
                ProxyError::Unreachable(e.to_string())
            }
        })?;

    let status = upstream.status();
    let headers = forwardable_headers(upstream.headers());
    let bytes = upstream.bytes().await.map_err(|e| {
        if e.is_timeout() {
            ProxyError::Timeout(proxy.timeout)
        } else {
            ProxyError::ResponseBody(e.to_string())
        }
    })?;

    tracing::debug!(method = %parts.method, %target, %status, "proxied");
    let mut response = Response::new(Body::from(bytes));
    *response.status_mut() = status;
    *response.headers_mut() = headers;
    Ok(response)
}

#[cfg(test)]
#[path = "proxy_test.rs"]
mod tests;
