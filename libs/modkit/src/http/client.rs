//! Traced HTTP client for outgoing calls.
//!
//! Wraps `reqwest::Client`, opens an `outgoing_http` span for every request and injects a
//! W3C `traceparent` header so the callee can correlate the request with ours.

use std::time::Duration;

use reqwest::header::{HeaderMap, HeaderName, HeaderValue};
use tracing::{Instrument, Level};
use uuid::Uuid;

/// W3C Trace Context header name
pub const TRACEPARENT: &str = "traceparent";

#[derive(Clone)]
pub struct TracedClient {
    inner: reqwest::Client,
}

impl TracedClient {
    pub fn new(inner: reqwest::Client) -> Self {
        Self { inner }
    }

    /// Build a client whose every request is bounded by `timeout`.
    pub fn with_timeout(timeout: Duration) -> anyhow::Result<Self> {
        let inner = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::new(inner))
    }

    /// Execute a built request inside an `outgoing_http` span.
    pub async fn execute(&self, mut req: reqwest::Request) -> reqwest::Result<reqwest::Response> {
        let span = tracing::span!(
            Level::INFO, "outgoing_http",
            http.method = %req.method(),
            http.url = %req.url(),
            http.status_code = tracing::field::Empty,
            error = tracing::field::Empty,
            otel.kind = "client",
        );

        inject_traceparent(req.headers_mut());

        let result = self.inner.execute(req).instrument(span.clone()).await;

        match &result {
            Ok(response) => {
                span.record("http.status_code", response.status().as_u16());
                if response.status().is_client_error() || response.status().is_server_error() {
                    span.record("error", true);
                }
            }
            Err(_) => {
                span.record("error", true);
            }
        }

        result
    }

    /// GET with URL-encoded query parameters.
    pub async fn get_with_query<Q>(&self, url: &str, query: &Q) -> reqwest::Result<reqwest::Response>
    where
        Q: serde::Serialize + ?Sized,
    {
        let req = self.inner.get(url).query(query).build()?;
        self.execute(req).await
    }
}

fn inject_traceparent(headers: &mut HeaderMap) {
    let trace_id = Uuid::new_v4().simple().to_string();
    let span_id = &Uuid::new_v4().simple().to_string()[..16];
    let traceparent = format!("00-{trace_id}-{span_id}-01");

    if let Ok(value) = HeaderValue::from_str(&traceparent) {
        headers.insert(HeaderName::from_static(TRACEPARENT), value);
    }
}
