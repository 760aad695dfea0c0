//! HTTP transport types for the host-does-IO pattern.
//!
//! # Design
//! `DigiflazzClient` builds `HttpRequest` values and parses `HttpResponse`
//! values without touching the network. A `Transport` executes the round-trip
//! in between. Every Digiflazz endpoint is a JSON `POST`, so the request type
//! carries no method.
//!
//! A transport must hand back every HTTP status as data (4xx/5xx included)
//! and only fail when no response exists: `NoResponse` if the request went
//! out and nothing came back, `RequestSetupFailed` if it never went out.

use crate::error::Result;

pub const CONTENT_TYPE_JSON: (&str, &str) = ("content-type", "application/json");

/// A JSON `POST` described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpRequest {
    pub url: String,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

/// An HTTP response described as plain data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct HttpResponse {
    pub status: u16,
    pub headers: Vec<(String, String)>,
    pub body: String,
}

impl HttpResponse {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            headers: Vec::new(),
            body: body.into(),
        }
    }

    pub fn is_success(&self) -> bool {
        (200..300).contains(&self.status)
    }
}

/// Executes one request. No retries.
pub trait Transport {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse>;
}

impl<T: Transport + ?Sized> Transport for &T {
    fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
        (**self).execute(request)
    }
}

#[cfg(feature = "ureq")]
pub use self::ureq_transport::UreqTransport;

#[cfg(feature = "ureq")]
mod ureq_transport {
    use std::fmt;

    use tracing::debug;

    use super::{HttpRequest, HttpResponse, Transport};
    use crate::error::{ApiError, Result};

    /// Largest response body read. Full prepaid price lists run to several
    /// megabytes.
    pub const MAX_BODY_BYTES: u64 = 64 * 1024 * 1024;

    /// Blocking transport on a `ureq` agent.
    ///
    /// Status codes are never turned into errors here; classification is the
    /// client's job. No timeout is configured beyond ureq's defaults.
    #[derive(Clone)]
    pub struct UreqTransport {
        agent: ureq::Agent,
    }

    impl fmt::Debug for UreqTransport {
        fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
            f.debug_struct("UreqTransport").finish_non_exhaustive()
        }
    }

    impl UreqTransport {
        pub fn new() -> Self {
            let agent = ureq::Agent::config_builder()
                .http_status_as_error(false)
                .build()
                .new_agent();
            Self { agent }
        }
    }

    impl Default for UreqTransport {
        fn default() -> Self {
            Self::new()
        }
    }

    impl Transport for UreqTransport {
        fn execute(&self, request: &HttpRequest) -> Result<HttpResponse> {
            let mut builder = self.agent.post(&request.url);
            for (name, value) in &request.headers {
                builder = builder.header(name.as_str(), value.as_str());
            }

            let mut response = builder
                .send(request.body.as_bytes())
                .map_err(classify)?;

            let status = response.status().as_u16();
            let headers = response
                .headers()
                .iter()
                .map(|(name, value)| {
                    (
                        name.as_str().to_string(),
                        value.to_str().unwrap_or_default().to_string(),
                    )
                })
                .collect();
            // A status line arrived, so an unreadable body is the remote's
            // failure, not a missing response.
            let body = response
                .body_mut()
                .with_config()
                .limit(MAX_BODY_BYTES)
                .read_to_string()
                .map_err(|e| {
                    ApiError::remote_rejected(status, format!("failed to read response body: {e}"))
                })?;

            debug!(url = %request.url, status, "received response");
            Ok(HttpResponse {
                status,
                headers,
                body,
            })
        }
    }

    /// Errors raised while building the request never reach the network.
    fn classify(err: ureq::Error) -> ApiError {
        match err {
            ureq::Error::BadUri(uri) => ApiError::RequestSetupFailed(format!("bad uri: {uri}")),
            ureq::Error::Http(e) => ApiError::RequestSetupFailed(e.to_string()),
            ureq::Error::RequireHttpsOnly(uri) => {
                ApiError::RequestSetupFailed(format!("https required: {uri}"))
            }
            ureq::Error::InvalidProxyUrl => {
                ApiError::RequestSetupFailed("invalid proxy url".to_string())
            }
            other => ApiError::NoResponse(other.to_string()),
        }
    }
}
