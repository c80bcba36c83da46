//! The network transaction layer.
//!
//! [`Transport`] is the seam between the retry loop and the wire: the real
//! implementation drives `reqwest`, and tests substitute stubs. One call
//! sends exactly one request and fully drains the response body into memory
//! so the trace can log the complete payload.

use std::time::Duration;

use async_trait::async_trait;
use log::debug;

use crate::config::{DEFAULT_TIMEOUT, MAX_REDIRECT_HOPS};
use crate::error_handling::TransportError;
use crate::proxy::ProxyEndpoint;
use crate::request::builder::NormalizedRequest;
use crate::request::spec::HttpVersion;
use crate::response::ResponseResult;

/// Per-attempt transport configuration.
#[derive(Debug, Clone)]
pub struct TransportOptions {
    /// Effective request timeout.
    pub timeout: Duration,
    /// Whether redirects are followed automatically.
    pub auto_redirect: bool,
    /// Proxy for this attempt, if one was selected.
    pub proxy: Option<ProxyEndpoint>,
}

/// Resolves the effective timeout: `timeout_seconds` when positive,
/// otherwise the 100-second default.
pub fn effective_timeout(timeout_seconds: u64) -> Duration {
    if timeout_seconds > 0 {
        Duration::from_secs(timeout_seconds)
    } else {
        DEFAULT_TIMEOUT
    }
}

/// Owns one HTTP transaction: send the request, drain the body, report the
/// outcome or the transport failure.
///
/// Any response obtained without a transport-level failure is a success at
/// this layer, whatever its status code.
#[async_trait]
pub trait Transport: Send + Sync {
    /// Sends `request` once under `options` and drains the response.
    async fn send(
        &self,
        request: &NormalizedRequest,
        options: &TransportOptions,
    ) -> Result<ResponseResult, TransportError>;
}

/// The `reqwest`-backed transport.
///
/// A fresh client is built per attempt so that per-attempt proxy and
/// protocol state never leak between attempts, and so that concurrent
/// executions never share a mutable connection pool.
#[derive(Debug, Default, Clone, Copy)]
pub struct HttpTransport;

#[async_trait]
impl Transport for HttpTransport {
    async fn send(
        &self,
        request: &NormalizedRequest,
        options: &TransportOptions,
    ) -> Result<ResponseResult, TransportError> {
        let mut builder = reqwest::Client::builder()
            .timeout(options.timeout)
            .redirect(if options.auto_redirect {
                reqwest::redirect::Policy::limited(MAX_REDIRECT_HOPS)
            } else {
                reqwest::redirect::Policy::none()
            });

        // The requested version is a preference: HTTP/1.1 pins the client,
        // while HTTP/2 and HTTP/3 leave ALPN free so the connection uses
        // the requested version or steps down to one the server supports.
        if request.version == HttpVersion::Http11 {
            builder = builder.http1_only();
        }

        if let Some(proxy) = &options.proxy {
            debug!("Routing request through proxy {}", proxy.proxy_url());
            builder = builder.proxy(proxy.to_reqwest()?);
        }

        let client = builder.build().map_err(TransportError::from)?;

        let mut pending = client
            .request(request.method.clone(), request.url.clone())
            .headers(request.headers.clone());
        if let Some(body) = &request.body {
            pending = pending.body(body.clone());
        }

        let response = pending.send().await.map_err(TransportError::from)?;
        let status = response.status().as_u16();
        let headers = response.headers().clone();
        let raw = response
            .bytes()
            .await
            .map_err(TransportError::from)?
            .to_vec();

        debug!(
            "Received {status} from {} ({} body bytes)",
            request.url,
            raw.len()
        );
        Ok(ResponseResult::from_parts(status, &headers, raw))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_effective_timeout_default() {
        assert_eq!(effective_timeout(0), Duration::from_secs(100));
    }

    #[test]
    fn test_effective_timeout_explicit() {
        assert_eq!(effective_timeout(5), Duration::from_secs(5));
        assert_eq!(effective_timeout(1), Duration::from_secs(1));
    }
}
