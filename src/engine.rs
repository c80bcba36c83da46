//! Request execution: the bounded retry loop and the concurrent fan-out.

use std::sync::Arc;

use futures::stream::FuturesUnordered;
use futures::StreamExt;
use log::{debug, error};
use tokio_util::sync::CancellationToken;

use crate::error_handling::EngineError;
use crate::proxy::ProxySelector;
use crate::request::builder::build_request;
use crate::request::spec::{RequestSpec, RequestTemplate};
use crate::response::ResponseResult;
use crate::retry::RetryPacing;
use crate::trace::TraceSink;
use crate::transport::{effective_timeout, HttpTransport, Transport, TransportOptions};

/// Executes request specs with bounded retries and concurrent fan-out.
///
/// The engine owns a transport, a proxy selector, and a retry pacing
/// policy. It is cheap to share: the transport and selector sit behind
/// `Arc`, and fan-out workers clone them per task.
pub struct RequestEngine<T: Transport = HttpTransport> {
    transport: Arc<T>,
    selector: Arc<ProxySelector>,
    pacing: RetryPacing,
}

impl RequestEngine<HttpTransport> {
    /// Creates an engine backed by the real HTTP transport.
    pub fn new() -> Self {
        Self::with_transport(HttpTransport)
    }
}

impl Default for RequestEngine<HttpTransport> {
    fn default() -> Self {
        Self::new()
    }
}

impl<T: Transport> RequestEngine<T> {
    /// Creates an engine over a custom transport.
    pub fn with_transport(transport: T) -> Self {
        RequestEngine {
            transport: Arc::new(transport),
            selector: Arc::new(ProxySelector::new()),
            pacing: RetryPacing::None,
        }
    }

    /// Replaces the retry pacing policy.
    pub fn with_pacing(mut self, pacing: RetryPacing) -> Self {
        self.pacing = pacing;
        self
    }

    /// Replaces the proxy selector (e.g. with a seeded one).
    pub fn with_selector(mut self, selector: ProxySelector) -> Self {
        self.selector = Arc::new(selector);
        self
    }

    /// Executes one request spec: up to `retry_count` sequential attempts,
    /// each with a freshly selected proxy and a freshly built request.
    ///
    /// Any response obtained without a transport failure ends the loop and
    /// is returned, whatever its status code. Transport failures are
    /// retried until the bound is reached, then surfaced as
    /// [`EngineError::RetriesExhausted`]. Validation failures are never
    /// retried. The full request/response trace block is emitted once the
    /// outcome is known; each non-final failed attempt emits one retry
    /// event.
    pub async fn execute(
        &self,
        spec: &RequestSpec,
        trace: &dyn TraceSink,
    ) -> Result<ResponseResult, EngineError> {
        // retry_count < 1 would mean "never attempt"; clamp so the spec
        // always gets exactly one chance.
        let attempts = spec.retry_count.max(1);
        let mut delays = self.pacing.delays();

        for attempt in 0..attempts {
            let proxy = self.selector.select(&spec.proxy_pool);
            let request = build_request(spec)?;
            let options = TransportOptions {
                timeout: effective_timeout(spec.timeout_seconds),
                auto_redirect: spec.auto_redirect,
                proxy,
            };

            debug!(
                "Attempt {}/{attempts} for {} ({})",
                attempt + 1,
                spec.url,
                request.version
            );

            match self.transport.send(&request, &options).await {
                Ok(result) => {
                    emit_trace_block(trace, spec, &result);
                    return Ok(result);
                }
                Err(last) if attempt + 1 >= attempts => {
                    error!(
                        "Request to {} failed after {attempts} attempt(s): {last}",
                        spec.url
                    );
                    return Err(EngineError::RetriesExhausted { attempts, last });
                }
                Err(transport_error) => {
                    trace.retry(attempt, attempts, &transport_error.to_string());
                    if let Some(delay) = delays.next() {
                        if !delay.is_zero() {
                            tokio::time::sleep(delay).await;
                        }
                    }
                }
            }
        }

        // attempts >= 1, so the loop always returns before reaching here
        Err(EngineError::Worker("retry loop made no attempts".to_string()))
    }

    /// Executes the template once per URL, all in parallel, and returns the
    /// results reordered to match the input order of `urls`.
    ///
    /// The batch is fail-fast with no partial success: the first observed
    /// failure aborts the call, and a cancellation token signals sibling
    /// in-flight executions to stop instead of running to completion.
    pub async fn execute_all(
        &self,
        urls: &[String],
        template: &RequestTemplate,
        trace: Arc<dyn TraceSink>,
    ) -> Result<Vec<ResponseResult>, EngineError>
    where
        T: 'static,
    {
        let token = CancellationToken::new();
        let mut tasks = FuturesUnordered::new();

        for (index, url) in urls.iter().enumerate() {
            let spec = template.for_url(url);
            let worker = RequestEngine {
                transport: Arc::clone(&self.transport),
                selector: Arc::clone(&self.selector),
                pacing: self.pacing.clone(),
            };
            let trace = Arc::clone(&trace);
            let token = token.clone();
            tasks.push(tokio::spawn(async move {
                let result = tokio::select! {
                    _ = token.cancelled() => Err(EngineError::Cancelled),
                    result = worker.execute(&spec, trace.as_ref()) => result,
                };
                (index, result)
            }));
        }

        let mut slots: Vec<Option<ResponseResult>> = Vec::new();
        slots.resize_with(urls.len(), || None);
        let mut first_failure: Option<EngineError> = None;

        while let Some(joined) = tasks.next().await {
            match joined {
                Ok((index, Ok(result))) => slots[index] = Some(result),
                Ok((index, Err(engine_error))) => {
                    if first_failure.is_none() {
                        debug!("Fan-out element {index} failed, cancelling siblings");
                        first_failure = Some(engine_error);
                        token.cancel();
                    }
                }
                Err(join_error) => {
                    if first_failure.is_none() {
                        first_failure = Some(EngineError::Worker(join_error.to_string()));
                        token.cancel();
                    }
                }
            }
        }

        if let Some(failure) = first_failure {
            return Err(failure);
        }
        let results: Option<Vec<ResponseResult>> = slots.into_iter().collect();
        results.ok_or_else(|| EngineError::Worker("fan-out result slot left empty".to_string()))
    }
}

/// Emits the full request/response trace block for a determined outcome.
fn emit_trace_block(trace: &dyn TraceSink, spec: &RequestSpec, result: &ResponseResult) {
    trace.request_start(spec.method, spec.http_version, &spec.url);
    if !spec.headers.is_empty() {
        trace.request_headers(&spec.headers);
    }
    if !spec.cookies.is_empty() {
        trace.request_cookies(&spec.cookies);
    }
    if !spec.body.is_empty() {
        trace.request_body(&spec.body);
    }
    trace.response_status(result.status);
    if result.headers.is_empty() {
        trace.no_response_headers();
    } else {
        trace.response_headers(&result.headers);
    }
    if spec.output_raw {
        trace.response_body_raw(&result.raw);
    }
    trace.response_body(&result.text);
}
