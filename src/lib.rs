//! request_relay: configurable HTTP request execution.
//!
//! This library is a request-execution primitive: given a target URL,
//! method, headers, cookies, body, and transport options, it issues one
//! HTTP transaction over a negotiated protocol version, optionally through
//! a rotating proxy pool, retries on transient failure up to a bound, and
//! returns the response while emitting a structured trace of everything
//! sent and received. A second operation fans the same primitive out
//! concurrently across a list of URLs and collects results in input order.
//!
//! # Example
//!
//! ```no_run
//! use request_relay::{RequestEngine, RequestSpec};
//! use request_relay::trace::ConsoleTraceSink;
//!
//! # #[tokio::main]
//! # async fn main() -> Result<(), Box<dyn std::error::Error>> {
//! let engine = RequestEngine::new();
//! let mut spec = RequestSpec::new("https://example.com/");
//! spec.retry_count = 3;
//!
//! let response = engine.execute(&spec, &ConsoleTraceSink).await?;
//! println!("{} ({} bytes)", response.status, response.raw.len());
//! # Ok(())
//! # }
//! ```
//!
//! # Requirements
//!
//! This library requires a Tokio runtime. Use `#[tokio::main]` in your
//! application or ensure you're calling library functions within an async
//! context.

#![warn(missing_docs)]

pub mod config;
mod engine;
mod error_handling;
pub mod logging;
mod proxy;
mod request;
mod response;
mod retry;
pub mod trace;
mod transport;


// Re-export public API
pub use engine::RequestEngine;
pub use error_handling::{EngineError, InitializationError, TransportError, TransportErrorKind};
pub use logging::{init_logger_with, LogFormat};
pub use proxy::{ProxyEndpoint, ProxySelector};
pub use request::{
    build_request, HttpVersion, Method, NormalizedRequest, RequestSpec, RequestTemplate,
};
pub use response::ResponseResult;
pub use retry::RetryPacing;
pub use transport::{effective_timeout, HttpTransport, Transport, TransportOptions};
