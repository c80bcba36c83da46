//! Error types and transport-error categorization.
//!
//! The engine surfaces every failure as a typed error: validation problems
//! fail immediately, transport problems are retried up to the configured
//! bound, and an exhausted retry loop wraps the last transport failure.

use log::SetLoggerError;
use thiserror::Error;

/// Error types for initialization failures.
#[derive(Error, Debug)]
pub enum InitializationError {
    /// Error initializing the logger.
    #[error("Logger initialization error: {0}")]
    LoggerError(#[from] SetLoggerError),
}

/// Categories of transport-level failures.
///
/// Mirrors the failure modes reported by the HTTP client: only these are
/// retriable. HTTP error status codes (4xx/5xx) are not transport failures
/// and come back as normal responses.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TransportErrorKind {
    /// The client or request could not be constructed.
    Builder,
    /// A redirect loop or redirect policy violation.
    Redirect,
    /// An error produced by a status-checking layer.
    Status,
    /// The request timed out.
    Timeout,
    /// The request could not be sent.
    Request,
    /// The connection could not be established (DNS, TCP, TLS).
    Connect,
    /// The response body could not be read.
    Body,
    /// The response body could not be decoded.
    Decode,
    /// Any other transport failure.
    Other,
}

impl TransportErrorKind {
    /// Human-readable label for this error category.
    pub fn as_str(&self) -> &'static str {
        match self {
            TransportErrorKind::Builder => "request builder error",
            TransportErrorKind::Redirect => "redirect error",
            TransportErrorKind::Status => "status error",
            TransportErrorKind::Timeout => "timeout",
            TransportErrorKind::Request => "request error",
            TransportErrorKind::Connect => "connection error",
            TransportErrorKind::Body => "body read error",
            TransportErrorKind::Decode => "decode error",
            TransportErrorKind::Other => "transport error",
        }
    }
}

impl std::fmt::Display for TransportErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single-attempt transport failure: connection, TLS, protocol
/// negotiation, or timeout.
#[derive(Debug, Clone, Error)]
#[error("{kind}: {message}")]
pub struct TransportError {
    /// The failure category.
    pub kind: TransportErrorKind,
    /// Detail message from the underlying client.
    pub message: String,
}

impl TransportError {
    /// Creates a transport error from a category and detail message.
    pub fn new(kind: TransportErrorKind, message: impl Into<String>) -> Self {
        TransportError {
            kind,
            message: message.into(),
        }
    }
}

/// Categorizes a `reqwest::Error` into a `TransportErrorKind`.
fn categorize_reqwest_error(error: &reqwest::Error) -> TransportErrorKind {
    if error.is_builder() {
        TransportErrorKind::Builder
    } else if error.is_redirect() {
        TransportErrorKind::Redirect
    } else if error.is_status() {
        TransportErrorKind::Status
    } else if error.is_timeout() {
        TransportErrorKind::Timeout
    } else if error.is_connect() {
        TransportErrorKind::Connect
    } else if error.is_request() {
        TransportErrorKind::Request
    } else if error.is_body() {
        TransportErrorKind::Body
    } else if error.is_decode() {
        TransportErrorKind::Decode
    } else {
        TransportErrorKind::Other
    }
}

impl From<reqwest::Error> for TransportError {
    fn from(error: reqwest::Error) -> Self {
        TransportError {
            kind: categorize_reqwest_error(&error),
            message: error.to_string(),
        }
    }
}

/// Errors produced by request execution.
#[derive(Debug, Error)]
pub enum EngineError {
    /// The request spec is malformed (empty or unparsable URL, invalid
    /// header). Never retried.
    #[error("invalid request: {0}")]
    InvalidRequest(String),

    /// A transport failure, surfaced when a transport is driven directly
    /// without the retry loop.
    #[error(transparent)]
    Transport(#[from] TransportError),

    /// Every attempt within the retry bound failed; carries the last
    /// transport failure.
    #[error("request failed after {attempts} attempt(s): {last}")]
    RetriesExhausted {
        /// Number of attempts made.
        attempts: u32,
        /// The failure from the final attempt.
        #[source]
        last: TransportError,
    },

    /// The execution was aborted because a sibling in the same fan-out
    /// batch failed first.
    #[error("request cancelled by batch failure")]
    Cancelled,

    /// A fan-out worker task could not be joined.
    #[error("fan-out worker error: {0}")]
    Worker(String),
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_transport_error_display() {
        let error = TransportError::new(TransportErrorKind::Timeout, "deadline elapsed");
        assert_eq!(error.to_string(), "timeout: deadline elapsed");
    }

    #[test]
    fn test_retries_exhausted_display() {
        let error = EngineError::RetriesExhausted {
            attempts: 3,
            last: TransportError::new(TransportErrorKind::Connect, "connection refused"),
        };
        assert_eq!(
            error.to_string(),
            "request failed after 3 attempt(s): connection error: connection refused"
        );
    }

    #[test]
    fn test_transport_error_kind_labels() {
        assert_eq!(TransportErrorKind::Connect.as_str(), "connection error");
        assert_eq!(TransportErrorKind::Timeout.as_str(), "timeout");
        assert_eq!(TransportErrorKind::Other.as_str(), "transport error");
    }

    #[test]
    fn test_invalid_request_is_not_transport() {
        let error = EngineError::InvalidRequest("URL is empty".into());
        assert!(matches!(error, EngineError::InvalidRequest(_)));
    }
}
