//! Structured tracing of everything sent and received.
//!
//! The engine reports request/response/attempt events to a [`TraceSink`]
//! owned by the host. Sinks are written to only after an outcome is already
//! determined, and a sink must never fail the engine.

use colored::Colorize;
use log::{info, warn};

use crate::request::spec::{HttpVersion, Method};

/// Structured recorder of request, response, and attempt events.
///
/// Implementations must be cheap and infallible: every method is best-effort
/// side-channel output.
pub trait TraceSink: Send + Sync {
    /// The start of one request execution.
    fn request_start(&self, method: Method, version: HttpVersion, url: &str);
    /// Caller-supplied request headers, in send order.
    fn request_headers(&self, headers: &[(String, String)]);
    /// Request cookies, in consolidation order.
    fn request_cookies(&self, cookies: &[(String, String)]);
    /// The request body.
    fn request_body(&self, body: &str);
    /// The response status code.
    fn response_status(&self, status: u16);
    /// Response headers with their (possibly multiple) values.
    fn response_headers(&self, headers: &[(String, Vec<String>)]);
    /// Emitted when the response carried no headers.
    fn no_response_headers(&self);
    /// The raw response body, only when the spec requested a raw dump.
    fn response_body_raw(&self, raw: &[u8]);
    /// The decoded response body.
    fn response_body(&self, body: &str);
    /// A failed attempt that will be retried.
    fn retry(&self, attempt_index: u32, total_attempts: u32, error: &str);
}

/// Renders `raw` as space-joined two-digit hex.
pub(crate) fn hex_dump(raw: &[u8]) -> String {
    raw.iter()
        .map(|byte| format!("{byte:02x}"))
        .collect::<Vec<_>>()
        .join(" ")
}

/// Trace sink that renders events through the `log` facade with the
/// colorized layout of the original console dump.
#[derive(Debug, Default, Clone, Copy)]
pub struct ConsoleTraceSink;

impl TraceSink for ConsoleTraceSink {
    fn request_start(&self, method: Method, version: HttpVersion, url: &str) {
        info!("{}", ">> request".magenta().bold());
        info!("Request Method: {} / {}", method, version);
        info!("URL: {url}");
    }

    fn request_headers(&self, headers: &[(String, String)]) {
        info!("Request Headers:");
        for (name, value) in headers {
            info!("  {name}: {value}");
        }
    }

    fn request_cookies(&self, cookies: &[(String, String)]) {
        info!("Request Cookies:");
        for (name, value) in cookies {
            info!("  {name}={value}");
        }
    }

    fn request_body(&self, body: &str) {
        info!("Request Body:\n{body}");
    }

    fn response_status(&self, status: u16) {
        info!("{}", format!("Response Code: {status}").yellow());
    }

    fn response_headers(&self, headers: &[(String, Vec<String>)]) {
        info!("{}", "Received Headers:".blue());
        for (name, values) in headers {
            info!("  {}: {}", name.cyan(), values.join(" "));
        }
    }

    fn no_response_headers(&self) {
        info!("{}", "No Headers Received".red());
    }

    fn response_body_raw(&self, raw: &[u8]) {
        info!("{}", hex_dump(raw).yellow());
    }

    fn response_body(&self, body: &str) {
        info!("{}", "Received Payload:".green());
        info!("{}", body.green());
    }

    fn retry(&self, attempt_index: u32, total_attempts: u32, error: &str) {
        warn!(
            "{}",
            format!(
                "Retrying request due to: {error}. Attempt {}/{total_attempts}",
                attempt_index + 1
            )
            .yellow()
        );
    }
}

/// Trace sink that discards every event.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullTraceSink;

impl TraceSink for NullTraceSink {
    fn request_start(&self, _method: Method, _version: HttpVersion, _url: &str) {}
    fn request_headers(&self, _headers: &[(String, String)]) {}
    fn request_cookies(&self, _cookies: &[(String, String)]) {}
    fn request_body(&self, _body: &str) {}
    fn response_status(&self, _status: u16) {}
    fn response_headers(&self, _headers: &[(String, Vec<String>)]) {}
    fn no_response_headers(&self) {}
    fn response_body_raw(&self, _raw: &[u8]) {}
    fn response_body(&self, _body: &str) {}
    fn retry(&self, _attempt_index: u32, _total_attempts: u32, _error: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hex_dump_space_joined_two_digit() {
        assert_eq!(hex_dump(&[0x00, 0x0f, 0xff]), "00 0f ff");
        assert_eq!(hex_dump(b"ok"), "6f 6b");
        assert_eq!(hex_dump(&[]), "");
    }
}
