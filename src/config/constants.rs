//! Configuration constants.
//!
//! This module defines the default operational parameters for request
//! execution: timeouts, redirect limits, and retry pacing defaults.

use std::time::Duration;

/// Default User-Agent string applied when a request spec does not supply one.
///
/// Users can override this per request via `RequestSpec::user_agent`.
pub const DEFAULT_USER_AGENT: &str =
    "Mozilla/5.0 (Windows NT 10.0; Win64; x64) AppleWebKit/537.36 (KHTML, like Gecko) Chrome/113.0.0.0 Safari/537.36";

/// Default request timeout in seconds, used when a spec's `timeout_seconds` is 0.
pub const DEFAULT_TIMEOUT_SECS: u64 = 100;

/// Default request timeout as a `Duration`.
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(DEFAULT_TIMEOUT_SECS);

/// Maximum number of redirect hops followed when auto-redirect is enabled.
pub const MAX_REDIRECT_HOPS: usize = 10;

/// Default Content-Type attached to non-empty request bodies.
pub const DEFAULT_CONTENT_TYPE: &str = "application/x-www-form-urlencoded";

// Retry pacing defaults (exponential strategy)
/// Initial delay between retry attempts in milliseconds
pub const RETRY_INITIAL_DELAY_MS: u64 = 100;
/// Backoff factor (doubles the delay with each retry)
pub const RETRY_FACTOR: u64 = 2;
/// Maximum delay between retry attempts in seconds
pub const RETRY_MAX_DELAY_SECS: u64 = 10;
