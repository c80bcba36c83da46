//! Retry pacing policies.
//!
//! The retry bound itself lives on the request spec (`retry_count`); this
//! module only decides how long to wait between attempts. The default is no
//! delay, but operators can configure fixed or exponential pacing to avoid
//! hammering an endpoint that just failed.

use std::time::Duration;

use tokio_retry::strategy::{ExponentialBackoff, FixedInterval};

use crate::config::{RETRY_FACTOR, RETRY_INITIAL_DELAY_MS, RETRY_MAX_DELAY_SECS};

/// Delay policy applied between retry attempts.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RetryPacing {
    /// No delay between attempts.
    None,
    /// A fixed delay between attempts.
    Fixed(Duration),
    /// Exponentially growing delay, capped at `max_delay`.
    Exponential {
        /// Initial delay in milliseconds.
        initial_ms: u64,
        /// Multiplier applied to each successive delay.
        factor: u64,
        /// Upper bound on any single delay.
        max_delay: Duration,
    },
}

impl RetryPacing {
    /// Exponential pacing with the crate's default parameters.
    pub fn default_exponential() -> Self {
        RetryPacing::Exponential {
            initial_ms: RETRY_INITIAL_DELAY_MS,
            factor: RETRY_FACTOR,
            max_delay: Duration::from_secs(RETRY_MAX_DELAY_SECS),
        }
    }

    /// Returns the sequence of inter-attempt delays for one execution.
    pub fn delays(&self) -> Box<dyn Iterator<Item = Duration> + Send> {
        match self {
            RetryPacing::None => Box::new(std::iter::repeat(Duration::ZERO)),
            RetryPacing::Fixed(delay) => Box::new(FixedInterval::new(*delay)),
            RetryPacing::Exponential {
                initial_ms,
                factor,
                max_delay,
            } => Box::new(
                ExponentialBackoff::from_millis(*initial_ms)
                    .factor(*factor)
                    .max_delay(*max_delay),
            ),
        }
    }
}

impl Default for RetryPacing {
    fn default() -> Self {
        RetryPacing::None
    }
}
