//! Logger initialization for host applications.
//!
//! The library itself only emits through the `log` facade; hosts that want
//! the colorized console output (or JSON lines) can install this logger.

use std::io::Write;

use colored::Colorize;
use log::LevelFilter;

use crate::error_handling::InitializationError;

/// Log output format.
#[derive(Clone, Debug)]
pub enum LogFormat {
    /// Human-readable format with colors (default)
    Plain,
    /// Structured JSON format for machine parsing
    Json,
}

/// Initializes the logger with the specified level and format.
///
/// Configures `env_logger` with custom formatting. The logger reads from
/// the `RUST_LOG` environment variable first; the provided `level`
/// overrides it, which keeps `RUST_LOG=debug` available for quick
/// debugging while explicit host control still wins.
///
/// # Errors
///
/// Returns `InitializationError::LoggerError` if a logger is already set.
pub fn init_logger_with(level: LevelFilter, format: LogFormat) -> Result<(), InitializationError> {
    let mut builder = env_logger::Builder::from_default_env();

    builder.filter_level(level);
    builder.filter_module("reqwest", LevelFilter::Info);
    builder.filter_module("hyper", LevelFilter::Info);
    builder.filter_module("request_relay", level);

    match format {
        LogFormat::Json => {
            builder.format(|buf, record| {
                writeln!(
                    buf,
                    "{{\"ts\":{},\"level\":\"{}\",\"target\":\"{}\",\"msg\":{}}}",
                    chrono::Utc::now().timestamp_millis(),
                    record.level(),
                    record.target(),
                    serde_json::to_string(&record.args().to_string())
                        .unwrap_or_else(|_| "\"\"".into())
                )
            });
        }
        LogFormat::Plain => {
            builder.format(|buf, record| {
                let level = record.level();
                let colored_level = match level {
                    log::Level::Error => level.to_string().red(),
                    log::Level::Warn => level.to_string().yellow(),
                    log::Level::Info => level.to_string().green(),
                    log::Level::Debug => level.to_string().blue(),
                    log::Level::Trace => level.to_string().purple(),
                };

                writeln!(
                    buf,
                    "{} [{}] {}",
                    record.target().cyan(),
                    colored_level,
                    record.args()
                )
            });
        }
    }

    // try_init() instead of init() so tests can call this more than once
    builder.try_init().map_err(InitializationError::from)?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_init_logger_is_idempotent_enough_for_tests() {
        // The first call may or may not win the race with other tests; the
        // second call must report an error instead of panicking.
        let _ = init_logger_with(LevelFilter::Info, LogFormat::Plain);
        let second = init_logger_with(LevelFilter::Debug, LogFormat::Json);
        if let Err(error) = second {
            assert!(matches!(error, InitializationError::LoggerError(_)));
        }
    }
}
