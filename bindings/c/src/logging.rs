//! Logging setup for hosts that load the bridge as a shared library.

use libc::{c_char, c_int};
use std::env;
use std::ffi::CStr;
use std::fs::{File, OpenOptions};
use std::io;
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

/// Filter used when no explicit filter is passed.
pub const TRACE_ENV: &str = "CBC_BRIDGE_TRACE";
/// Output format, `pretty` (default) or `json`.
pub const LOG_FORMAT_ENV: &str = "CBC_BRIDGE_LOG_FORMAT";
/// Optional file that receives a copy of every event.
pub const LOG_FILE_ENV: &str = "CBC_BRIDGE_LOG_FILE";

/// Failures while installing the global subscriber.
#[derive(Debug, Clone, PartialEq)]
pub enum LoggingError {
    InvalidFilter(String),
    InvalidFormat(String),
    LogFile(String),
    Init(String),
}

impl LoggingError {
    pub fn code(&self) -> &'static str {
        match self {
            LoggingError::InvalidFilter(_) => "LOGGING_INVALID_FILTER",
            LoggingError::InvalidFormat(_) => "LOGGING_INVALID_FORMAT",
            LoggingError::LogFile(_) => "LOGGING_FILE_UNAVAILABLE",
            LoggingError::Init(_) => "LOGGING_INIT_FAILED",
        }
    }
}

impl std::fmt::Display for LoggingError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LoggingError::InvalidFilter(err) => {
                write!(f, "[{}] Invalid log filter: {}", self.code(), err)
            }
            LoggingError::InvalidFormat(format) => write!(
                f,
                "[{}] Invalid {} '{}' (expected 'json' or 'pretty')",
                self.code(),
                LOG_FORMAT_ENV,
                format
            ),
            LoggingError::LogFile(err) => {
                write!(f, "[{}] Failed to open log file: {}", self.code(), err)
            }
            LoggingError::Init(err) => {
                write!(f, "[{}] Failed to initialize logging: {}", self.code(), err)
            }
        }
    }
}

impl std::error::Error for LoggingError {}

fn open_log_file(path: &str) -> Result<File, LoggingError> {
    OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .map_err(|err| LoggingError::LogFile(err.to_string()))
}

fn map_init_err<E: std::fmt::Display>(err: E) -> LoggingError {
    LoggingError::Init(err.to_string())
}

fn build_filter(level: &str) -> Result<EnvFilter, LoggingError> {
    if level.eq_ignore_ascii_case("off") {
        Ok(EnvFilter::default().add_directive(LevelFilter::OFF.into()))
    } else {
        EnvFilter::try_new(level).map_err(|err| LoggingError::InvalidFilter(err.to_string()))
    }
}

fn use_json(format: &str) -> Result<bool, LoggingError> {
    if format.eq_ignore_ascii_case("json") {
        Ok(true)
    } else if format.eq_ignore_ascii_case("pretty") {
        Ok(false)
    } else {
        Err(LoggingError::InvalidFormat(format.to_string()))
    }
}

/// Install a global `tracing` subscriber for the bridge.
///
/// When `level` is `None`, this reads `CBC_BRIDGE_TRACE` if set and defaults
/// to `off`. Returns `Ok(true)` when logging is initialized and `Ok(false)` if
/// a subscriber is already configured.
pub fn enable_logging(level: Option<&str>) -> Result<bool, LoggingError> {
    if tracing::dispatcher::has_been_set() {
        return Ok(false);
    }

    let level_value = level
        .map(str::to_string)
        .or_else(|| env::var(TRACE_ENV).ok())
        .unwrap_or_else(|| "off".to_string());
    let filter = build_filter(&level_value)?;

    let format = env::var(LOG_FORMAT_ENV).unwrap_or_else(|_| "pretty".to_string());
    let json = use_json(&format)?;
    let log_file = env::var(LOG_FILE_ENV).ok();

    if json {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .json();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .json();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    } else {
        let stderr_layer = tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .pretty();
        let base = tracing_subscriber::registry()
            .with(filter)
            .with(stderr_layer);
        if let Some(path) = log_file {
            let file_layer = tracing_subscriber::fmt::layer()
                .with_writer(open_log_file(&path)?)
                .with_ansi(false)
                .pretty();
            base.with(file_layer).try_init().map_err(map_init_err)?;
        } else {
            base.try_init().map_err(map_init_err)?;
        }
    }

    Ok(true)
}

/// Installs the bridge's `tracing` subscriber.
///
/// `filter` is an `EnvFilter` directive string such as `"debug"` or
/// `"cbcbridge_cbc=trace"`; null falls back to `CBC_BRIDGE_TRACE`. Returns `1`
/// when installed, `0` if a subscriber already exists, and `-1` when the
/// filter, format, or log file is invalid.
///
/// # Safety
///
/// `filter` must be null or point to a NUL-terminated string.
#[unsafe(no_mangle)]
#[allow(non_snake_case)]
pub unsafe extern "C" fn CBC_EnableLogging(filter: *const c_char) -> c_int {
    let level = if filter.is_null() {
        None
    } else {
        match unsafe { CStr::from_ptr(filter) }.to_str() {
            Ok(level) => Some(level),
            Err(_) => return -1,
        }
    };
    match std::panic::catch_unwind(|| enable_logging(level)) {
        Ok(Ok(true)) => 1,
        Ok(Ok(false)) => 0,
        Ok(Err(_)) | Err(_) => -1,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_build_filter() {
        assert!(build_filter("off").is_ok());
        assert!(build_filter("OFF").is_ok());
        assert!(build_filter("cbcbridge_cbc=debug").is_ok());
        assert!(matches!(
            build_filter("cbcbridge_cbc=verbose"),
            Err(LoggingError::InvalidFilter(_))
        ));
    }

    #[test]
    fn test_log_format() {
        assert_eq!(use_json("json"), Ok(true));
        assert_eq!(use_json("Pretty"), Ok(false));
        assert_eq!(
            use_json("xml"),
            Err(LoggingError::InvalidFormat("xml".to_string()))
        );
    }

    #[test]
    fn test_error_display() {
        let msg = format!("{}", LoggingError::InvalidFormat("xml".to_string()));
        assert!(msg.contains("LOGGING_INVALID_FORMAT"));
        assert!(msg.contains(LOG_FORMAT_ENV));
    }
}
