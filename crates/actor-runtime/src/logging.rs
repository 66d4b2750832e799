/// Centralized logging macros for the monitor
///
/// Thin wrappers over `tracing` that pin every record to the `moromonitor`
/// target, so a filter such as `moromonitor=debug` selects exactly our logs.
///
/// Log debug-level message
///
/// # Example
/// ```
/// use actor_runtime::monitor_debug;
/// monitor_debug!("Port {} → {}", "CLOSED", "OPEN");
/// ```
#[macro_export]
macro_rules! monitor_debug {
    ($($arg:tt)*) => {
        $crate::__tracing::debug!(target: "moromonitor", $($arg)*)
    };
}

/// Log info-level message
///
/// Use for important state changes and user-facing events
#[macro_export]
macro_rules! monitor_info {
    ($($arg:tt)*) => {
        $crate::__tracing::info!(target: "moromonitor", $($arg)*)
    };
}

/// Log warning-level message
///
/// Use for recoverable errors and unexpected conditions
#[macro_export]
macro_rules! monitor_warn {
    ($($arg:tt)*) => {
        $crate::__tracing::warn!(target: "moromonitor", $($arg)*)
    };
}

/// Log error-level message
#[macro_export]
macro_rules! monitor_error {
    ($($arg:tt)*) => {
        $crate::__tracing::error!(target: "moromonitor", $($arg)*)
    };
}

use thiserror::Error;
use tracing_subscriber::EnvFilter;

#[derive(Error, Debug)]
pub enum LoggingError {
    #[error("Invalid log filter '{filter}': {reason}")]
    Filter { filter: String, reason: String },

    #[error("Logging already initialised: {0}")]
    Init(String),
}

/// Install the global subscriber. Output goes to stderr so it never mixes
/// with the log dump on stdout.
///
/// `level` takes any `EnvFilter` directive ("debug", "moromonitor=trace");
/// without it `RUST_LOG` is used, then "error".
pub fn init_tracing(level: Option<&str>) -> Result<(), LoggingError> {
    let filter = match level {
        Some(directive) => EnvFilter::try_new(directive).map_err(|e| LoggingError::Filter {
            filter: directive.to_string(),
            reason: e.to_string(),
        })?,
        None => EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("error")),
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .try_init()
        .map_err(|e| LoggingError::Init(e.to_string()))
}

#[cfg(test)]
#[allow(clippy::panic, clippy::unwrap_used, clippy::indexing_slicing)]
mod tests {
    use super::*;

    #[test]
    fn test_logging_macros_compile() {
        // Just verify macros compile
        monitor_debug!("test debug");
        monitor_info!("test info");
        monitor_warn!("test warn");
        monitor_error!("test error");
    }

    #[test]
    fn test_logging_with_format_args() {
        monitor_debug!("Port: {} → {}", "OPEN", "CLOSED");
        monitor_info!("Port opened at {} baud", 115200);
        monitor_warn!("Tick dropped: {}", "queue full");
        monitor_error!("Failed to open port: {}", "Access denied");
    }

    #[test]
    fn test_invalid_filter_rejected() {
        let err = init_tracing(Some("moromonitor=notalevel")).unwrap_err();
        assert!(matches!(err, LoggingError::Filter { .. }));
    }
}
