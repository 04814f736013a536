//! Logging macros for ergonomic log message formatting.
//!
//! These macros provide a convenient interface for logging with automatic
//! string formatting, similar to `println!` and `format!`.
//!
//! # Examples
//!
//! ```
//! use labelled_config::prelude::*;
//! use labelled_config::{info, warning};
//!
//! let registry = LogRegistry::new();
//! let logger = registry.builder("server").no_stream().build().unwrap();
//!
//! info!(logger, "Server started");
//!
//! let port = 8080;
//! warning!(logger, "Port {} already in use, retrying", port);
//! ```

/// Log a message with automatic formatting.
///
/// # Examples
///
/// ```
/// # use labelled_config::prelude::*;
/// # let logger = LogRegistry::new().builder("doc").no_stream().build().unwrap();
/// use labelled_config::log;
/// log!(logger, LogLevel::Info, "Simple message");
/// log!(logger, LogLevel::Error, "Error code: {}", 500);
/// ```
#[macro_export]
macro_rules! log {
    ($logger:expr, $level:expr, $($arg:tt)+) => {
        $logger.log($level, format!($($arg)+))
    };
}

/// Log a debug-level message.
#[macro_export]
macro_rules! debug {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Debug, $($arg)+)
    };
}

/// Log an info-level message.
#[macro_export]
macro_rules! info {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Info, $($arg)+)
    };
}

/// Log a warning-level message.
///
/// # Examples
///
/// ```
/// # use labelled_config::prelude::*;
/// # let logger = LogRegistry::new().builder("doc").no_stream().build().unwrap();
/// use labelled_config::warning;
/// warning!(logger, "Disk usage at {}%", 91);
/// ```
#[macro_export]
macro_rules! warning {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Warning, $($arg)+)
    };
}

/// Log an error-level message.
#[macro_export]
macro_rules! error {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Error, $($arg)+)
    };
}

/// Log a critical-level message.
#[macro_export]
macro_rules! critical {
    ($logger:expr, $($arg:tt)+) => {
        $crate::log!($logger, $crate::LogLevel::Critical, $($arg)+)
    };
}
