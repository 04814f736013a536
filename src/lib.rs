//! # Labelled Config
//!
//! Two small utility layers meant to be shared by other tools:
//!
//! - **Logging facade**: a [`LogRegistry`] keyed by label. Every [`Logger`]
//!   handle created with the same label writes to the same destinations
//!   (console, caller-supplied streams, one owned log file), each with its
//!   own severity threshold.
//! - **Configuration reader**: [`ConfigReader`] loads an INI source once,
//!   validates section presence and converts values to strings, numbers,
//!   booleans or absolute paths. Lookup problems are logged and returned as
//!   `None` so callers decide which fields are required.

pub mod appenders;
pub mod config;
pub mod core;
pub mod macros;

pub mod prelude {
    pub use crate::appenders::{shared_writer, FileMode, SharedWriter};
    pub use crate::config::{
        ConfigError, ConfigReader, ConfigReaderBuilder, ConfigSource, ConfigValue, GetOptions,
    };
    pub use crate::core::{
        Appender, LogEntry, LogFile, LogLevel, LogRegistry, LogStream, Logger, LoggerBuilder,
        LoggerError, Result, TimestampFormat,
    };
}

pub use appenders::{shared_writer, ConsoleAppender, FileAppender, FileMode, SharedWriter, StreamAppender};
pub use config::{ConfigError, ConfigReader, ConfigSource, ConfigValue, GetOptions};
pub use core::{
    Appender, LineFormat, LogEntry, LogFile, LogLevel, LogRegistry, LogStream, Logger,
    LoggerBuilder, LoggerError, Result, TimestampFormat,
};
