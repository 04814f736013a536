//! Core logger types and traits

pub mod appender;
pub mod destination;
pub mod error;
pub mod line_format;
pub mod log_entry;
pub mod log_level;
pub mod logger;
pub mod registry;
pub mod timestamp;

pub use appender::Appender;
pub use destination::{LogFile, LogStream};
pub use error::{LoggerError, Result};
pub use line_format::{LineFormat, MessageFormat, DEFAULT_MESSAGE_FORMAT};
pub use log_entry::LogEntry;
pub use log_level::LogLevel;
pub use logger::{Logger, LoggerBuilder};
pub use registry::LogRegistry;
pub use timestamp::{TimestampFormat, DEFAULT_DATE_FORMAT};
