//! Timestamp formatting utilities
//!
//! Renders the `asctime` field of a log line. The default matches the
//! classic `YYYY-MM-DD HH:MM:SS` layout; any strftime string can be supplied
//! and is validated before a logger is built.

use super::error::{LoggerError, Result};
use chrono::format::{Item, StrftimeItems};
use chrono::{DateTime, TimeZone};

/// strftime layout of [`TimestampFormat::Standard`]
pub const DEFAULT_DATE_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Timestamp format options
///
/// # Examples
///
/// ```
/// use labelled_config::core::TimestampFormat;
///
/// let format = TimestampFormat::custom("%d/%b/%Y:%H:%M:%S").unwrap();
/// assert!(TimestampFormat::custom("%Q").is_err());
/// # let _ = format;
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub enum TimestampFormat {
    /// `2025-01-08 10:30:45`
    #[default]
    Standard,

    /// Custom strftime format
    Custom(String),
}

impl TimestampFormat {
    /// Build a custom format, rejecting strings chrono cannot render
    pub fn custom(format_str: impl Into<String>) -> Result<Self> {
        let format = TimestampFormat::Custom(format_str.into());
        format.validate()?;
        Ok(format)
    }

    /// Check that a custom strftime string contains only known specifiers
    pub fn validate(&self) -> Result<()> {
        if let TimestampFormat::Custom(format_str) = self {
            if StrftimeItems::new(format_str).any(|item| matches!(item, Item::Error)) {
                return Err(LoggerError::config(
                    "TimestampFormat",
                    format!("invalid strftime format '{}'", format_str),
                ));
            }
        }
        Ok(())
    }

    #[must_use]
    pub fn format<Tz>(&self, datetime: &DateTime<Tz>) -> String
    where
        Tz: TimeZone,
        Tz::Offset: std::fmt::Display,
    {
        match self {
            TimestampFormat::Standard => datetime.format(DEFAULT_DATE_FORMAT).to_string(),
            TimestampFormat::Custom(format_str) => datetime.format(format_str).to_string(),
        }
    }
}
