//! Log entry structure

use super::log_level::LogLevel;
use chrono::{DateTime, Local};

#[derive(Debug, Clone)]
pub struct LogEntry {
    pub level: LogLevel,
    pub label: String,
    pub message: String,
    pub timestamp: DateTime<Local>,
    /// Rendered error chain, printed on the lines following the entry
    pub error_context: Option<String>,
}

impl LogEntry {
    pub fn new(level: LogLevel, label: impl Into<String>, message: String) -> Self {
        Self {
            level,
            label: label.into(),
            message,
            timestamp: Local::now(),
            error_context: None,
        }
    }

    /// Attach an error and its `source()` chain
    pub fn with_error(mut self, error: &(dyn std::error::Error + 'static)) -> Self {
        let mut context = format!("Error: {}", error);
        let mut source = error.source();
        while let Some(cause) = source {
            context.push_str("\n  caused by: ");
            context.push_str(&cause.to_string());
            source = cause.source();
        }
        self.error_context = Some(context);
        self
    }
}
