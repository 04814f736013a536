//! Console appender implementation

use crate::core::{Appender, LineFormat, LogEntry, Result};
#[cfg(feature = "console")]
use colored::Colorize;
use std::io::Write;
use std::sync::Arc;

/// Which process stream a [`ConsoleAppender`] writes to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ConsoleTarget {
    #[default]
    Stderr,
    Stdout,
}

/// Writes to stderr or stdout. The process streams are never closed.
pub struct ConsoleAppender {
    target: ConsoleTarget,
    #[cfg_attr(not(feature = "console"), allow(dead_code))]
    use_colors: bool,
    format: Arc<LineFormat>,
}

impl ConsoleAppender {
    pub fn new(target: ConsoleTarget, format: Arc<LineFormat>) -> Self {
        Self {
            target,
            use_colors: false,
            format,
        }
    }

    /// Colour the severity name. Only has an effect with the `console` feature.
    #[must_use]
    pub fn with_colors(mut self, use_colors: bool) -> Self {
        self.use_colors = use_colors;
        self
    }

    fn format_text(&self, entry: &LogEntry) -> String {
        let line = self.format.format(entry);
        #[cfg(feature = "console")]
        if self.use_colors {
            let level = entry.level.to_str().color(entry.level.color_code()).to_string();
            return line.replacen(entry.level.to_str(), &level, 1);
        }
        line
    }
}

impl Appender for ConsoleAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format_text(entry);
        match self.target {
            ConsoleTarget::Stderr => writeln!(std::io::stderr().lock(), "{}", output)?,
            ConsoleTarget::Stdout => writeln!(std::io::stdout().lock(), "{}", output)?,
        }
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        match self.target {
            ConsoleTarget::Stderr => std::io::stderr().flush()?,
            ConsoleTarget::Stdout => std::io::stdout().flush()?,
        }
        Ok(())
    }

    fn name(&self) -> &str {
        match self.target {
            ConsoleTarget::Stderr => "stderr",
            ConsoleTarget::Stdout => "stdout",
        }
    }
}
