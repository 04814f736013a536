//! Logger handle bound to a label

use super::{
    destination::{LogFile, LogStream},
    error::Result,
    line_format::LineFormat,
    log_entry::LogEntry,
    log_level::LogLevel,
    registry::{attach_initial_stream, LogRegistry},
};
use crate::appenders::FileMode;
use std::sync::Arc;

/// Handle onto the destinations a [`LogRegistry`] keeps for one label.
///
/// Handles are cheap to clone. Dropping a handle never closes anything;
/// call [`Logger::close`] to detach the label's destinations.
#[derive(Clone, Debug)]
pub struct Logger {
    label: String,
    registry: LogRegistry,
    format: Arc<LineFormat>,
    colors: bool,
}

impl Logger {
    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn registry(&self) -> &LogRegistry {
        &self.registry
    }

    /// Line format used for destinations attached through this handle
    pub fn line_format(&self) -> &LineFormat {
        &self.format
    }

    /// Attach another output destination with its own threshold
    pub fn add_stream(&self, stream: impl Into<LogStream>, level: LogLevel) {
        let appender = stream.into().into_appender(Arc::clone(&self.format), self.colors);
        self.registry.attach(&self.label, appender, level);
    }

    /// Point the label at a log file.
    ///
    /// A path is opened with `mode` and owned by the registry; any file the
    /// label owned before is closed. A stream is attached without taking
    /// ownership. Returns `false` if the path could not be opened, in which
    /// case the failure is reported on stderr and nothing changes.
    pub fn set_log_file(&self, target: impl Into<LogFile>, mode: FileMode, level: LogLevel) -> bool {
        self.registry.set_log_file(
            &self.label,
            target.into(),
            mode,
            level,
            Arc::clone(&self.format),
            self.colors,
        )
    }

    /// Set the threshold of every destination currently attached to the label
    pub fn set_level(&self, level: LogLevel) {
        self.registry.set_level(&self.label, level);
    }

    pub fn log(&self, level: LogLevel, message: impl Into<String>) {
        let entry = LogEntry::new(level, self.label.as_str(), message.into());
        self.registry.dispatch(&entry);
    }

    #[inline]
    pub fn debug(&self, message: impl Into<String>) {
        self.log(LogLevel::Debug, message);
    }

    #[inline]
    pub fn info(&self, message: impl Into<String>) {
        self.log(LogLevel::Info, message);
    }

    #[inline]
    pub fn warning(&self, message: impl Into<String>) {
        self.log(LogLevel::Warning, message);
    }

    #[inline]
    pub fn error(&self, message: impl Into<String>) {
        self.log(LogLevel::Error, message);
    }

    #[inline]
    pub fn critical(&self, message: impl Into<String>) {
        self.log(LogLevel::Critical, message);
    }

    /// Log at ERROR level and print `error` with its source chain below the line
    pub fn exception(&self, message: impl Into<String>, error: &(dyn std::error::Error + 'static)) {
        let entry =
            LogEntry::new(LogLevel::Error, self.label.as_str(), message.into()).with_error(error);
        self.registry.dispatch(&entry);
    }

    pub fn flush(&self) -> Result<()> {
        self.registry.flush(&self.label)
    }

    /// Detach all destinations of the label and close its owned log file.
    /// Streams supplied by the caller stay open.
    pub fn close(&self) {
        self.registry.close(&self.label);
    }
}

/// Builder for a [`Logger`] handle
///
/// # Example
/// ```
/// use labelled_config::prelude::*;
///
/// let registry = LogRegistry::new();
/// let logger = registry
///     .builder("pipeline")
///     .message_format("%(levelname)s %(name)s: %(message)s")
///     .date_format("%H:%M:%S")
///     .stream(LogStream::Stdout)
///     .build()
///     .unwrap();
/// logger.info("started");
/// ```
pub struct LoggerBuilder {
    registry: LogRegistry,
    label: String,
    verbose: bool,
    message_format: Option<String>,
    date_format: Option<String>,
    stream: Option<LogStream>,
    colors: bool,
}

impl LoggerBuilder {
    pub(crate) fn new(registry: LogRegistry, label: impl Into<String>) -> Self {
        Self {
            registry,
            label: label.into(),
            verbose: true,
            message_format: None,
            date_format: None,
            stream: Some(LogStream::Stderr),
            colors: false,
        }
    }

    /// Verbose streams accept INFO and above, otherwise WARNING and above
    #[must_use = "builder methods return a new value"]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Message template, see [`crate::core::line_format`]
    #[must_use = "builder methods return a new value"]
    pub fn message_format(mut self, template: impl Into<String>) -> Self {
        self.message_format = Some(template.into());
        self
    }

    /// strftime format of the `asctime` field
    #[must_use = "builder methods return a new value"]
    pub fn date_format(mut self, format_str: impl Into<String>) -> Self {
        self.date_format = Some(format_str.into());
        self
    }

    /// Initial destination, attached only when the label is new
    #[must_use = "builder methods return a new value"]
    pub fn stream(mut self, stream: impl Into<LogStream>) -> Self {
        self.stream = Some(stream.into());
        self
    }

    /// Register the label without any initial destination
    #[must_use = "builder methods return a new value"]
    pub fn no_stream(mut self) -> Self {
        self.stream = None;
        self
    }

    /// Colour severity names on console destinations
    #[must_use = "builder methods return a new value"]
    pub fn colors(mut self, colors: bool) -> Self {
        self.colors = colors;
        self
    }

    /// Validate the formats and produce the handle.
    ///
    /// If the label is already registered the handle reuses its
    /// destinations and the initial stream is not attached.
    pub fn build(self) -> Result<Logger> {
        let format = LineFormat::from_templates(
            self.message_format.as_deref(),
            self.date_format.as_deref(),
        )?;
        Ok(self.finish(format.shared()))
    }

    pub(crate) fn finish(self, format: Arc<LineFormat>) -> Logger {
        attach_initial_stream(
            &self.registry,
            &self.label,
            self.stream,
            self.verbose,
            Arc::clone(&format),
            self.colors,
        );
        Logger {
            label: self.label,
            registry: self.registry,
            format,
            colors: self.colors,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::shared_writer;
    use crate::core::LoggerError;

    #[test]
    fn test_builder_rejects_bad_formats() {
        let registry = LogRegistry::new();
        let err = registry.builder("bad").message_format("%(nope)s").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        let err = registry.builder("bad").date_format("%Y-%").build().unwrap_err();
        assert!(matches!(err, LoggerError::InvalidConfiguration { .. }));

        assert!(!registry.is_registered("bad"));
    }

    #[test]
    fn test_no_stream_registers_label() {
        let registry = LogRegistry::new();
        let logger = registry.builder("silent").no_stream().build().unwrap();
        assert!(registry.is_registered("silent"));
        assert_eq!(registry.destination_count("silent"), 0);
        logger.critical("goes nowhere");
    }

    #[test]
    fn test_set_level_applies_to_all_destinations() {
        let registry = LogRegistry::new();
        let (first, first_stream) = shared_writer(Vec::<u8>::new());
        let (second, second_stream) = shared_writer(Vec::<u8>::new());
        let logger = registry
            .builder("levels")
            .stream(first_stream)
            .build()
            .unwrap();
        logger.add_stream(second_stream, LogLevel::Critical);

        logger.set_level(LogLevel::Debug);
        logger.debug("now visible");

        for buffer in [first, second] {
            let text = String::from_utf8(buffer.lock().clone()).unwrap();
            assert!(text.contains("DEBUG: [levels] now visible"));
        }
    }

    #[test]
    fn test_close_keeps_caller_stream_usable() {
        use std::io::Write;

        let registry = LogRegistry::new();
        let (buffer, stream) = shared_writer(Vec::<u8>::new());
        let logger = registry.builder("owned-by-caller").no_stream().build().unwrap();
        assert!(logger.set_log_file(stream, FileMode::Truncate, LogLevel::Info));
        logger.info("before close");
        logger.close();

        assert!(!registry.is_registered("owned-by-caller"));
        assert_eq!(Arc::strong_count(&buffer), 1);
        buffer.lock().write_all(b"caller still writes\n").unwrap();
        let text = String::from_utf8(buffer.lock().clone()).unwrap();
        assert!(text.contains("before close"));
        assert!(text.ends_with("caller still writes\n"));
    }
}
