//! Configuration reader over a parsed INI document

use super::error::{ConfigError, Result};
use super::ini::IniDocument;
use super::value::{expand_path, parse_boolean, parse_digit, ConfigValue};
use crate::appenders::FileMode;
use crate::core::{LineFormat, LogFile, LogLevel, LogRegistry, Logger, LoggerBuilder};
use std::io::Read;
use std::path::{Path, PathBuf};

/// Label the reader logs under unless another one is configured
pub const DEFAULT_READER_LABEL: &str = "ConfigReader";

/// Where the INI text comes from
pub enum ConfigSource {
    Path(PathBuf),
    /// An open stream; `name` identifies it in diagnostics
    Reader { name: String, reader: Box<dyn Read> },
}

impl ConfigSource {
    pub fn reader(name: impl Into<String>, reader: impl Read + 'static) -> Self {
        ConfigSource::Reader {
            name: name.into(),
            reader: Box::new(reader),
        }
    }

    pub fn name(&self) -> String {
        match self {
            ConfigSource::Path(path) => path.display().to_string(),
            ConfigSource::Reader { name, .. } => name.clone(),
        }
    }
}

impl std::fmt::Debug for ConfigSource {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigSource::Path(path) => f.debug_tuple("Path").field(path).finish(),
            ConfigSource::Reader { name, .. } => {
                f.debug_struct("Reader").field("name", name).finish_non_exhaustive()
            }
        }
    }
}

impl From<PathBuf> for ConfigSource {
    fn from(path: PathBuf) -> Self {
        ConfigSource::Path(path)
    }
}

impl From<&Path> for ConfigSource {
    fn from(path: &Path) -> Self {
        ConfigSource::Path(path.to_path_buf())
    }
}

impl From<&str> for ConfigSource {
    fn from(path: &str) -> Self {
        ConfigSource::Path(PathBuf::from(path))
    }
}

impl From<String> for ConfigSource {
    fn from(path: String) -> Self {
        ConfigSource::Path(PathBuf::from(path))
    }
}

/// How a value is converted after lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Coercion {
    Text,
    Digit,
    Boolean,
    Path,
}

/// Flags for [`ConfigReader::get_value`]
///
/// If several conversions are requested, digit wins over boolean, which
/// wins over path.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct GetOptions {
    pub as_digit: bool,
    pub as_boolean: bool,
    pub as_path: bool,
    /// Log missing sections/options (error) and empty values (debug)
    pub required: bool,
}

impl Default for GetOptions {
    fn default() -> Self {
        Self {
            as_digit: false,
            as_boolean: false,
            as_path: false,
            required: true,
        }
    }
}

impl GetOptions {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn digit(mut self) -> Self {
        self.as_digit = true;
        self
    }

    #[must_use]
    pub fn boolean(mut self) -> Self {
        self.as_boolean = true;
        self
    }

    #[must_use]
    pub fn path(mut self) -> Self {
        self.as_path = true;
        self
    }

    #[must_use]
    pub fn optional(mut self) -> Self {
        self.required = false;
        self
    }

    pub fn coercion(&self) -> Coercion {
        [
            (self.as_digit, Coercion::Digit),
            (self.as_boolean, Coercion::Boolean),
            (self.as_path, Coercion::Path),
        ]
        .into_iter()
        .find_map(|(set, coercion)| set.then_some(coercion))
        .unwrap_or(Coercion::Text)
    }
}

/// Read-only view of one INI source with logged, typed lookups.
///
/// # Example
/// ```
/// use labelled_config::prelude::*;
///
/// let text = "[server]\nport = 8080\ndebug = yes\n";
/// let reader = ConfigReader::builder(ConfigSource::reader("inline", text.as_bytes()))
///     .verbose(false)
///     .build()
///     .unwrap();
///
/// assert_eq!(reader.validate_sections(["server"]), None);
/// assert_eq!(reader.get_digit("server", "port"), Some(ConfigValue::Integer(8080)));
/// assert_eq!(reader.get_bool("server", "debug"), Some(true));
/// ```
#[derive(Debug)]
pub struct ConfigReader {
    document: IniDocument,
    source_name: String,
    logger: Logger,
    interpolation: bool,
}

impl ConfigReader {
    /// Reader with default settings: own registry, verbose stderr logging
    pub fn new(source: impl Into<ConfigSource>) -> Result<Self> {
        Self::builder(source).build()
    }

    #[must_use]
    pub fn builder(source: impl Into<ConfigSource>) -> ConfigReaderBuilder {
        ConfigReaderBuilder::new(source.into())
    }

    pub fn source_name(&self) -> &str {
        &self.source_name
    }

    pub fn logger(&self) -> &Logger {
        &self.logger
    }

    pub fn document(&self) -> &IniDocument {
        &self.document
    }

    pub fn has_section(&self, section: &str) -> bool {
        self.document.has_section(section)
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.document.has_option(section, option)
    }

    pub fn sections(&self) -> Vec<&str> {
        self.document.sections().collect()
    }

    pub fn options(&self, section: &str) -> Option<Vec<&str>> {
        self.document.options(section)
    }

    /// Names from `names` that are not sections, in the given order;
    /// `None` when all are present.
    pub fn validate_sections<I, S>(&self, names: I) -> Option<Vec<String>>
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        let missing: Vec<String> = names
            .into_iter()
            .filter(|name| !self.document.has_section(name.as_ref()))
            .map(|name| name.as_ref().to_string())
            .collect();
        if missing.is_empty() {
            None
        } else {
            Some(missing)
        }
    }

    /// Warn once per name. Does not check whether the section exists.
    pub fn log_invalid_sections<I, S>(&self, names: I)
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        for name in names {
            self.logger
                .warning(format!("Invalid section '{}'", name.as_ref()));
        }
    }

    /// Look up and convert a value.
    ///
    /// `None` for a missing section, a missing option, an empty value or a
    /// failed conversion. Missing entries are logged as errors and empty
    /// values at debug level, but only when `options.required` is set;
    /// conversion failures are always logged.
    pub fn get_value(&self, section: &str, option: &str, options: GetOptions) -> Option<ConfigValue> {
        if !self.document.has_section(section) {
            if options.required {
                self.logger.error(format!("Invalid section '{}'", section));
            }
            return None;
        }
        if !self.document.has_option(section, option) {
            if options.required {
                self.logger
                    .error(format!("Invalid option in '{}': {}", section, option));
            }
            return None;
        }

        let value = self.raw_value(section, option)?;
        if value.is_empty() {
            if options.required {
                self.logger
                    .debug(format!("Empty value in '{}': {}", section, option));
            }
            return None;
        }

        match options.coercion() {
            Coercion::Digit => parse_digit(&value).or_else(|| {
                self.logger
                    .error(format!("Invalid digit value '{}'", value));
                None
            }),
            Coercion::Boolean => match parse_boolean(&value) {
                Some(flag) => Some(ConfigValue::Boolean(flag)),
                None => {
                    self.logger.error(format!("Invalid bool value '{}'", value));
                    None
                }
            },
            Coercion::Path => Some(ConfigValue::Path(expand_path(&value))),
            Coercion::Text => Some(ConfigValue::Text(value)),
        }
    }

    fn raw_value(&self, section: &str, option: &str) -> Option<String> {
        if !self.interpolation {
            return self.document.get(section, option).map(str::to_string);
        }
        match self.document.get_interpolated(section, option) {
            Ok(value) => value,
            Err(e) => {
                self.logger.error(e.to_string());
                None
            }
        }
    }

    pub fn get_string(&self, section: &str, option: &str) -> Option<String> {
        self.get_value(section, option, GetOptions::new())
            .and_then(ConfigValue::into_string)
    }

    pub fn get_digit(&self, section: &str, option: &str) -> Option<ConfigValue> {
        self.get_value(section, option, GetOptions::new().digit())
    }

    pub fn get_bool(&self, section: &str, option: &str) -> Option<bool> {
        self.get_value(section, option, GetOptions::new().boolean())
            .and_then(|value| value.as_bool())
    }

    pub fn get_path(&self, section: &str, option: &str) -> Option<PathBuf> {
        self.get_value(section, option, GetOptions::new().path())
            .and_then(ConfigValue::into_path)
    }

    /// Close the reader's logging label, releasing its owned log file
    pub fn close(&self) {
        self.logger.close();
    }
}

/// Builder for [`ConfigReader`]
pub struct ConfigReaderBuilder {
    source: ConfigSource,
    registry: Option<LogRegistry>,
    label: String,
    log_file: Option<LogFile>,
    log_file_mode: FileMode,
    verbose: bool,
    interpolation: bool,
}

impl ConfigReaderBuilder {
    fn new(source: ConfigSource) -> Self {
        Self {
            source,
            registry: None,
            label: DEFAULT_READER_LABEL.to_string(),
            log_file: None,
            log_file_mode: FileMode::default(),
            verbose: true,
            interpolation: false,
        }
    }

    /// Registry to log through; a private one is created otherwise
    #[must_use = "builder methods return a new value"]
    pub fn registry(mut self, registry: &LogRegistry) -> Self {
        self.registry = Some(registry.clone());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn label(mut self, label: impl Into<String>) -> Self {
        self.label = label.into();
        self
    }

    /// Also log to this file path or stream
    #[must_use = "builder methods return a new value"]
    pub fn log_file(mut self, log_file: impl Into<LogFile>) -> Self {
        self.log_file = Some(log_file.into());
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn log_file_mode(mut self, mode: FileMode) -> Self {
        self.log_file_mode = mode;
        self
    }

    #[must_use = "builder methods return a new value"]
    pub fn verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Expand `%(name)s` references in values
    #[must_use = "builder methods return a new value"]
    pub fn interpolation(mut self, enabled: bool) -> Self {
        self.interpolation = enabled;
        self
    }

    /// Read and parse the source
    ///
    /// A failure is logged on the reader's label, which is then closed so
    /// no log file stays open without a reader to own it.
    pub fn build(self) -> Result<ConfigReader> {
        let registry = self.registry.unwrap_or_default();
        let logger = LoggerBuilder::new(registry, self.label)
            .verbose(self.verbose)
            .finish(LineFormat::default().shared());
        if let Some(log_file) = self.log_file {
            logger.set_log_file(log_file, self.log_file_mode, LogLevel::Info);
        }

        let source_name = self.source.name();
        let parsed = read_source(self.source)
            .and_then(|text| IniDocument::parse(&text, &source_name));
        let document = match parsed {
            Ok(document) => document,
            Err(e) => {
                logger.error(e.to_string());
                logger.close();
                return Err(e);
            }
        };

        Ok(ConfigReader {
            document,
            source_name,
            logger,
            interpolation: self.interpolation,
        })
    }
}

fn read_source(source: ConfigSource) -> Result<String> {
    match source {
        ConfigSource::Path(path) => {
            if !path.exists() {
                return Err(ConfigError::SourceNotFound { path });
            }
            let name = path.display().to_string();
            if !path.is_file() {
                return Err(ConfigError::invalid_source(name, "not a regular file"));
            }
            std::fs::read_to_string(&path).map_err(|e| ConfigError::invalid_source(name, e.to_string()))
        }
        ConfigSource::Reader { name, mut reader } => {
            let mut text = String::new();
            reader
                .read_to_string(&mut text)
                .map_err(|e| ConfigError::invalid_source(name, e.to_string()))?;
            Ok(text)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn reader(text: &'static str) -> ConfigReader {
        ConfigReader::builder(ConfigSource::reader("test", text.as_bytes()))
            .verbose(false)
            .build()
            .expect("valid ini")
    }

    #[test]
    fn test_coercion_precedence() {
        assert_eq!(GetOptions::new().coercion(), Coercion::Text);
        assert_eq!(GetOptions::new().path().boolean().digit().coercion(), Coercion::Digit);
        assert_eq!(GetOptions::new().path().boolean().coercion(), Coercion::Boolean);
        assert_eq!(GetOptions::new().path().coercion(), Coercion::Path);
    }

    #[test]
    fn test_digit_scenarios() {
        assert_eq!(reader("[s]\nk=3.5\n").get_digit("s", "k"), Some(ConfigValue::Float(3.5)));
        assert_eq!(reader("[s]\nk=3\n").get_digit("s", "k"), Some(ConfigValue::Integer(3)));
        assert_eq!(reader("[s]\nk=\n").get_string("s", "k"), None);
    }

    #[test]
    fn test_digit_wins_over_boolean() {
        let r = reader("[s]\nk=yes\n");
        let options = GetOptions::new().digit().boolean();
        assert_eq!(r.get_value("s", "k", options), None);
    }

    #[test]
    fn test_interpolation_is_opt_in() {
        let text = "[s]\nbase=/opt\npath=%(base)s/bin\n";
        assert_eq!(reader(text).get_string("s", "path").as_deref(), Some("%(base)s/bin"));

        let interpolating = ConfigReader::builder(ConfigSource::reader("interp", text.as_bytes()))
            .verbose(false)
            .interpolation(true)
            .build()
            .unwrap();
        assert_eq!(interpolating.get_string("s", "path").as_deref(), Some("/opt/bin"));
    }

    #[test]
    fn test_invalid_utf8_stream() {
        let bytes: &'static [u8] = &[b'[', 0xff, b']'];
        let err = ConfigReader::builder(ConfigSource::reader("binary", bytes))
            .verbose(false)
            .build()
            .unwrap_err();
        assert!(matches!(err, ConfigError::InvalidSource { .. }));
    }
}
