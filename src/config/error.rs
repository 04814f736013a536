//! Error types for the configuration reader

use std::path::PathBuf;

pub type Result<T> = std::result::Result<T, ConfigError>;

#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    /// Config path does not exist
    #[error("Config file does not exist: '{}'", path.display())]
    SourceNotFound { path: PathBuf },

    /// Source exists but cannot be read as INI text
    #[error("Invalid config source '{name}': {message}")]
    InvalidSource { name: String, message: String },

    /// Malformed INI syntax
    #[error("Parse error in '{source_name}' at line {line}: {message}")]
    Parse {
        source_name: String,
        line: usize,
        message: String,
    },

    /// `%(name)s` reference that cannot be expanded
    #[error("Interpolation error in [{section}] {option}: {message}")]
    Interpolation {
        section: String,
        option: String,
        message: String,
    },
}

impl ConfigError {
    pub fn invalid_source(name: impl Into<String>, message: impl Into<String>) -> Self {
        ConfigError::InvalidSource {
            name: name.into(),
            message: message.into(),
        }
    }

    pub fn parse(source_name: impl Into<String>, line: usize, message: impl Into<String>) -> Self {
        ConfigError::Parse {
            source_name: source_name.into(),
            line,
            message: message.into(),
        }
    }

    pub fn interpolation(
        section: impl Into<String>,
        option: impl Into<String>,
        message: impl Into<String>,
    ) -> Self {
        ConfigError::Interpolation {
            section: section.into(),
            option: option.into(),
            message: message.into(),
        }
    }
}
