//! INI configuration reader

pub mod error;
pub mod ini;
pub mod reader;
pub mod value;

pub use error::ConfigError;
pub use ini::{IniDocument, DEFAULT_SECTION, MAX_INTERPOLATION_DEPTH};
pub use reader::{
    Coercion, ConfigReader, ConfigReaderBuilder, ConfigSource, GetOptions, DEFAULT_READER_LABEL,
};
pub use value::{expand_path, parse_boolean, parse_digit, ConfigValue};
