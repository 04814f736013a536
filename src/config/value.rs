//! Typed configuration values and string coercions

use path_clean::PathClean;
use std::fmt;
use std::path::{Path, PathBuf};

const TRUTHY: [&str; 5] = ["yes", "true", "on", "y", "t"];
const FALSY: [&str; 5] = ["no", "false", "off", "n", "f"];

/// Result of a successful lookup
#[derive(Debug, Clone, PartialEq)]
pub enum ConfigValue {
    Text(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    Path(PathBuf),
}

impl ConfigValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn as_i64(&self) -> Option<i64> {
        match self {
            ConfigValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Floats as-is, integers widened
    pub fn as_f64(&self) -> Option<f64> {
        match self {
            ConfigValue::Float(f) => Some(*f),
            ConfigValue::Integer(i) => Some(*i as f64),
            _ => None,
        }
    }

    pub fn as_bool(&self) -> Option<bool> {
        match self {
            ConfigValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    pub fn as_path(&self) -> Option<&Path> {
        match self {
            ConfigValue::Path(p) => Some(p),
            _ => None,
        }
    }

    pub fn into_string(self) -> Option<String> {
        match self {
            ConfigValue::Text(s) => Some(s),
            _ => None,
        }
    }

    pub fn into_path(self) -> Option<PathBuf> {
        match self {
            ConfigValue::Path(p) => Some(p),
            _ => None,
        }
    }
}

impl fmt::Display for ConfigValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ConfigValue::Text(s) => f.write_str(s),
            ConfigValue::Integer(i) => write!(f, "{}", i),
            ConfigValue::Float(x) => write!(f, "{}", x),
            ConfigValue::Boolean(b) => write!(f, "{}", b),
            ConfigValue::Path(p) => write!(f, "{}", p.display()),
        }
    }
}

/// Float when the string contains a `.`, integer otherwise
pub fn parse_digit(value: &str) -> Option<ConfigValue> {
    if value.contains('.') {
        value.parse::<f64>().ok().map(ConfigValue::Float)
    } else {
        value.parse::<i64>().ok().map(ConfigValue::Integer)
    }
}

/// Case-insensitive match against the fixed truthy/falsy words
pub fn parse_boolean(value: &str) -> Option<bool> {
    let lowered = value.to_lowercase();
    if TRUTHY.contains(&lowered.as_str()) {
        Some(true)
    } else if FALSY.contains(&lowered.as_str()) {
        Some(false)
    } else {
        None
    }
}

/// Expand a leading `~`, make the path absolute against the working
/// directory and remove `.`, `..` and repeated separators lexically.
/// Symlinks are not resolved, so the result is a fixed point.
pub fn expand_path(value: &str) -> PathBuf {
    let expanded = expand_home(value);
    let absolute = if expanded.is_absolute() {
        expanded
    } else {
        match std::env::current_dir() {
            Ok(cwd) => cwd.join(expanded),
            Err(_) => expanded,
        }
    };
    absolute.clean()
}

fn expand_home(value: &str) -> PathBuf {
    let rest = match value.strip_prefix('~') {
        Some(rest) if rest.is_empty() || rest.starts_with(std::path::is_separator) => rest,
        _ => return PathBuf::from(value),
    };
    match dirs::home_dir() {
        Some(home) => home.join(rest.trim_start_matches(std::path::is_separator)),
        None => PathBuf::from(value),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_digit() {
        assert_eq!(parse_digit("3"), Some(ConfigValue::Integer(3)));
        assert_eq!(parse_digit("-12"), Some(ConfigValue::Integer(-12)));
        assert_eq!(parse_digit("3.5"), Some(ConfigValue::Float(3.5)));
        assert_eq!(parse_digit(".5"), Some(ConfigValue::Float(0.5)));
        assert_eq!(parse_digit("1.2.3"), None);
        assert_eq!(parse_digit("abc"), None);
        assert_eq!(parse_digit("1e3"), None);
    }

    #[test]
    fn test_parse_boolean() {
        for word in ["yes", "TRUE", "On", "y", "T"] {
            assert_eq!(parse_boolean(word), Some(true), "{}", word);
        }
        for word in ["no", "False", "OFF", "N", "f"] {
            assert_eq!(parse_boolean(word), Some(false), "{}", word);
        }
        for word in ["1", "0", "maybe", ""] {
            assert_eq!(parse_boolean(word), None, "{}", word);
        }
    }

    #[test]
    fn test_expand_path_normalizes() {
        let path = expand_path("/tmp//a/./b/../c");
        assert_eq!(path, PathBuf::from("/tmp/a/c"));

        let relative = expand_path("data/../logs");
        assert!(relative.is_absolute());
        assert!(relative.ends_with("logs"));
    }

    #[test]
    fn test_expand_home() {
        if let Some(home) = dirs::home_dir() {
            assert_eq!(expand_path("~"), home.clean());
            assert_eq!(expand_path("~/notes.txt"), home.join("notes.txt").clean());
        }
        // `~user` forms are left alone and resolved relative to the cwd
        assert!(expand_path("~someone/x").ends_with("~someone/x"));
    }

    #[test]
    fn test_display() {
        assert_eq!(ConfigValue::Float(3.5).to_string(), "3.5");
        assert_eq!(ConfigValue::Boolean(false).to_string(), "false");
    }
}
