//! Line layout for log entries
//!
//! A message template uses printf-style named placeholders:
//!
//! - `%(asctime)s`: timestamp rendered with the [`TimestampFormat`]
//! - `%(levelname)s`: severity name (`WARNING`)
//! - `%(levelno)d`: numeric severity (`30`)
//! - `%(name)s`: logger label
//! - `%(message)s`: message body
//! - `%%`: literal percent sign
//!
//! The default template renders `2025-01-08 10:30:45 INFO: [label] message`.

use super::error::{LoggerError, Result};
use super::log_entry::LogEntry;
use super::timestamp::TimestampFormat;
use std::sync::Arc;

pub const DEFAULT_MESSAGE_FORMAT: &str = "%(asctime)s %(levelname)s: [%(name)s] %(message)s";

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Field {
    AscTime,
    LevelName,
    LevelNo,
    Name,
    Message,
}

impl Field {
    fn from_key(key: &str) -> Option<Self> {
        match key {
            "asctime" => Some(Field::AscTime),
            "levelname" => Some(Field::LevelName),
            "levelno" => Some(Field::LevelNo),
            "name" => Some(Field::Name),
            "message" => Some(Field::Message),
            _ => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum Segment {
    Literal(String),
    Field(Field),
}

/// Parsed message template
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageFormat {
    segments: Vec<Segment>,
}

impl MessageFormat {
    /// Parse a template, failing on unknown placeholders or stray `%`
    pub fn parse(template: &str) -> Result<Self> {
        let malformed =
            |message: String| LoggerError::config("MessageFormat", format!("{} in '{}'", message, template));

        let mut segments = Vec::new();
        let mut literal = String::new();
        let mut rest = template;

        while let Some(pos) = rest.find('%') {
            literal.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];

            if let Some(after) = rest.strip_prefix('%') {
                literal.push('%');
                rest = after;
                continue;
            }

            let body = rest
                .strip_prefix('(')
                .ok_or_else(|| malformed(format!("'%' at offset {} is not followed by '(' or '%'", pos)))?;
            let close = body
                .find(')')
                .ok_or_else(|| malformed("unterminated placeholder".to_string()))?;
            let key = &body[..close];
            let field = Field::from_key(key)
                .ok_or_else(|| malformed(format!("unknown placeholder '{}'", key)))?;

            let mut conversion = body[close + 1..].chars();
            match (conversion.next(), field) {
                (Some('s'), _) | (Some('d'), Field::LevelNo) => {}
                (Some(other), _) => {
                    return Err(malformed(format!(
                        "unsupported conversion '{}' for '{}'",
                        other, key
                    )))
                }
                (None, _) => return Err(malformed(format!("missing conversion for '{}'", key))),
            }
            rest = conversion.as_str();

            if !literal.is_empty() {
                segments.push(Segment::Literal(std::mem::take(&mut literal)));
            }
            segments.push(Segment::Field(field));
        }

        literal.push_str(rest);
        if !literal.is_empty() {
            segments.push(Segment::Literal(literal));
        }

        Ok(Self { segments })
    }

    fn render(&self, entry: &LogEntry, timestamp_format: &TimestampFormat) -> String {
        let mut out = String::with_capacity(64 + entry.message.len());
        for segment in &self.segments {
            match segment {
                Segment::Literal(text) => out.push_str(text),
                Segment::Field(Field::AscTime) => {
                    out.push_str(&timestamp_format.format(&entry.timestamp))
                }
                Segment::Field(Field::LevelName) => out.push_str(entry.level.to_str()),
                Segment::Field(Field::LevelNo) => out.push_str(&entry.level.as_u8().to_string()),
                Segment::Field(Field::Name) => out.push_str(&entry.label),
                Segment::Field(Field::Message) => out.push_str(&entry.message),
            }
        }
        out
    }
}

impl Default for MessageFormat {
    fn default() -> Self {
        // The default template is a constant known to parse.
        Self {
            segments: vec![
                Segment::Field(Field::AscTime),
                Segment::Literal(" ".to_string()),
                Segment::Field(Field::LevelName),
                Segment::Literal(": [".to_string()),
                Segment::Field(Field::Name),
                Segment::Literal("] ".to_string()),
                Segment::Field(Field::Message),
            ],
        }
    }
}

/// Message template plus timestamp format, shared by the destinations a
/// logger handle attaches.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct LineFormat {
    pub message_format: MessageFormat,
    pub timestamp_format: TimestampFormat,
}

impl LineFormat {
    /// Build from optional template strings, validating both
    pub fn from_templates(message_format: Option<&str>, date_format: Option<&str>) -> Result<Self> {
        let message_format = match message_format {
            Some(template) => MessageFormat::parse(template)?,
            None => MessageFormat::default(),
        };
        let timestamp_format = match date_format {
            Some(format_str) => TimestampFormat::custom(format_str)?,
            None => TimestampFormat::default(),
        };
        Ok(Self {
            message_format,
            timestamp_format,
        })
    }

    /// Render an entry without a trailing newline
    pub fn format(&self, entry: &LogEntry) -> String {
        let mut line = self.message_format.render(entry, &self.timestamp_format);
        if let Some(ref context) = entry.error_context {
            line.push('\n');
            line.push_str(context);
        }
        line
    }

    /// Wrap this format in an Arc for sharing across appenders
    #[must_use]
    pub fn shared(self) -> Arc<Self> {
        Arc::new(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::LogLevel;
    use chrono::{Local, TimeZone};

    fn fixed_entry(level: LogLevel, message: &str) -> LogEntry {
        let mut entry = LogEntry::new(level, "l1", message.to_string());
        entry.timestamp = Local
            .with_ymd_and_hms(2025, 1, 8, 10, 30, 45)
            .single()
            .expect("valid datetime");
        entry
    }

    #[test]
    fn test_default_layout() {
        let format = LineFormat::default();
        let line = format.format(&fixed_entry(LogLevel::Warning, "disk low"));
        assert_eq!(line, "2025-01-08 10:30:45 WARNING: [l1] disk low");
    }

    #[test]
    fn test_default_matches_parsed_template() {
        let parsed = MessageFormat::parse(DEFAULT_MESSAGE_FORMAT).expect("default parses");
        assert_eq!(parsed, MessageFormat::default());
    }

    #[test]
    fn test_custom_template() {
        let format = LineFormat::from_templates(Some("%(levelno)d|%(name)s|%(message)s 100%%"), Some("%H:%M"))
            .expect("valid templates");
        let line = format.format(&fixed_entry(LogLevel::Error, "x"));
        assert_eq!(line, "40|l1|x 100%");
    }

    #[test]
    fn test_malformed_templates() {
        for template in ["%(asctime", "%(bogus)s", "%(name)", "%(name)d", "50% done"] {
            let err = MessageFormat::parse(template).unwrap_err();
            assert!(
                matches!(err, LoggerError::InvalidConfiguration { .. }),
                "template {:?} should be rejected",
                template
            );
        }
    }

    #[test]
    fn test_error_context_follows_line() {
        let mut entry = fixed_entry(LogLevel::Error, "failed");
        entry.error_context = Some("Error: boom".to_string());
        let line = LineFormat::default().format(&entry);
        assert_eq!(line, "2025-01-08 10:30:45 ERROR: [l1] failed\nError: boom");
    }
}
