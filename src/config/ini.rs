//! INI parsing
//!
//! Dialect:
//! - `[section]` headers; text after the closing bracket is ignored
//! - `option = value` or `option: value`, split at the first `=` or `:`
//! - lines whose first character is `#` or `;` are comments
//! - ` ;` (semicolon after whitespace) starts an inline comment in a value
//! - an indented line continues the previous value on a new line
//! - a value of exactly `""` is the empty string
//! - `[DEFAULT]` options are visible from every section
//!
//! Names are case-sensitive. A repeated header reopens the section and a
//! repeated option overrides the earlier value.

use super::error::{ConfigError, Result};
use std::collections::HashMap;

pub const DEFAULT_SECTION: &str = "DEFAULT";

/// Nesting limit for `%(name)s` references
pub const MAX_INTERPOLATION_DEPTH: usize = 10;

type Options = HashMap<String, String>;

#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct IniDocument {
    sections: HashMap<String, Options>,
    order: Vec<String>,
    defaults: Options,
}

enum Cursor {
    None,
    Defaults,
    Section(String),
}

impl IniDocument {
    pub fn parse(text: &str, source_name: &str) -> Result<Self> {
        let mut document = IniDocument::default();
        let mut cursor = Cursor::None;
        let mut current_option: Option<String> = None;

        for (idx, raw_line) in text.lines().enumerate() {
            let line_no = idx + 1;
            let trimmed = raw_line.trim();

            if trimmed.is_empty() {
                current_option = None;
                continue;
            }

            let first = raw_line.chars().next().unwrap_or(' ');
            if first == '#' || first == ';' {
                continue;
            }

            if first.is_whitespace() {
                if let (Some(option), Some(options)) =
                    (current_option.as_ref(), document.options_at(&cursor))
                {
                    if let Some(value) = options.get_mut(option) {
                        value.push('\n');
                        value.push_str(trimmed);
                    }
                    continue;
                }
                if trimmed.starts_with('#') || trimmed.starts_with(';') {
                    continue;
                }
            }

            if let Some(header) = trimmed.strip_prefix('[') {
                let name = header
                    .find(']')
                    .map(|end| header[..end].trim())
                    .ok_or_else(|| ConfigError::parse(source_name, line_no, "unterminated section header"))?;
                if name.is_empty() {
                    return Err(ConfigError::parse(source_name, line_no, "empty section name"));
                }
                cursor = if name == DEFAULT_SECTION {
                    Cursor::Defaults
                } else {
                    if !document.sections.contains_key(name) {
                        document.order.push(name.to_string());
                        document.sections.insert(name.to_string(), Options::new());
                    }
                    Cursor::Section(name.to_string())
                };
                current_option = None;
                continue;
            }

            let (key, value) = split_option(trimmed)
                .ok_or_else(|| ConfigError::parse(source_name, line_no, format!("expected 'option = value', got '{}'", trimmed)))?;
            let options = document.options_at(&cursor).ok_or_else(|| {
                ConfigError::parse(source_name, line_no, "option line outside of any section")
            })?;
            options.insert(key.to_string(), value);
            current_option = Some(key.to_string());
        }

        Ok(document)
    }

    fn options_at(&mut self, cursor: &Cursor) -> Option<&mut Options> {
        match cursor {
            Cursor::None => None,
            Cursor::Defaults => Some(&mut self.defaults),
            Cursor::Section(name) => self.sections.get_mut(name),
        }
    }

    /// `DEFAULT` is not reported as a section
    pub fn has_section(&self, section: &str) -> bool {
        self.sections.contains_key(section)
    }

    pub fn has_option(&self, section: &str, option: &str) -> bool {
        self.get(section, option).is_some()
    }

    /// Section names in order of first appearance
    pub fn sections(&self) -> impl Iterator<Item = &str> {
        self.order.iter().map(String::as_str)
    }

    /// Option names of a section, including inherited defaults, sorted
    pub fn options(&self, section: &str) -> Option<Vec<&str>> {
        let options = self.sections.get(section)?;
        let mut names: Vec<&str> = options
            .keys()
            .chain(self.defaults.keys().filter(|k| !options.contains_key(*k)))
            .map(String::as_str)
            .collect();
        names.sort_unstable();
        Some(names)
    }

    /// Raw value of an option, falling back to `DEFAULT`
    pub fn get(&self, section: &str, option: &str) -> Option<&str> {
        let options = self.sections.get(section)?;
        options
            .get(option)
            .or_else(|| self.defaults.get(option))
            .map(String::as_str)
    }

    /// Value with `%(name)s` references expanded against the same section
    /// and `DEFAULT`. `%%` yields a literal `%`.
    pub fn get_interpolated(&self, section: &str, option: &str) -> Result<Option<String>> {
        let Some(raw) = self.get(section, option) else {
            return Ok(None);
        };
        let mut out = String::with_capacity(raw.len());
        self.interpolate_into(section, option, raw, 1, &mut out)?;
        Ok(Some(out))
    }

    fn interpolate_into(
        &self,
        section: &str,
        option: &str,
        raw: &str,
        depth: usize,
        out: &mut String,
    ) -> Result<()> {
        if depth > MAX_INTERPOLATION_DEPTH {
            return Err(ConfigError::interpolation(
                section,
                option,
                format!("references nested deeper than {}", MAX_INTERPOLATION_DEPTH),
            ));
        }

        let mut rest = raw;
        while let Some(pos) = rest.find('%') {
            out.push_str(&rest[..pos]);
            rest = &rest[pos + 1..];

            if let Some(after) = rest.strip_prefix('%') {
                out.push('%');
                rest = after;
                continue;
            }

            let reference = rest
                .strip_prefix('(')
                .and_then(|body| body.find(")s").map(|end| (&body[..end], &body[end + 2..])));
            let Some((name, after)) = reference else {
                return Err(ConfigError::interpolation(
                    section,
                    option,
                    format!("'%' must be followed by '%' or '(name)s' in '{}'", raw),
                ));
            };

            let value = self.get(section, name).ok_or_else(|| {
                ConfigError::interpolation(
                    section,
                    option,
                    format!("bad interpolation variable reference '%({})s'", name),
                )
            })?;
            self.interpolate_into(section, option, value, depth + 1, out)?;
            rest = after;
        }
        out.push_str(rest);
        Ok(())
    }
}

fn split_option(line: &str) -> Option<(&str, String)> {
    let pos = line.find(['=', ':'])?;
    let key = line[..pos].trim_end();
    if key.is_empty() {
        return None;
    }

    let raw = &line[pos + 1..];
    let comment = raw
        .char_indices()
        .find(|&(i, c)| c == ';' && i > 0 && raw[..i].ends_with(char::is_whitespace))
        .map_or(raw.len(), |(i, _)| i);

    let value = raw[..comment].trim();
    if value == "\"\"" {
        return Some((key, String::new()));
    }
    Some((key, value.to_string()))
}
