//! File appender implementation

use crate::core::{Appender, LineFormat, LogEntry, LoggerError, Result};
use std::fs::{File, OpenOptions};
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// How an owned log file is opened
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FileMode {
    /// Start from an empty file
    #[default]
    Truncate,
    /// Keep existing content and write after it
    Append,
}

/// Log file opened (and later closed) by the registry itself.
pub struct FileAppender {
    path: PathBuf,
    writer: Option<BufWriter<File>>,
    format: Arc<LineFormat>,
}

impl FileAppender {
    pub fn new(path: impl Into<PathBuf>, mode: FileMode, format: Arc<LineFormat>) -> Result<Self> {
        let path = path.into();
        let mut options = OpenOptions::new();
        options.create(true);
        match mode {
            FileMode::Truncate => options.write(true).truncate(true),
            FileMode::Append => options.append(true),
        };
        let file = options.open(&path).map_err(|e| {
            LoggerError::io_operation(
                "opening log file",
                format!("cannot open '{}'", path.display()),
                e,
            )
        })?;

        Ok(Self {
            path,
            writer: Some(BufWriter::new(file)),
            format,
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn is_open(&self) -> bool {
        self.writer.is_some()
    }
}

impl Appender for FileAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let writer = self.writer.as_mut().ok_or_else(|| {
            LoggerError::file_appender(self.path.display().to_string(), "file already closed")
        })?;

        let mut output = self.format.format(entry);
        output.push('\n');

        writer.write_all(output.as_bytes())?;
        // Each record reaches the file before the logging call returns.
        writer.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        if let Some(ref mut writer) = self.writer {
            writer.flush()?;
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "file"
    }

    fn close(&mut self) -> Result<()> {
        if let Some(mut writer) = self.writer.take() {
            writer.flush()?;
        }
        Ok(())
    }
}

impl Drop for FileAppender {
    fn drop(&mut self) {
        // Ensure all buffered data is flushed to disk
        let _ = self.flush();
    }
}
