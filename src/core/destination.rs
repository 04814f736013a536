//! Output targets a logger can be pointed at

use super::appender::Appender;
use super::line_format::LineFormat;
use crate::appenders::{ConsoleAppender, ConsoleTarget, SharedWriter, StreamAppender};
use std::path::{Path, PathBuf};
use std::sync::Arc;

/// A stream destination. None of these are ever closed by the registry.
#[derive(Clone)]
pub enum LogStream {
    Stderr,
    Stdout,
    Writer(SharedWriter),
}

impl LogStream {
    pub(crate) fn into_appender(self, format: Arc<LineFormat>, colors: bool) -> Box<dyn Appender> {
        match self {
            LogStream::Stderr => {
                Box::new(ConsoleAppender::new(ConsoleTarget::Stderr, format).with_colors(colors))
            }
            LogStream::Stdout => {
                Box::new(ConsoleAppender::new(ConsoleTarget::Stdout, format).with_colors(colors))
            }
            LogStream::Writer(stream) => Box::new(StreamAppender::new(stream, format)),
        }
    }
}

impl std::fmt::Debug for LogStream {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LogStream::Stderr => f.write_str("Stderr"),
            LogStream::Stdout => f.write_str("Stdout"),
            LogStream::Writer(_) => f.write_str("Writer(..)"),
        }
    }
}

impl From<SharedWriter> for LogStream {
    fn from(stream: SharedWriter) -> Self {
        LogStream::Writer(stream)
    }
}

/// Argument of [`Logger::set_log_file`](super::Logger::set_log_file).
///
/// A path is opened by the registry and becomes the label's owned file;
/// a stream is attached as-is and never closed.
#[derive(Debug, Clone)]
pub enum LogFile {
    Path(PathBuf),
    Stream(LogStream),
}

impl From<PathBuf> for LogFile {
    fn from(path: PathBuf) -> Self {
        LogFile::Path(path)
    }
}

impl From<&Path> for LogFile {
    fn from(path: &Path) -> Self {
        LogFile::Path(path.to_path_buf())
    }
}

impl From<&str> for LogFile {
    fn from(path: &str) -> Self {
        LogFile::Path(PathBuf::from(path))
    }
}

impl From<String> for LogFile {
    fn from(path: String) -> Self {
        LogFile::Path(PathBuf::from(path))
    }
}

impl From<LogStream> for LogFile {
    fn from(stream: LogStream) -> Self {
        LogFile::Stream(stream)
    }
}

impl From<SharedWriter> for LogFile {
    fn from(stream: SharedWriter) -> Self {
        LogFile::Stream(LogStream::Writer(stream))
    }
}
