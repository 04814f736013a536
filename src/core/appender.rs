//! Appender trait for log output destinations

use super::{error::Result, log_entry::LogEntry};

pub trait Appender: Send {
    fn append(&mut self, entry: &LogEntry) -> Result<()>;
    fn flush(&mut self) -> Result<()>;
    fn name(&self) -> &str;

    /// Release resources the appender owns. Appenders writing to a stream
    /// they did not open only flush here.
    fn close(&mut self) -> Result<()> {
        self.flush()
    }
}
