//! Caller-supplied stream appender

use crate::core::{Appender, LineFormat, LogEntry, Result};
use parking_lot::Mutex;
use std::io::Write;
use std::sync::Arc;

/// A writer shared between the caller and the registry.
///
/// The registry only holds a clone of the `Arc`; detaching the destination
/// drops that clone and leaves the caller's stream open.
pub type SharedWriter = Arc<Mutex<dyn Write + Send>>;

/// Wrap any writer as a [`SharedWriter`], returning the typed handle too so
/// the caller can keep using it (for instance to read back a `Vec<u8>`).
pub fn shared_writer<W: Write + Send + 'static>(writer: W) -> (Arc<Mutex<W>>, SharedWriter) {
    let typed = Arc::new(Mutex::new(writer));
    let erased: SharedWriter = typed.clone();
    (typed, erased)
}

pub struct StreamAppender {
    stream: SharedWriter,
    format: Arc<LineFormat>,
}

impl StreamAppender {
    pub fn new(stream: SharedWriter, format: Arc<LineFormat>) -> Self {
        Self { stream, format }
    }
}

impl Appender for StreamAppender {
    fn append(&mut self, entry: &LogEntry) -> Result<()> {
        let output = self.format.format(entry);
        let mut stream = self.stream.lock();
        writeln!(stream, "{}", output)?;
        stream.flush()?;
        Ok(())
    }

    fn flush(&mut self) -> Result<()> {
        self.stream.lock().flush()?;
        Ok(())
    }

    fn name(&self) -> &str {
        "stream"
    }
}
