//! Label-keyed registry of log destinations
//!
//! Every [`Logger`] handle created with the same label on the same registry
//! writes to the same destination list. Each label may own at most one log
//! file opened by path; that file is closed by the registry when the label
//! is closed or its log file is replaced. Caller-supplied streams are only
//! ever detached.
//!
//! The registry is an explicit object rather than process-global state, so
//! independent registries never see each other's labels. Clones share state.
//! Each label has its own lock, held while a record is written to the
//! label's destinations. A slow destination therefore only delays loggers
//! sharing its label. Interleaved `set_log_file`/`close` calls on one label
//! from several threads are serialized by that lock but their order is up
//! to the caller: the last replacement of the owned file wins.

use super::{
    appender::Appender,
    destination::{LogFile, LogStream},
    error::{LoggerError, Result},
    line_format::LineFormat,
    log_entry::LogEntry,
    log_level::LogLevel,
    logger::{Logger, LoggerBuilder},
};
use crate::appenders::{FileAppender, FileMode};
use parking_lot::Mutex;
use std::collections::HashMap;
use std::path::PathBuf;
use std::sync::Arc;

struct Destination {
    id: u64,
    level: LogLevel,
    appender: Box<dyn Appender>,
}

struct OwnedFile {
    id: u64,
    path: PathBuf,
}

#[derive(Default)]
struct LabelState {
    destinations: Vec<Destination>,
    owned_file: Option<OwnedFile>,
}

impl LabelState {
    fn attach(&mut self, id: u64, appender: Box<dyn Appender>, level: LogLevel) {
        self.destinations.push(Destination {
            id,
            level,
            appender,
        });
    }

    /// Detach and close the owned file, if any
    fn release_owned_file(&mut self, label: &str) {
        let Some(owned) = self.owned_file.take() else {
            return;
        };
        if let Some(pos) = self.destinations.iter().position(|d| d.id == owned.id) {
            let mut destination = self.destinations.remove(pos);
            if let Err(e) = destination.appender.close() {
                eprintln!(
                    "[LogRegistry] Failed to close log file '{}' of '{}': {}",
                    owned.path.display(),
                    label,
                    e
                );
            }
        }
    }
}

type SharedLabel = Arc<Mutex<LabelState>>;

#[derive(Default)]
struct RegistryState {
    labels: HashMap<String, SharedLabel>,
    next_id: u64,
}

#[derive(Clone, Default)]
pub struct LogRegistry {
    state: Arc<Mutex<RegistryState>>,
}

impl LogRegistry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Start building a logger handle for `label`
    ///
    /// # Example
    /// ```
    /// use labelled_config::prelude::*;
    ///
    /// let registry = LogRegistry::new();
    /// let logger = registry
    ///     .builder("worker")
    ///     .verbose(false)
    ///     .no_stream()
    ///     .build()
    ///     .unwrap();
    /// logger.warning("queue is getting long");
    /// ```
    #[must_use]
    pub fn builder(&self, label: impl Into<String>) -> LoggerBuilder {
        LoggerBuilder::new(self.clone(), label)
    }

    /// Handle for `label` with all defaults: verbose, default line format,
    /// stderr as the initial destination.
    #[must_use]
    pub fn logger(&self, label: impl Into<String>) -> Logger {
        LoggerBuilder::new(self.clone(), label).finish(LineFormat::default().shared())
    }

    pub fn is_registered(&self, label: &str) -> bool {
        self.state.lock().labels.contains_key(label)
    }

    /// Labels currently registered, sorted
    pub fn labels(&self) -> Vec<String> {
        let mut labels: Vec<String> = self.state.lock().labels.keys().cloned().collect();
        labels.sort();
        labels
    }

    pub fn destination_count(&self, label: &str) -> usize {
        self.label_state(label)
            .map_or(0, |state| state.lock().destinations.len())
    }

    /// Path of the log file the label owns, if any
    pub fn owned_file(&self, label: &str) -> Option<PathBuf> {
        self.label_state(label).and_then(|state| {
            state
                .lock()
                .owned_file
                .as_ref()
                .map(|owned| owned.path.clone())
        })
    }

    fn label_state(&self, label: &str) -> Option<SharedLabel> {
        self.state.lock().labels.get(label).cloned()
    }

    /// Fresh destination id plus the label's state, registering it if needed.
    /// The registry lock is released before the label is locked.
    fn reserve(&self, label: &str) -> (u64, SharedLabel) {
        let mut state = self.state.lock();
        state.next_id += 1;
        let id = state.next_id;
        let label_state = Arc::clone(state.labels.entry(label.to_string()).or_default());
        (id, label_state)
    }

    /// Register `label`, returning `false` if it was already registered
    pub(crate) fn register(&self, label: &str) -> bool {
        let mut state = self.state.lock();
        if state.labels.contains_key(label) {
            return false;
        }
        state.labels.insert(label.to_string(), SharedLabel::default());
        true
    }

    pub(crate) fn attach(&self, label: &str, appender: Box<dyn Appender>, level: LogLevel) {
        let (id, label_state) = self.reserve(label);
        label_state.lock().attach(id, appender, level);
    }

    pub(crate) fn set_log_file(
        &self,
        label: &str,
        target: LogFile,
        mode: FileMode,
        level: LogLevel,
        format: Arc<LineFormat>,
        colors: bool,
    ) -> bool {
        let path = match target {
            LogFile::Stream(stream) => {
                let (id, label_state) = self.reserve(label);
                let mut label_state = label_state.lock();
                label_state.release_owned_file(label);
                label_state.attach(id, stream.into_appender(format, colors), level);
                return true;
            }
            LogFile::Path(path) => path,
        };

        // The new file is opened before the old one is released, so a failed
        // open leaves the label's destinations untouched.
        let appender = match FileAppender::new(&path, mode, format) {
            Ok(appender) => appender,
            Err(e) => {
                eprintln!(
                    "[LogRegistry] Could not open '{}' for logging: {}",
                    path.display(),
                    e
                );
                return false;
            }
        };

        let (id, label_state) = self.reserve(label);
        let mut label_state = label_state.lock();
        label_state.release_owned_file(label);
        label_state.attach(id, Box::new(appender), level);
        label_state.owned_file = Some(OwnedFile { id, path });
        true
    }

    pub(crate) fn set_level(&self, label: &str, level: LogLevel) {
        if let Some(label_state) = self.label_state(label) {
            for destination in &mut label_state.lock().destinations {
                destination.level = level;
            }
        }
    }

    /// Deliver an entry to every destination of its label whose threshold
    /// it meets. Returns the number of destinations that accepted it.
    ///
    /// **Per-Destination Isolation**: a destination that errors or panics is
    /// reported on stderr and the remaining destinations still receive the
    /// entry.
    pub(crate) fn dispatch(&self, entry: &LogEntry) -> usize {
        let Some(label_state) = self.label_state(&entry.label) else {
            return 0;
        };
        let mut label_state = label_state.lock();

        let mut delivered = 0;
        for (idx, destination) in label_state.destinations.iter_mut().enumerate() {
            if entry.level < destination.level {
                continue;
            }

            let append_result = std::panic::catch_unwind(std::panic::AssertUnwindSafe(|| {
                destination.appender.append(entry)
            }));

            match append_result {
                Ok(Ok(())) => delivered += 1,
                Ok(Err(e)) => {
                    eprintln!(
                        "[LogRegistry] Destination #{} ({}) of '{}' failed: {}",
                        idx,
                        destination.appender.name(),
                        entry.label,
                        e
                    );
                }
                Err(panic_info) => {
                    let panic_msg = if let Some(s) = panic_info.downcast_ref::<&str>() {
                        s.to_string()
                    } else if let Some(s) = panic_info.downcast_ref::<String>() {
                        s.clone()
                    } else {
                        "Unknown panic".to_string()
                    };
                    eprintln!(
                        "[LogRegistry] Destination #{} ({}) of '{}' panicked: {}. \
                         Other destinations continue to function.",
                        idx,
                        destination.appender.name(),
                        entry.label,
                        panic_msg
                    );
                }
            }
        }
        delivered
    }

    pub(crate) fn flush(&self, label: &str) -> Result<()> {
        let Some(label_state) = self.label_state(label) else {
            return Ok(());
        };
        let mut first_error: Option<LoggerError> = None;
        for destination in &mut label_state.lock().destinations {
            if let Err(e) = destination.appender.flush() {
                first_error.get_or_insert(e);
            }
        }
        first_error.map_or(Ok(()), Err)
    }

    /// Detach every destination of `label` and close its owned file.
    /// Closing an unknown or already closed label does nothing.
    pub(crate) fn close(&self, label: &str) {
        let Some(label_state) = self.state.lock().labels.remove(label) else {
            return;
        };
        // Writers that looked the label up before removal find it empty.
        let mut label_state = label_state.lock();
        label_state.release_owned_file(label);
        for mut destination in label_state.destinations.drain(..) {
            let _ = destination.appender.flush();
        }
    }
}

impl std::fmt::Debug for LogRegistry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LogRegistry")
            .field("labels", &self.labels())
            .finish()
    }
}

/// Attach `stream` as the first destination of a newly registered label.
pub(crate) fn attach_initial_stream(
    registry: &LogRegistry,
    label: &str,
    stream: Option<LogStream>,
    verbose: bool,
    format: Arc<LineFormat>,
    colors: bool,
) {
    if !registry.register(label) {
        return;
    }
    if let Some(stream) = stream {
        let level = if verbose {
            LogLevel::Info
        } else {
            LogLevel::Warning
        };
        registry.attach(label, stream.into_appender(format, colors), level);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::appenders::shared_writer;

    fn buffer_logger(registry: &LogRegistry, label: &str) -> (Arc<Mutex<Vec<u8>>>, Logger) {
        let (buffer, stream) = shared_writer(Vec::<u8>::new());
        let logger = registry
            .builder(label)
            .stream(LogStream::Writer(stream))
            .build()
            .expect("default formats are valid");
        (buffer, logger)
    }

    fn text(buffer: &Arc<Mutex<Vec<u8>>>) -> String {
        String::from_utf8(buffer.lock().clone()).expect("utf8 log output")
    }

    #[test]
    fn test_same_label_shares_destinations() {
        let registry = LogRegistry::new();
        let (buffer, first) = buffer_logger(&registry, "shared");
        let (unused, second) = buffer_logger(&registry, "shared");

        second.info("from second");
        first.info("from first");

        assert_eq!(registry.destination_count("shared"), 1);
        assert!(text(&unused).is_empty());
        let output = text(&buffer);
        assert!(output.contains("[shared] from second"));
        assert!(output.contains("[shared] from first"));
    }

    #[test]
    fn test_registries_are_isolated() {
        let a = LogRegistry::new();
        let b = LogRegistry::new();
        let (buffer_a, _la) = buffer_logger(&a, "x");
        let (buffer_b, lb) = buffer_logger(&b, "x");

        lb.warning("only b");
        assert!(text(&buffer_a).is_empty());
        assert!(text(&buffer_b).contains("only b"));
    }

    #[test]
    fn test_verbose_threshold() {
        let registry = LogRegistry::new();
        let (buffer, stream) = shared_writer(Vec::<u8>::new());
        let logger = registry
            .builder("quiet")
            .verbose(false)
            .stream(LogStream::Writer(stream))
            .build()
            .unwrap();

        logger.info("hidden");
        logger.warning("shown");
        let output = text(&buffer);
        assert!(!output.contains("hidden"));
        assert!(output.contains("WARNING: [quiet] shown"));
    }

    #[test]
    fn test_close_unknown_label_is_noop() {
        let registry = LogRegistry::new();
        registry.close("never-registered");
        assert!(registry.labels().is_empty());
    }

    #[test]
    fn test_failing_destination_is_isolated() {
        struct Broken;
        impl Appender for Broken {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                Err(LoggerError::writer("always fails"))
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "broken"
            }
        }

        let registry = LogRegistry::new();
        let (buffer, logger) = buffer_logger(&registry, "iso");
        registry.attach("iso", Box::new(Broken), LogLevel::Debug);
        registry.attach("iso", Box::new(Broken), LogLevel::Debug);

        let entry = LogEntry::new(LogLevel::Error, "iso", "still delivered".to_string());
        assert_eq!(registry.dispatch(&entry), 1);
        drop(logger);
        assert!(text(&buffer).contains("still delivered"));
    }

    #[test]
    fn test_slow_label_does_not_block_other_labels() {
        use std::sync::mpsc;

        struct Gate {
            entered: mpsc::Sender<()>,
            release: mpsc::Receiver<()>,
        }
        impl Appender for Gate {
            fn append(&mut self, _entry: &LogEntry) -> Result<()> {
                let _ = self.entered.send(());
                let _ = self.release.recv();
                Ok(())
            }
            fn flush(&mut self) -> Result<()> {
                Ok(())
            }
            fn name(&self) -> &str {
                "gate"
            }
        }

        let registry = LogRegistry::new();
        let (entered_tx, entered_rx) = mpsc::channel();
        let (release_tx, release_rx) = mpsc::channel();
        let slow = registry.builder("slow").no_stream().build().unwrap();
        registry.attach(
            "slow",
            Box::new(Gate {
                entered: entered_tx,
                release: release_rx,
            }),
            LogLevel::Info,
        );
        let (buffer, fast) = buffer_logger(&registry, "fast");

        let writer = std::thread::spawn(move || slow.info("stuck in a slow destination"));
        entered_rx.recv().unwrap();

        fast.info("not blocked");
        assert!(text(&buffer).contains("[fast] not blocked"));

        release_tx.send(()).unwrap();
        writer.join().unwrap();
    }
}
