//! Timestamped audit logging with a caller-supplied sink.
//!
//! Every run appends one line per event to a log destination:
//!
//! ```text
//! 2026-08-06 10:15:42 - INFO - Moved report.pdf -> Documents
//! ```
//!
//! The sink is injected rather than being a process-global handle, so the
//! binary opens the real log file once in append mode while tests capture
//! records in an in-memory buffer. Audit writes are best-effort: a failing
//! sink never fails the operation being logged.

use chrono::Local;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::Path;
use std::sync::{Arc, Mutex};

/// Default log file name, created in the working directory.
pub const DEFAULT_LOG_FILE: &str = "sortify.log";

/// Severity of an audit record.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    Info,
    Warning,
    Error,
}

impl Level {
    fn as_str(self) -> &'static str {
        match self {
            Level::Info => "INFO",
            Level::Warning => "WARNING",
            Level::Error => "ERROR",
        }
    }
}

/// An append-only audit log over an arbitrary writer.
pub struct AuditLog {
    sink: Box<dyn Write>,
}

impl AuditLog {
    /// Opens (creating if absent) the given file in append mode.
    pub fn open(path: &Path) -> io::Result<Self> {
        let file = OpenOptions::new().create(true).append(true).open(path)?;
        Ok(Self::with_sink(Box::new(file)))
    }

    /// Wraps any writer as the log destination.
    pub fn with_sink(sink: Box<dyn Write>) -> Self {
        Self { sink }
    }

    /// A log that discards everything.
    pub fn disabled() -> Self {
        Self::with_sink(Box::new(io::sink()))
    }

    pub fn info(&mut self, message: &str) {
        self.record(Level::Info, message);
    }

    pub fn warning(&mut self, message: &str) {
        self.record(Level::Warning, message);
    }

    pub fn error(&mut self, message: &str) {
        self.record(Level::Error, message);
    }

    fn record(&mut self, level: Level, message: &str) {
        let timestamp = Local::now().format("%Y-%m-%d %H:%M:%S");
        // Best-effort: the run must not fail because its log did.
        let _ = writeln!(self.sink, "{} - {} - {}", timestamp, level.as_str(), message);
        let _ = self.sink.flush();
    }
}

/// A cloneable in-memory sink for capturing audit output in tests.
#[derive(Debug, Clone, Default)]
pub struct SharedBuffer {
    inner: Arc<Mutex<Vec<u8>>>,
}

impl SharedBuffer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Everything written so far, lossily decoded.
    pub fn contents(&self) -> String {
        let inner = self.inner.lock().expect("audit buffer poisoned");
        String::from_utf8_lossy(&inner).into_owned()
    }

    /// Audit lines written so far.
    pub fn lines(&self) -> Vec<String> {
        self.contents().lines().map(str::to_string).collect()
    }
}

impl Write for SharedBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        let mut inner = self.inner.lock().expect("audit buffer poisoned");
        inner.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}
