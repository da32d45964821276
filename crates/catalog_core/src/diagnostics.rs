//! Validation diagnostic sinks.
//!
//! # Responsibility
//! - Persist the per-field violation lines produced by a failed save.
//!
//! # Invariants
//! - `UnitOfWork::save` records diagnostics before it returns the
//!   validation error; a sink failure is logged, never swallowed silently,
//!   and never replaces the validation error.

use log::warn;
use std::fs::OpenOptions;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

/// Destination for validation diagnostic lines.
pub trait DiagnosticSink {
    fn record(&self, lines: &[String]) -> io::Result<()>;
}

/// Default sink: emits each line as a `warn` log record.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogDiagnosticSink;

impl DiagnosticSink for LogDiagnosticSink {
    fn record(&self, lines: &[String]) -> io::Result<()> {
        for line in lines {
            warn!("event=validation_diagnostic module=diagnostics line={line}");
        }
        Ok(())
    }
}

/// Appends lines to a text file, creating it and its parent directory on
/// first use.
#[derive(Debug, Clone)]
pub struct FileDiagnosticSink {
    path: PathBuf,
}

impl FileDiagnosticSink {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl DiagnosticSink for FileDiagnosticSink {
    fn record(&self, lines: &[String]) -> io::Result<()> {
        if let Some(parent) = self.path.parent().filter(|dir| !dir.as_os_str().is_empty()) {
            std::fs::create_dir_all(parent)?;
        }
        let mut file = OpenOptions::new()
            .create(true)
            .append(true)
            .open(&self.path)?;
        for line in lines {
            writeln!(file, "{line}")?;
        }
        file.flush()
    }
}

/// Keeps lines in memory; clones share one buffer.
#[derive(Debug, Clone, Default)]
pub struct MemoryDiagnosticSink {
    lines: Arc<Mutex<Vec<String>>>,
}

impl MemoryDiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every recorded line.
    pub fn lines(&self) -> Vec<String> {
        match self.lines.lock() {
            Ok(lines) => lines.clone(),
            Err(poisoned) => poisoned.into_inner().clone(),
        }
    }
}

impl DiagnosticSink for MemoryDiagnosticSink {
    fn record(&self, lines: &[String]) -> io::Result<()> {
        let mut buffer = self
            .lines
            .lock()
            .map_err(|_| io::Error::other("diagnostic buffer poisoned"))?;
        buffer.extend(lines.iter().cloned());
        Ok(())
    }
}
