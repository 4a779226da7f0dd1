//! Output seam for diagnostics.
//!
//! All user-facing diagnostic lines go through a [`DiagnosticSink`]. Production code
//! uses [`StdSink`]; tests install a [`MemorySink`] and inspect what was written.

use std::io::{self, Write};
use std::sync::Mutex;

/// Standard stream a line is destined for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Stream {
    /// Standard output.
    Stdout,
    /// Standard error.
    Stderr,
}

/// Destination for rendered diagnostic lines.
pub trait DiagnosticSink: Send + Sync {
    /// Writes one line (without trailing newline) to `stream`.
    fn write_line(&self, stream: Stream, line: &str);
}

/// Writes to the process's standard streams.
#[derive(Debug, Clone, Copy, Default)]
pub struct StdSink;

impl DiagnosticSink for StdSink {
    fn write_line(&self, stream: Stream, line: &str) {
        // A diagnostic that cannot be printed has nowhere else to go.
        let _ = match stream {
            Stream::Stdout => writeln!(io::stdout().lock(), "{line}"),
            Stream::Stderr => writeln!(io::stderr().lock(), "{line}"),
        };
    }
}

/// Collects lines in memory.
#[derive(Debug, Default)]
pub struct MemorySink {
    lines: Mutex<Vec<(Stream, String)>>,
}

impl MemorySink {
    /// Creates an empty sink.
    pub fn new() -> Self {
        Self::default()
    }

    /// Every line written so far, in order.
    pub fn lines(&self) -> Vec<(Stream, String)> {
        self.guard().clone()
    }

    /// Lines written to `stream`, in order.
    pub fn lines_on(&self, stream: Stream) -> Vec<String> {
        self.guard()
            .iter()
            .filter(|(s, _)| *s == stream)
            .map(|(_, line)| line.clone())
            .collect()
    }

    /// True if nothing has been written.
    pub fn is_empty(&self) -> bool {
        self.guard().is_empty()
    }

    /// Discards all collected lines.
    pub fn clear(&self) {
        self.guard().clear();
    }

    fn guard(&self) -> std::sync::MutexGuard<'_, Vec<(Stream, String)>> {
        // Poisoning only means a writer panicked mid-push; the vector is still valid.
        self.lines.lock().unwrap_or_else(std::sync::PoisonError::into_inner)
    }
}

impl DiagnosticSink for MemorySink {
    fn write_line(&self, stream: Stream, line: &str) {
        self.guard().push((stream, line.to_owned()));
    }
}
