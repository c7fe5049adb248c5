//! Diagnostic reporting for graph construction and analysis.
//!
//! Components that want to report something (a payload that was resolved, a fallthrough
//! edge that was dropped) receive a [`DiagnosticSink`] explicitly instead of reaching for a
//! global logger. The crate ships three sinks:
//!
//! - [`LogSink`] - Forwards to the [`log`] facade, the default for [`GraphBuilder`](crate::analysis::GraphBuilder)
//! - [`NullSink`] - Discards everything
//! - [`CollectingSink`] - Keeps every diagnostic in memory for later inspection
//!
//! # Example
//!
//! ```rust
//! use dexscope::diagnostics::{CollectingSink, Diagnostic, DiagnosticSink, Severity};
//!
//! let sink = CollectingSink::new();
//! sink.report(Diagnostic::new(Severity::Warning, "payload reached by fallthrough").at(0x10));
//!
//! assert_eq!(sink.len(), 1);
//! assert_eq!(sink.diagnostics()[0].address, Some(0x10));
//! ```

use std::{fmt, sync::Mutex};

/// Severity of a reported [`Diagnostic`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    /// Detailed progress information.
    Debug,
    /// Noteworthy but expected events.
    Info,
    /// Unusual input that was handled, but may indicate obfuscation or a decoder problem.
    Warning,
}

impl Severity {
    fn level(self) -> log::Level {
        match self {
            Severity::Debug => log::Level::Debug,
            Severity::Info => log::Level::Info,
            Severity::Warning => log::Level::Warn,
        }
    }
}

/// A single diagnostic message.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Diagnostic {
    /// How important the message is.
    pub severity: Severity,
    /// Code-unit address of the instruction the message refers to, if any.
    pub address: Option<u32>,
    /// Human readable description.
    pub message: String,
}

impl Diagnostic {
    /// Creates a diagnostic that is not tied to an instruction.
    #[must_use]
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Diagnostic {
            severity,
            address: None,
            message: message.into(),
        }
    }

    /// Attaches the code-unit address of the instruction this diagnostic refers to.
    #[must_use]
    pub fn at(mut self, address: u32) -> Self {
        self.address = Some(address);
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.address {
            Some(address) => write!(f, "[{address:#06x}] {}", self.message),
            None => f.write_str(&self.message),
        }
    }
}

/// Receiver for diagnostics produced during analysis.
///
/// Sinks take `&self` so that a single sink can be shared by several builders.
/// Implementations that store diagnostics need interior mutability.
pub trait DiagnosticSink {
    /// Records a diagnostic.
    fn report(&self, diagnostic: Diagnostic);
}

/// Sink forwarding every diagnostic to the [`log`] facade.
///
/// Output then depends on whichever logger the host application installed
/// (for example `env_logger`). Without a logger the messages are dropped.
#[derive(Debug, Default, Clone, Copy)]
pub struct LogSink;

impl DiagnosticSink for LogSink {
    fn report(&self, diagnostic: Diagnostic) {
        log::log!(diagnostic.severity.level(), "{diagnostic}");
    }
}

/// Sink discarding every diagnostic.
#[derive(Debug, Default, Clone, Copy)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn report(&self, _diagnostic: Diagnostic) {}
}

/// Sink collecting diagnostics in memory.
#[derive(Debug, Default)]
pub struct CollectingSink {
    entries: Mutex<Vec<Diagnostic>>,
}

impl CollectingSink {
    /// Creates an empty collecting sink.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns a snapshot of every diagnostic reported so far, in reporting order.
    #[must_use]
    pub fn diagnostics(&self) -> Vec<Diagnostic> {
        lock!(self.entries).clone()
    }

    /// Returns all diagnostics of at least the given severity.
    #[must_use]
    pub fn at_least(&self, severity: Severity) -> Vec<Diagnostic> {
        lock!(self.entries)
            .iter()
            .filter(|d| d.severity >= severity)
            .cloned()
            .collect()
    }

    /// Number of diagnostics reported so far.
    #[must_use]
    pub fn len(&self) -> usize {
        lock!(self.entries).len()
    }

    /// Returns `true` if nothing has been reported.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        lock!(self.entries).is_empty()
    }

    /// Removes and returns all collected diagnostics.
    pub fn take(&self) -> Vec<Diagnostic> {
        std::mem::take(&mut *lock!(self.entries))
    }
}

impl DiagnosticSink for CollectingSink {
    fn report(&self, diagnostic: Diagnostic) {
        lock!(self.entries).push(diagnostic);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_collecting_sink_preserves_order() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::new(Severity::Debug, "first"));
        sink.report(Diagnostic::new(Severity::Warning, "second").at(4));

        let entries = sink.diagnostics();
        assert_eq!(entries.len(), 2);
        assert_eq!(entries[0].message, "first");
        assert_eq!(entries[1].address, Some(4));
    }

    #[test]
    fn test_collecting_sink_filters_by_severity() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::new(Severity::Debug, "noise"));
        sink.report(Diagnostic::new(Severity::Info, "info"));
        sink.report(Diagnostic::new(Severity::Warning, "warn"));

        let important = sink.at_least(Severity::Info);
        assert_eq!(important.len(), 2);
        assert!(important.iter().all(|d| d.severity != Severity::Debug));
    }

    #[test]
    fn test_collecting_sink_take_drains() {
        let sink = CollectingSink::new();
        sink.report(Diagnostic::new(Severity::Info, "x"));

        assert_eq!(sink.take().len(), 1);
        assert!(sink.is_empty());
    }

    #[test]
    fn test_null_and_log_sinks_accept_reports() {
        NullSink.report(Diagnostic::new(Severity::Warning, "dropped"));
        LogSink.report(Diagnostic::new(Severity::Warning, "logged").at(2));
    }

    #[test]
    fn test_diagnostic_display() {
        let plain = Diagnostic::new(Severity::Info, "hello");
        assert_eq!(plain.to_string(), "hello");

        let located = Diagnostic::new(Severity::Info, "hello").at(0x1a);
        assert_eq!(located.to_string(), "[0x001a] hello");
    }
}
