use std::sync::{Arc, Mutex, PoisonError};

/// Severity of a non-fatal diagnostic, lowest first.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Severity {
    Debug,
    Info,
    Warn,
}

/// Where the dumper reports problems that do not end a traversal, such as
/// a document that failed to decode and was skipped.
///
/// The sink is handed to the [`Dumper`](crate::Dumper) when it is built;
/// the core never reaches for a global logger. Gating by severity is the
/// sink's business.
pub trait DiagnosticSink {
    fn emit(&self, severity: Severity, message: &str);

    fn warn(&self, message: &str) {
        self.emit(Severity::Warn, message);
    }

    fn info(&self, message: &str) {
        self.emit(Severity::Info, message);
    }

    fn debug(&self, message: &str) {
        self.emit(Severity::Debug, message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for &S {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

impl<S: DiagnosticSink + ?Sized> DiagnosticSink for Arc<S> {
    fn emit(&self, severity: Severity, message: &str) {
        (**self).emit(severity, message);
    }
}

/// Forwards diagnostics to `tracing` under the `bdump` target. Filtering is
/// left to whichever subscriber the host installed.
#[derive(Clone, Copy, Debug, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn emit(&self, severity: Severity, message: &str) {
        match severity {
            Severity::Warn => tracing::warn!(target: "bdump", "{message}"),
            Severity::Info => tracing::info!(target: "bdump", "{message}"),
            Severity::Debug => tracing::debug!(target: "bdump", "{message}"),
        }
    }
}

/// Drops everything.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn emit(&self, _severity: Severity, _message: &str) {}
}

/// One recorded diagnostic.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
}

/// Keeps diagnostics in memory, in emission order.
///
/// Records below the minimum severity are discarded on arrival.
#[derive(Debug)]
pub struct MemorySink {
    min_severity: Severity,
    records: Mutex<Vec<Diagnostic>>,
}

impl MemorySink {
    /// Record everything.
    #[must_use]
    pub fn new() -> Self {
        Self::with_min_severity(Severity::Debug)
    }

    #[must_use]
    pub fn with_min_severity(min_severity: Severity) -> Self {
        Self {
            min_severity,
            records: Mutex::new(Vec::new()),
        }
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Messages recorded at exactly `severity`.
    pub fn messages(&self, severity: Severity) -> Vec<String> {
        self.records()
            .into_iter()
            .filter(|d| d.severity == severity)
            .map(|d| d.message)
            .collect()
    }
}

impl Default for MemorySink {
    fn default() -> Self {
        Self::new()
    }
}

impl DiagnosticSink for MemorySink {
    fn emit(&self, severity: Severity, message: &str) {
        if severity < self.min_severity {
            return;
        }
        self.records
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(Diagnostic {
                severity,
                message: message.to_string(),
            });
    }
}
