use std::fmt;
use std::sync::Mutex;

/// Diagnostic severity. A run fails iff at least one error was recorded;
/// warnings are reported but do not fail the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Severity {
    Warning,
    Error,
}

/// One structured diagnostic, keyed to its declaration site
/// (e.g. `VotesDao.increment`).
#[derive(Debug, Clone)]
pub struct Diagnostic {
    pub site: String,
    pub message: String,
    pub severity: Severity,
}

/// Collects non-fatal diagnostics across a generation run.
///
/// Appends are safe from concurrent units of work; generation across
/// independent entities may share one sink.
#[derive(Debug, Default)]
pub struct DiagnosticSink {
    records: Mutex<Vec<Diagnostic>>,
}

impl DiagnosticSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn error(&self, site: &str, message: impl fmt::Display) {
        self.push(site, message, Severity::Error);
    }

    pub fn warning(&self, site: &str, message: impl fmt::Display) {
        self.push(site, message, Severity::Warning);
    }

    fn push(&self, site: &str, message: impl fmt::Display, severity: Severity) {
        let diagnostic = Diagnostic {
            site: site.to_string(),
            message: message.to_string(),
            severity,
        };
        if severity == Severity::Error {
            log::warn!("{}: {}", diagnostic.site, diagnostic.message);
        }
        self.records.lock().unwrap().push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.records
            .lock()
            .unwrap()
            .iter()
            .any(|record| record.severity == Severity::Error)
    }

    /// Snapshot of everything recorded so far.
    pub fn records(&self) -> Vec<Diagnostic> {
        self.records.lock().unwrap().clone()
    }

    pub fn is_empty(&self) -> bool {
        self.records.lock().unwrap().is_empty()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;

    #[test]
    fn warnings_do_not_fail_the_run() {
        let sink = DiagnosticSink::new();
        sink.warning("VotesDao.increment", "ignored column override");
        assert!(!sink.has_errors());
        sink.error("VotesDao.increment", "no regular columns");
        assert!(sink.has_errors());
        assert_eq!(sink.records().len(), 2);
    }

    #[test]
    fn appends_are_safe_across_threads() {
        let sink = Arc::new(DiagnosticSink::new());
        let handles: Vec<_> = (0..8)
            .map(|worker| {
                let sink = Arc::clone(&sink);
                std::thread::spawn(move || {
                    sink.error(&format!("entity{worker}"), "bad declaration");
                })
            })
            .collect();
        for handle in handles {
            handle.join().unwrap();
        }
        assert_eq!(sink.records().len(), 8);
    }
}
