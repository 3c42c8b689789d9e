//! Diagnostics collected while a build runs.
//!
//! Diagnostics are append-only within one build call and keep the order in
//! which they were emitted. Internal consumers always see the full stream;
//! only the copy returned to the caller is severity-filtered.

use serde::{Deserialize, Serialize};
use std::fmt;
use tracing::{debug, error, warn};

/// Diagnostic severity, ordered `Info < Warn < Error`
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warn,
    Error,
}

impl Severity {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Info => "info",
            Self::Warn => "warn",
            Self::Error => "error",
        }
    }

    /// Parse a requested minimum severity. Anything unrecognized means `Info`.
    pub fn parse_min(value: Option<&str>) -> Self {
        match value.map(|v| v.trim().to_ascii_lowercase()).as_deref() {
            Some("warn") | Some("warning") => Self::Warn,
            Some("error") => Self::Error,
            _ => Self::Info,
        }
    }
}

impl fmt::Display for Severity {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A single build diagnostic
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    pub severity: Severity,
    pub message: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub file: Option<String>,
}

impl Diagnostic {
    pub fn new(severity: Severity, message: impl Into<String>) -> Self {
        Self {
            severity,
            message: message.into(),
            file: None,
        }
    }

    pub fn info(message: impl Into<String>) -> Self {
        Self::new(Severity::Info, message)
    }

    pub fn warn(message: impl Into<String>) -> Self {
        Self::new(Severity::Warn, message)
    }

    pub fn error(message: impl Into<String>) -> Self {
        Self::new(Severity::Error, message)
    }

    pub fn with_file(mut self, file: impl Into<String>) -> Self {
        self.file = Some(file.into());
        self
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.file {
            Some(file) => write!(f, "[{}] {} ({})", self.severity, self.message, file),
            None => write!(f, "[{}] {}", self.severity, self.message),
        }
    }
}

/// Anything that accepts diagnostics
pub trait DiagnosticSink: Send {
    fn push(&mut self, diagnostic: Diagnostic);

    fn info(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Diagnostic::info(message));
    }

    fn warn(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Diagnostic::warn(message));
    }

    fn error(&mut self, message: impl Into<String>)
    where
        Self: Sized,
    {
        self.push(Diagnostic::error(message));
    }
}

/// Ordered, append-only diagnostic collection
#[derive(Debug, Clone, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    pub fn as_slice(&self) -> &[Diagnostic] {
        &self.items
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.severity == Severity::Error)
    }

    /// Diagnostics at or above `min`, in emission order
    pub fn filtered(&self, min: Severity) -> Vec<Diagnostic> {
        filter_by_severity(&self.items, min)
    }
}

impl DiagnosticSink for Diagnostics {
    fn push(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity {
            Severity::Info => debug!("{}", diagnostic.message),
            Severity::Warn => warn!("{}", diagnostic.message),
            Severity::Error => error!("{}", diagnostic.message),
        }
        self.items.push(diagnostic);
    }
}

/// Sink that discards everything pushed into it
#[derive(Debug, Clone, Copy, Default)]
pub struct NullSink;

impl DiagnosticSink for NullSink {
    fn push(&mut self, diagnostic: Diagnostic) {
        debug!("discarded diagnostic: {}", diagnostic);
    }
}

/// Keep only diagnostics ranked at or above `min`
pub fn filter_by_severity(diagnostics: &[Diagnostic], min: Severity) -> Vec<Diagnostic> {
    diagnostics
        .iter()
        .filter(|d| d.severity >= min)
        .cloned()
        .collect()
}
