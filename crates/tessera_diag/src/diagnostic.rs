//! Structured diagnostic messages with severity, codes, and subjects.

use crate::code::DiagnosticCode;
use crate::severity::Severity;
use serde::{Deserialize, Serialize};

/// A structured diagnostic record emitted by an engine component.
///
/// Each diagnostic carries a severity, a unique code, a human-readable
/// message, an optional subject (the name of the net, cell, or site the
/// diagnostic is about), and explanatory notes.
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct Diagnostic {
    /// The severity level of this diagnostic.
    pub severity: Severity,
    /// The unique code identifying the type of diagnostic.
    pub code: DiagnosticCode,
    /// The main diagnostic message.
    pub message: String,
    /// The design or device element this diagnostic is about, if any.
    pub subject: Option<String>,
    /// Explanatory footnotes.
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error diagnostic with the given code and message.
    pub fn error(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Error,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning diagnostic with the given code and message.
    pub fn warning(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Warning,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
        }
    }

    /// Creates a new note diagnostic with the given code and message.
    pub fn note(code: DiagnosticCode, message: impl Into<String>) -> Self {
        Self {
            severity: Severity::Note,
            code,
            message: message.into(),
            subject: None,
            notes: Vec::new(),
        }
    }

    /// Sets the subject of this diagnostic.
    pub fn with_subject(mut self, subject: impl Into<String>) -> Self {
        self.subject = Some(subject.into());
        self
    }

    /// Adds a note to this diagnostic.
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::code::Category;

    #[test]
    fn create_error() {
        let code = DiagnosticCode::new(Category::Route, 1);
        let diag = Diagnostic::error(code, "no route found");
        assert_eq!(diag.severity, Severity::Error);
        assert_eq!(diag.message, "no route found");
        assert_eq!(format!("{}", diag.code), "R001");
        assert!(diag.subject.is_none());
    }

    #[test]
    fn create_warning() {
        let code = DiagnosticCode::new(Category::Place, 2);
        let diag = Diagnostic::warning(code, "cluster rejected");
        assert_eq!(diag.severity, Severity::Warning);
    }

    #[test]
    fn builder_methods() {
        let code = DiagnosticCode::new(Category::Route, 20);
        let diag = Diagnostic::warning(code, "routing did not converge")
            .with_subject("net_42")
            .with_note("increase the iteration cap or reduce utilization");
        assert_eq!(diag.subject.as_deref(), Some("net_42"));
        assert_eq!(diag.notes.len(), 1);
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Arch, 5);
        let diag = Diagnostic::note(code, "fallback device").with_subject("mesh");
        let json = serde_json::to_string(&diag).unwrap();
        let back: Diagnostic = serde_json::from_str(&json).unwrap();
        assert_eq!(back.message, "fallback device");
        assert_eq!(back.subject.as_deref(), Some("mesh"));
    }
}
