//! Structured diagnostics for the Tessera place-and-route engine.
//!
//! Engine components do not print or log directly; they emit [`Diagnostic`]
//! records into a caller-supplied [`DiagnosticSink`]. The front end (out of
//! scope for this engine) decides how to render the accumulated records.

#![warn(missing_docs)]

pub mod code;
pub mod diagnostic;
pub mod severity;
pub mod sink;

pub use code::{Category, DiagnosticCode};
pub use diagnostic::Diagnostic;
pub use severity::Severity;
pub use sink::DiagnosticSink;
