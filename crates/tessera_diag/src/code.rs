//! Diagnostic codes with category prefixes for structured identification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// The category of a diagnostic code, determining its prefix letter.
///
/// Each category maps to a single-character prefix used in diagnostic code
/// display (e.g., `R020` for a routing diagnostic).
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub enum Category {
    /// Architecture and resource-graph diagnostics, prefixed with `A`.
    Arch,
    /// Placement diagnostics, prefixed with `P`.
    Place,
    /// Routing diagnostics, prefixed with `R`.
    Route,
}

impl Category {
    /// Returns the single-character prefix for this category.
    pub fn prefix(self) -> char {
        match self {
            Category::Arch => 'A',
            Category::Place => 'P',
            Category::Route => 'R',
        }
    }
}

/// A structured diagnostic code combining a category prefix and a numeric
/// identifier.
///
/// Displayed as the category prefix followed by a zero-padded 3-digit number,
/// e.g., `A001`, `P012`, `R020`.
#[derive(Clone, Copy, PartialEq, Eq, Hash, Debug, Serialize, Deserialize)]
pub struct DiagnosticCode {
    /// The category of this diagnostic.
    pub category: Category,
    /// The numeric identifier within the category.
    pub number: u16,
}

impl DiagnosticCode {
    /// Creates a new diagnostic code.
    pub fn new(category: Category, number: u16) -> Self {
        Self { category, number }
    }
}

impl fmt::Display for DiagnosticCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{:03}", self.category.prefix(), self.number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn category_prefixes() {
        assert_eq!(Category::Arch.prefix(), 'A');
        assert_eq!(Category::Place.prefix(), 'P');
        assert_eq!(Category::Route.prefix(), 'R');
    }

    #[test]
    fn display_format() {
        let code = DiagnosticCode::new(Category::Route, 20);
        assert_eq!(format!("{code}"), "R020");

        let code = DiagnosticCode::new(Category::Place, 3);
        assert_eq!(format!("{code}"), "P003");
    }

    #[test]
    fn serde_roundtrip() {
        let code = DiagnosticCode::new(Category::Arch, 101);
        let json = serde_json::to_string(&code).unwrap();
        let back: DiagnosticCode = serde_json::from_str(&json).unwrap();
        assert_eq!(code, back);
    }
}
