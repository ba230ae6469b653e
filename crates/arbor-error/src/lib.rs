//! arbor-error - Diagnostics for the arbor compiler
//!
//! This crate provides the error currency shared by the IR and its
//! transforms: a structured [`Diagnostic`] with a code, severity and source
//! location, and a [`Diagnostics`] accumulator for drivers that process
//! several functions independently.
//!
//! # Example
//!
//! ```rust
//! use arbor_error::{Diagnostic, ErrorCode, Loc};
//!
//! let diag = Diagnostic::error(ErrorCode::MALFORMED_REGION, "block bb2 does not end in a return")
//!     .at(Loc::source(12, 3));
//!
//! assert_eq!(diag.to_string(), "error[EX001]: block bb2 does not end in a return");
//! ```

pub mod diagnostic;
pub mod loc;

pub use diagnostic::{Diagnostic, ErrorCode, Level};
pub use loc::Loc;

/// Default Result type for operations that may fail with diagnostics
pub type Result<T> = std::result::Result<T, Diagnostic>;

/// Collection of diagnostics accumulated across independent units of work
#[derive(Debug, Default)]
pub struct Diagnostics {
    items: Vec<Diagnostic>,
}

impl Diagnostics {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, diagnostic: Diagnostic) {
        self.items.push(diagnostic);
    }

    pub fn has_errors(&self) -> bool {
        self.items.iter().any(|d| d.level == Level::Error)
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Diagnostic> {
        self.items.iter()
    }

    /// Renders all diagnostics, one long-form entry per line group
    pub fn render(&self) -> String {
        self.items
            .iter()
            .map(|d| d.render())
            .collect::<Vec<_>>()
            .join("\n")
    }
}

impl IntoIterator for Diagnostics {
    type Item = Diagnostic;
    type IntoIter = std::vec::IntoIter<Diagnostic>;

    fn into_iter(self) -> Self::IntoIter {
        self.items.into_iter()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_diagnostics_accumulation() {
        let mut diags = Diagnostics::new();
        assert!(diags.is_empty());
        diags.push(Diagnostic::warning(ErrorCode::EMPTY_REGION, "region has no blocks"));
        assert!(!diags.has_errors());
        diags.push(Diagnostic::error(ErrorCode::MALFORMED_REGION, "bad exit"));
        assert!(diags.has_errors());
        assert_eq!(diags.len(), 2);
    }
}
