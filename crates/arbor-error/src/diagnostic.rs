//! Diagnostic - structured error reports for IR construction and transforms
//!
//! Every failure carries:
//! - Error code (EI001, EX001, etc.)
//! - Severity level
//! - The source location of the offending operation, when known
//! - Optional notes with extra context

use crate::loc::Loc;
use std::fmt;
use thiserror::Error;

/// Diagnostic severity level
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Level {
    /// Fatal error - the compilation unit must be discarded
    Error,
    /// Warning - does not invalidate the compilation unit
    Warning,
    /// Note - additional information
    Note,
}

impl Level {
    pub fn as_str(&self) -> &'static str {
        match self {
            Level::Error => "error",
            Level::Warning => "warning",
            Level::Note => "note",
        }
    }
}

impl fmt::Display for Level {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Structured error code
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ErrorCode {
    /// Category (I = IR structure, X = transform)
    pub category: char,
    /// Error number
    pub number: u16,
}

impl ErrorCode {
    pub const fn new(category: char, number: u16) -> Self {
        Self { category, number }
    }

    // IR structure errors
    pub const UNTERMINATED_BLOCK: Self = Self::new('I', 1);
    pub const OPERAND_ARITY: Self = Self::new('I', 2);
    pub const BRANCH_CONDITION: Self = Self::new('I', 3);
    pub const RESULT_TYPE: Self = Self::new('I', 4);
    pub const EMPTY_REGION: Self = Self::new('I', 5);

    // Transform errors
    pub const MALFORMED_REGION: Self = Self::new('X', 1);
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "E{}{:03}", self.category, self.number)
    }
}

/// A complete diagnostic
#[derive(Debug, Clone, Error)]
#[error("{level}[{code}]: {message}")]
pub struct Diagnostic {
    /// Severity level
    pub level: Level,
    /// Error code
    pub code: ErrorCode,
    /// Main message
    pub message: String,
    /// Location of the offending construct
    pub loc: Loc,
    /// Additional notes
    pub notes: Vec<String>,
}

impl Diagnostic {
    /// Creates a new error
    pub fn error(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            level: Level::Error,
            code,
            message: message.into(),
            loc: Loc::Unknown,
            notes: Vec::new(),
        }
    }

    /// Creates a new warning
    pub fn warning(code: ErrorCode, message: impl Into<String>) -> Self {
        Self {
            level: Level::Warning,
            code,
            message: message.into(),
            loc: Loc::Unknown,
            notes: Vec::new(),
        }
    }

    /// Attaches a source location
    pub fn at(mut self, loc: Loc) -> Self {
        self.loc = loc;
        self
    }

    /// Adds a note
    pub fn with_note(mut self, note: impl Into<String>) -> Self {
        self.notes.push(note.into());
        self
    }

    /// Renders the diagnostic in long form, one line per note
    pub fn render(&self) -> String {
        let mut out = self.to_string();
        if self.loc.is_known() {
            out.push_str(&format!("\n  --> {}", self.loc));
        }
        for note in &self.notes {
            out.push_str(&format!("\n  note: {}", note));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_error_code_display() {
        assert_eq!(ErrorCode::MALFORMED_REGION.to_string(), "EX001");
        assert_eq!(ErrorCode::UNTERMINATED_BLOCK.to_string(), "EI001");
    }

    #[test]
    fn test_diagnostic_display() {
        let diag = Diagnostic::error(ErrorCode::MALFORMED_REGION, "bad exit");
        assert_eq!(diag.to_string(), "error[EX001]: bad exit");
    }

    #[test]
    fn test_diagnostic_render() {
        let diag = Diagnostic::error(ErrorCode::OPERAND_ARITY, "expected 2 operands")
            .at(Loc::source(4, 2))
            .with_note("while checking a binary operation");
        let rendered = diag.render();
        assert!(rendered.contains("--> 4:2"));
        assert!(rendered.contains("note: while checking"));
    }
}
