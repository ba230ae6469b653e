//! Loc - source location tag
//!
//! Operations carry a `Loc` so that diagnostics can point back at the
//! construct that produced them. The IR is built programmatically, so a
//! location is either a line/column pair recorded by an earlier stage or
//! unknown.

use std::fmt;

/// A source location tag attached to IR operations
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Loc {
    /// No location information available
    #[default]
    Unknown,
    /// Position in the original source (1-indexed)
    Source { line: u32, column: u32 },
}

impl Loc {
    pub fn source(line: u32, column: u32) -> Self {
        Loc::Source { line, column }
    }

    /// Checks if the location carries real position information
    pub fn is_known(&self) -> bool {
        !matches!(self, Loc::Unknown)
    }
}

impl fmt::Display for Loc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Loc::Unknown => write!(f, "?:?"),
            Loc::Source { line, column } => write!(f, "{}:{}", line, column),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_loc_display() {
        assert_eq!(Loc::source(3, 7).to_string(), "3:7");
        assert_eq!(Loc::Unknown.to_string(), "?:?");
    }

    #[test]
    fn test_loc_is_known() {
        assert!(Loc::source(1, 1).is_known());
        assert!(!Loc::default().is_known());
    }
}
