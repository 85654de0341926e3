//! Source locations attached to every node.
//!
//! Locations are only used for diagnostics; nodes copy them by value.

use std::fmt;

/// A 1-based line/column position in the script source.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: u32,
    pub column: u32,
}

impl Position {
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

impl Default for Position {
    fn default() -> Self {
        Self { line: 1, column: 1 }
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.line, self.column)
    }
}

/// Span between two positions (end is exclusive).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub struct Location {
    pub begin: Position,
    pub end: Position,
}

impl Location {
    pub fn new(begin: Position, end: Position) -> Self {
        Self { begin, end }
    }

    /// Location covering `columns` characters of a single line.
    pub fn on_line(line: u32, column: u32, columns: u32) -> Self {
        Self {
            begin: Position::new(line, column),
            end: Position::new(line, column + columns),
        }
    }

    /// Smallest location covering both `self` and `other`.
    pub fn join(&self, other: &Location) -> Location {
        Location {
            begin: self.begin.min(other.begin),
            end: self.end.max(other.end),
        }
    }
}

impl fmt::Display for Location {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.begin == self.end {
            write!(f, "{}", self.begin)
        } else if self.begin.line == self.end.line {
            write!(f, "{}-{}", self.begin, self.end.column)
        } else {
            write!(f, "{}-{}", self.begin, self.end)
        }
    }
}
