//! Source positions and spans.
//!
//! Lines and columns are 1-based; columns count characters, not bytes, so
//! caret rendering lines up for non-ASCII source. The all-zero value is a
//! sentinel marking "no position".

use serde::{Deserialize, Serialize};

/// A point in source text.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
pub struct Position {
    pub line: u32,
    pub column: u32,
    /// Byte offset from the start of the file.
    pub offset: u32,
}

impl Position {
    /// Sentinel for "no position".
    pub const ZERO: Position = Position {
        line: 0,
        column: 0,
        offset: 0,
    };

    pub fn new(line: u32, column: u32, offset: u32) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    pub fn is_zero(&self) -> bool {
        self.line == 0 && self.column == 0
    }
}

impl std::fmt::Display for Position {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}

/// A source range. `end` is the position of the last character covered,
/// so a single-character span has `start == end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub struct Span {
    pub start: Position,
    pub end: Position,
}

impl Span {
    pub const ZERO: Span = Span {
        start: Position::ZERO,
        end: Position::ZERO,
    };

    pub fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Smallest span covering both inputs.
    pub fn union(self, other: Span) -> Span {
        Span {
            start: self.start.min(other.start),
            end: self.end.max(other.end),
        }
    }

    /// Span from the start of `self` to the end of `other`.
    pub fn to(self, other: Span) -> Span {
        Span {
            start: self.start,
            end: other.end,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn ordering_follows_source_order() {
        let a = Position::new(1, 1, 0);
        let b = Position::new(1, 5, 4);
        let c = Position::new(2, 1, 6);
        assert!(a < b);
        assert!(b < c);
        assert!(Position::ZERO < a);
    }

    #[test]
    fn display_is_line_colon_column() {
        assert_eq!(Position::new(3, 14, 40).to_string(), "3:14");
    }

    #[test]
    fn union_covers_both_spans() {
        let a = Span::new(Position::new(1, 1, 0), Position::new(1, 3, 2));
        let b = Span::new(Position::new(2, 1, 10), Position::new(2, 4, 13));
        let u = a.union(b);
        assert_eq!(u.start, a.start);
        assert_eq!(u.end, b.end);
    }
}
