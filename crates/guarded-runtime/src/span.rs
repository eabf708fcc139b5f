//! Source locations
//!
//! Every token, syntax node and diagnostic carries a `Span` pointing at the
//! place in the source where it starts. Lines and columns are 1-based.

use std::fmt;

/// Position of a construct in the source text
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Span {
    /// Line number (1-based)
    pub line: u32,
    /// Column number (1-based)
    pub column: u32,
}

impl Span {
    /// Create a new span
    pub fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }

    /// Placeholder span for synthesized nodes
    pub fn dummy() -> Self {
        Self { line: 0, column: 0 }
    }

    /// Whether this span points at real source text
    pub fn is_dummy(&self) -> bool {
        self.line == 0
    }

    /// The line, if this span is real
    pub fn line(&self) -> Option<u32> {
        if self.is_dummy() {
            None
        } else {
            Some(self.line)
        }
    }
}

impl fmt::Display for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.line, self.column)
    }
}
