//! Source positions for uses, declarations and existing include lines.
//!
//! A position is always relative to a file identity, since the analyzer
//! reasons about files rather than byte buffers.

use std::fmt;

use super::IncludeName;

/// A position in a source file (1-indexed lines, as the front end reports them).
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLoc {
    pub file: IncludeName,
    pub line: u32,
    pub column: u32,
}

impl SourceLoc {
    pub fn new(file: IncludeName, line: u32, column: u32) -> Self {
        Self { file, line, column }
    }

    /// True if both positions are in the same file and `self` comes first.
    pub fn is_before(&self, other: &SourceLoc) -> bool {
        self.file == other.file && (self.line, self.column) < (other.line, other.column)
    }
}

impl fmt::Display for SourceLoc {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}:{}", self.file.path(), self.line, self.column)
    }
}

/// Spelling and expansion location of one occurrence.
///
/// The two differ only when the occurrence was produced by a macro: the
/// spelling is where the tokens were written (inside the macro body), the
/// expansion is where the macro was invoked.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct Location {
    pub spelling: SourceLoc,
    pub expansion: SourceLoc,
}

impl Location {
    /// A location that did not come from a macro expansion.
    pub fn plain(loc: SourceLoc) -> Self {
        Self {
            spelling: loc.clone(),
            expansion: loc,
        }
    }

    pub fn macro_expansion(spelling: SourceLoc, expansion: SourceLoc) -> Self {
        Self {
            spelling,
            expansion,
        }
    }

    pub fn is_macro_expansion(&self) -> bool {
        self.spelling != self.expansion
    }
}

/// Inclusive line range of an existing line in the analyzed file.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct LineRange {
    pub start: u32,
    pub end: u32,
}

impl LineRange {
    pub fn new(start: u32, end: u32) -> Self {
        Self { start, end }
    }

    /// A range covering a single line.
    pub fn line(line: u32) -> Self {
        Self {
            start: line,
            end: line,
        }
    }

    pub fn contains(&self, line: u32) -> bool {
        line >= self.start && line <= self.end
    }
}

impl fmt::Display for LineRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.start == self.end {
            write!(f, "{}", self.start)
        } else {
            write!(f, "{}-{}", self.start, self.end)
        }
    }
}
