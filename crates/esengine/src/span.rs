//! Source position tracking.
//!
//! Mirrors the teacher's `CodeRange`/`CodeLoc` split (`parse.rs`): a cheap
//! `SourcePosition` pair for a single point, and an `ExtendedNodeLoc` triple
//! that additionally carries the byte index so it survives into bytecode
//! without needing to re-walk the source to recover line/column.

/// A single point in the source: 1-based line, 1-based column.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default, serde::Serialize, serde::Deserialize)]
pub struct SourcePosition {
    pub line: u32,
    pub column: u32,
}

impl SourcePosition {
    #[must_use]
    pub const fn new(line: u32, column: u32) -> Self {
        Self { line, column }
    }
}

/// `(line, column, byte-index)` triple. `line` is 1-based, `column` is
/// 1-based at line start, `index` is a byte offset into the original
/// source. All three survive through bytecode (spec §3.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct ExtendedNodeLoc {
    pub line: u32,
    pub column: u32,
    pub index: u32,
}

impl ExtendedNodeLoc {
    #[must_use]
    pub const fn new(line: u32, column: u32, index: u32) -> Self {
        Self { line, column, index }
    }

    #[must_use]
    pub const fn position(self) -> SourcePosition {
        SourcePosition::new(self.line, self.column)
    }
}

/// A half-open `[start, end)` byte range paired with the start/end source
/// positions, used on tokens and AST nodes alike.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
pub struct SourceRange {
    pub start: ExtendedNodeLoc,
    pub end: ExtendedNodeLoc,
}

impl SourceRange {
    #[must_use]
    pub const fn new(start: ExtendedNodeLoc, end: ExtendedNodeLoc) -> Self {
        Self { start, end }
    }

    #[must_use]
    pub fn byte_len(&self) -> u32 {
        self.end.index.saturating_sub(self.start.index)
    }
}
