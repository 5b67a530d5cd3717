//! Host API
//!
//! The parity highlighter never talks to the editor directly. It sees the
//! editor through the `Host` and `TextDocument` traits and registers its
//! callbacks in a `Registry`. The terminal editor in this crate is one
//! implementation; tests use a recording double.

mod registry;
#[cfg(test)]
pub(crate) mod testing;

pub use registry::{Callback, Disposable, ExtensionContext, Registry};

use crate::style::Style;

/// A location in a document. `column` is a byte offset within the line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Default)]
pub struct Position {
    pub line: usize,
    pub column: usize,
}

impl Position {
    pub const fn new(line: usize, column: usize) -> Self {
        Self { line, column }
    }
}

/// A half-open span between two positions
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Range {
    pub start: Position,
    pub end: Position,
}

impl Range {
    pub const fn new(start: Position, end: Position) -> Self {
        Self { start, end }
    }

    /// Portion of this range that falls on `line`, as byte offsets.
    /// `line_len` bounds ranges that continue past the end of the line.
    pub fn on_line(&self, line: usize, line_len: usize) -> Option<(usize, usize)> {
        if line < self.start.line || line > self.end.line {
            return None;
        }
        let start = if line == self.start.line { self.start.column } else { 0 };
        let end = if line == self.end.line { self.end.column } else { line_len };
        let end = end.min(line_len);
        (start < end).then_some((start, end))
    }
}

/// Opaque handle for a decoration type created by the host
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct DecorationHandle(pub(crate) usize);

/// Read access to a document's contents
pub trait TextDocument {
    /// Full text, lines joined with `\n`
    fn text(&self) -> String;

    /// Translate a byte offset in `text()` into a position.
    /// Offsets past the end clamp to the end of the document.
    fn position_at(&self, offset: usize) -> Position;
}

/// What the host editor offers to add-ons
pub trait Host {
    /// The document in the focused editor, if any
    fn active_document(&self) -> Option<&dyn TextDocument>;

    /// Register a decoration style and get a handle for it
    fn create_decoration_type(&mut self, style: Style) -> DecorationHandle;

    /// Paint exactly `ranges` with `decoration` in the focused editor,
    /// replacing whatever that decoration painted there before.
    /// Ranges are not shifted by later edits; they stay at their columns
    /// until the next call.
    fn set_decorations(&mut self, decoration: DecorationHandle, ranges: &[Range]);

    /// Show a short informational message
    fn show_information_message(&mut self, message: &str);
}

/// Offset to position mapping over a plain string
#[derive(Debug, Clone)]
pub struct LineIndex {
    /// Byte offset where each line starts
    line_starts: Vec<usize>,
    len: usize,
}

impl LineIndex {
    pub fn new(text: &str) -> Self {
        let mut line_starts = vec![0];
        line_starts.extend(text.match_indices('\n').map(|(i, _)| i + 1));
        Self {
            line_starts,
            len: text.len(),
        }
    }

    pub fn position_at(&self, offset: usize) -> Position {
        let offset = offset.min(self.len);
        let line = match self.line_starts.binary_search(&offset) {
            Ok(line) => line,
            Err(next) => next - 1,
        };
        Position::new(line, offset - self.line_starts[line])
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}
