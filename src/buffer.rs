//! Buffer representation - lines of text plus the decorations painted on them

use std::collections::BTreeMap;
use std::path::{Path, PathBuf};

use unicode_width::UnicodeWidthStr;

use crate::host::{DecorationHandle, Position, Range, TextDocument};
use crate::style::{Span, Style};

/// A buffer containing text and metadata
#[derive(Debug)]
pub struct Buffer {
    /// Lines of text, without line terminators. Never empty.
    lines: Vec<String>,
    /// Buffer name (e.g., "main.rs", "*scratch*")
    name: String,
    /// Associated file path (None for unnamed buffers)
    filename: Option<PathBuf>,
    /// Whether buffer has unsaved changes
    modified: bool,
    /// Bumped on every text change
    version: u64,
    /// Ranges painted per decoration type
    decorations: BTreeMap<DecorationHandle, Vec<Range>>,
}

impl Buffer {
    /// Create a new empty buffer with the given name
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            lines: vec![String::new()],
            name: name.into(),
            filename: None,
            modified: false,
            version: 0,
            decorations: BTreeMap::new(),
        }
    }

    /// Create a buffer from text; `\r\n` and `\n` both end a line
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let mut buffer = Self::new(name);
        let lines: Vec<String> = text.lines().map(String::from).collect();
        if !lines.is_empty() {
            buffer.lines = lines;
        }
        buffer
    }

    /// Create a buffer from file contents
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let content = std::fs::read_to_string(path)?;
        let name = buffer_name(path);
        let mut buffer = Self::from_text(name, &content);
        buffer.filename = Some(path.to_path_buf());
        Ok(buffer)
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn filename(&self) -> Option<&Path> {
        self.filename.as_deref()
    }

    pub fn set_filename(&mut self, path: PathBuf) {
        self.filename = Some(path);
    }

    pub fn is_modified(&self) -> bool {
        self.modified
    }

    /// Edit counter, used to detect text changes
    pub fn version(&self) -> u64 {
        self.version
    }

    pub fn line_count(&self) -> usize {
        self.lines.len()
    }

    pub fn line(&self, idx: usize) -> Option<&str> {
        self.lines.get(idx).map(|s| s.as_str())
    }

    pub fn line_len(&self, idx: usize) -> usize {
        self.lines.get(idx).map_or(0, |l| l.len())
    }

    fn touch(&mut self) {
        self.modified = true;
        self.version += 1;
    }

    /// Insert a character at position
    pub fn insert_char(&mut self, line_idx: usize, byte_pos: usize, ch: char) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            line.insert(byte_pos, ch);
            self.touch();
        }
    }

    /// Insert a newline, splitting the current line
    pub fn insert_newline(&mut self, line_idx: usize, byte_pos: usize) {
        if let Some(line) = self.lines.get_mut(line_idx) {
            let rest = line.split_off(byte_pos);
            self.lines.insert(line_idx + 1, rest);
            self.touch();
        }
    }

    /// Delete the character at position, joining with the next line at end of line
    pub fn delete_char(&mut self, line_idx: usize, byte_pos: usize) -> bool {
        let Some(line) = self.lines.get_mut(line_idx) else {
            return false;
        };
        if let Some(ch) = line[byte_pos..].chars().next() {
            line.replace_range(byte_pos..byte_pos + ch.len_utf8(), "");
            self.touch();
            true
        } else {
            self.join_line(line_idx)
        }
    }

    /// Delete backward (backspace); returns the new cursor position
    pub fn delete_backward(&mut self, line_idx: usize, byte_pos: usize) -> Option<(usize, usize)> {
        if byte_pos == 0 {
            if line_idx == 0 {
                return None;
            }
            let join_pos = self.line_len(line_idx - 1);
            self.join_line(line_idx - 1);
            return Some((line_idx - 1, join_pos));
        }
        let line = self.lines.get_mut(line_idx)?;
        let ch = line[..byte_pos].chars().last()?;
        let new_pos = byte_pos - ch.len_utf8();
        line.replace_range(new_pos..byte_pos, "");
        self.touch();
        Some((line_idx, new_pos))
    }

    /// Join line with the next line
    pub fn join_line(&mut self, line_idx: usize) -> bool {
        if line_idx + 1 >= self.lines.len() {
            return false;
        }
        let next = self.lines.remove(line_idx + 1);
        self.lines[line_idx].push_str(&next);
        self.touch();
        true
    }

    /// Kill from position to end of line, or the newline when already there
    pub fn kill_to_eol(&mut self, line_idx: usize, byte_pos: usize) -> Option<String> {
        let line = self.lines.get_mut(line_idx)?;
        if byte_pos < line.len() {
            let killed = line.split_off(byte_pos);
            self.touch();
            Some(killed)
        } else if self.join_line(line_idx) {
            Some("\n".to_string())
        } else {
            None
        }
    }

    /// Write buffer to its file
    pub fn save(&mut self) -> std::io::Result<()> {
        let path = self.filename.clone().ok_or_else(|| {
            std::io::Error::new(std::io::ErrorKind::NotFound, "No filename set")
        })?;
        std::fs::write(&path, self.text())?;
        self.modified = false;
        Ok(())
    }

    /// Replace what `decoration` paints on this buffer
    pub fn set_decorations(&mut self, decoration: DecorationHandle, ranges: &[Range]) {
        if ranges.is_empty() {
            self.decorations.remove(&decoration);
        } else {
            self.decorations.insert(decoration, ranges.to_vec());
        }
    }

    pub fn decorations(&self, decoration: DecorationHandle) -> &[Range] {
        self.decorations.get(&decoration).map(|r| r.as_slice()).unwrap_or(&[])
    }

    /// Styled spans for one line, sorted by start.
    ///
    /// Ranges can be stale after an edit, so they are clamped to the line
    /// and to character boundaries.
    pub fn line_spans(&self, line_idx: usize, styles: &[Style]) -> Vec<Span> {
        let Some(text) = self.line(line_idx) else {
            return Vec::new();
        };
        let mut spans = Vec::new();
        for (handle, ranges) in &self.decorations {
            let Some(style) = styles.get(handle.0) else {
                continue;
            };
            for range in ranges {
                if let Some((start, end)) = range.on_line(line_idx, text.len()) {
                    let start = floor_char_boundary(text, start);
                    let end = floor_char_boundary(text, end);
                    if start < end {
                        spans.push(Span::new(start, end, *style));
                    }
                }
            }
        }
        spans.sort_by_key(|s| s.start);
        spans
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new("*scratch*")
    }
}

impl TextDocument for Buffer {
    fn text(&self) -> String {
        self.lines.join("\n")
    }

    fn position_at(&self, offset: usize) -> Position {
        let mut remaining = offset;
        for (idx, line) in self.lines.iter().enumerate() {
            if remaining <= line.len() {
                return Position::new(idx, remaining);
            }
            remaining -= line.len() + 1;
        }
        let last = self.lines.len() - 1;
        Position::new(last, self.lines[last].len())
    }
}

/// Buffer name for a path: its file name, or the whole path as a fallback
pub fn buffer_name(path: &Path) -> String {
    path.file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

/// Largest char boundary at or before `pos`
fn floor_char_boundary(s: &str, pos: usize) -> usize {
    let mut p = pos.min(s.len());
    while !s.is_char_boundary(p) {
        p -= 1;
    }
    p
}

/// Byte offset in `text` of display column `col`, or the line length
pub fn col_to_byte(text: &str, col: usize) -> usize {
    let mut current = 0;
    for (idx, ch) in text.char_indices() {
        if current >= col {
            return idx;
        }
        current += unicode_width::UnicodeWidthChar::width(ch).unwrap_or(1);
    }
    text.len()
}

/// Display column of byte offset `byte_pos` in `text`
pub fn byte_to_col(text: &str, byte_pos: usize) -> usize {
    text[..floor_char_boundary(text, byte_pos)].width()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_from_text_handles_crlf() {
        let buffer = Buffer::from_text("t", "1 2\r\n3\r\n");
        assert_eq!(buffer.line_count(), 2);
        assert_eq!(buffer.line(0), Some("1 2"));
        assert_eq!(buffer.text(), "1 2\n3");
    }

    #[test]
    fn test_empty_buffer_has_one_line() {
        let buffer = Buffer::from_text("t", "");
        assert_eq!(buffer.line_count(), 1);
        assert_eq!(buffer.text(), "");
    }

    #[test]
    fn test_position_at() {
        let buffer = Buffer::from_text("t", "ab\n\ncde");
        assert_eq!(buffer.position_at(0), Position::new(0, 0));
        assert_eq!(buffer.position_at(2), Position::new(0, 2));
        assert_eq!(buffer.position_at(3), Position::new(1, 0));
        assert_eq!(buffer.position_at(4), Position::new(2, 0));
        assert_eq!(buffer.position_at(7), Position::new(2, 3));
        assert_eq!(buffer.position_at(99), Position::new(2, 3));
    }

    #[test]
    fn test_edits_bump_version() {
        let mut buffer = Buffer::from_text("t", "12");
        assert_eq!(buffer.version(), 0);

        buffer.insert_char(0, 2, '3');
        buffer.insert_newline(0, 1);
        assert_eq!(buffer.text(), "1\n23");
        assert_eq!(buffer.version(), 2);
        assert!(buffer.is_modified());

        assert_eq!(buffer.delete_backward(1, 0), Some((0, 1)));
        assert_eq!(buffer.text(), "123");
        assert_eq!(buffer.version(), 3);
    }

    #[test]
    fn test_no_op_edits_keep_version() {
        let mut buffer = Buffer::from_text("t", "x");
        assert_eq!(buffer.delete_backward(0, 0), None);
        assert!(!buffer.delete_char(0, 1));
        assert_eq!(buffer.kill_to_eol(0, 1), None);
        assert_eq!(buffer.version(), 0);
    }

    #[test]
    fn test_delete_char_joins_lines() {
        let mut buffer = Buffer::from_text("t", "ab\ncd");
        assert!(buffer.delete_char(0, 1));
        assert!(buffer.delete_char(0, 1));
        assert_eq!(buffer.text(), "acd");
    }

    #[test]
    fn test_kill_to_eol() {
        let mut buffer = Buffer::from_text("t", "hello 42\nnext");
        assert_eq!(buffer.kill_to_eol(0, 5), Some(" 42".to_string()));
        assert_eq!(buffer.kill_to_eol(0, 5), Some("\n".to_string()));
        assert_eq!(buffer.text(), "hellonext");
    }

    #[test]
    fn test_save_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nums.txt");
        let mut buffer = Buffer::from_text("nums.txt", "1\n2");
        buffer.set_filename(path.clone());
        buffer.insert_char(1, 1, '0');

        buffer.save().unwrap();

        assert!(!buffer.is_modified());
        let reloaded = Buffer::from_file(&path).unwrap();
        assert_eq!(reloaded.text(), "1\n20");
        assert_eq!(reloaded.name(), "nums.txt");
    }

    #[test]
    fn test_save_without_filename_fails() {
        assert!(Buffer::new("x").save().is_err());
    }

    #[test]
    fn test_set_decorations_replaces() {
        let mut buffer = Buffer::from_text("t", "1 2");
        let handle = DecorationHandle(0);
        let first = Range::new(Position::new(0, 0), Position::new(0, 1));
        let second = Range::new(Position::new(0, 2), Position::new(0, 3));

        buffer.set_decorations(handle, &[first]);
        buffer.set_decorations(handle, &[second]);
        assert_eq!(buffer.decorations(handle), &[second]);

        buffer.set_decorations(handle, &[]);
        assert!(buffer.decorations(handle).is_empty());
    }

    #[test]
    fn test_line_spans() {
        let mut buffer = Buffer::from_text("t", "1 22\n3");
        let even = Style::bg(Color::Green);
        let odd = Style::bg(Color::Magenta);
        buffer.set_decorations(
            DecorationHandle(0),
            &[Range::new(Position::new(0, 2), Position::new(0, 4))],
        );
        buffer.set_decorations(
            DecorationHandle(1),
            &[
                Range::new(Position::new(0, 0), Position::new(0, 1)),
                Range::new(Position::new(1, 0), Position::new(1, 1)),
            ],
        );

        let spans = buffer.line_spans(0, &[even, odd]);
        assert_eq!(spans, vec![Span::new(0, 1, odd), Span::new(2, 4, even)]);
        assert_eq!(buffer.line_spans(1, &[even, odd]), vec![Span::new(0, 1, odd)]);
    }

    #[test]
    fn test_edits_do_not_shift_decorations() {
        let mut buffer = Buffer::from_text("t", "12");
        let range = Range::new(Position::new(0, 0), Position::new(0, 2));
        buffer.set_decorations(DecorationHandle(0), &[range]);

        buffer.insert_char(0, 0, 'x');
        assert_eq!(buffer.decorations(DecorationHandle(0)), &[range]);
        assert_eq!(
            buffer.line_spans(0, &[Style::default()]),
            vec![Span::new(0, 2, Style::default())]
        );
    }

    #[test]
    fn test_stale_spans_are_clamped() {
        let mut buffer = Buffer::from_text("t", "é");
        buffer.set_decorations(
            DecorationHandle(0),
            &[Range::new(Position::new(0, 0), Position::new(0, 1))],
        );
        assert!(buffer.line_spans(0, &[Style::default()]).is_empty());
    }

    #[test]
    fn test_columns() {
        assert_eq!(col_to_byte("a日b", 1), 1);
        assert_eq!(col_to_byte("a日b", 3), 4);
        assert_eq!(col_to_byte("ab", 10), 2);
        assert_eq!(byte_to_col("a日b", 4), 3);
    }
}
