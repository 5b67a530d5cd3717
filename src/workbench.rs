//! The editor model: buffers, the window onto the focused one, and the
//! `Host` implementation add-ons run against.

use std::path::Path;

use tracing::{debug, info};

use crate::buffer::{buffer_name, byte_to_col, col_to_byte, Buffer};
use crate::display::Display;
use crate::error::{EditorError, Result};
use crate::host::{DecorationHandle, Host, Range, TextDocument};
use crate::style::Style;
use crate::terminal::Terminal;
use crate::window::Window;

/// Rows taken by the mode line and the minibuffer
const CHROME_ROWS: u16 = 2;

pub struct Workbench {
    /// All open buffers; never empty
    buffers: Vec<Buffer>,
    /// Index of the focused buffer
    current: usize,
    pub window: Window,
    pub display: Display,
    /// Styles for decoration types, indexed by handle
    decoration_types: Vec<Style>,
}

impl Workbench {
    pub fn new(rows: u16, show_line_numbers: bool) -> Self {
        Self {
            buffers: vec![Buffer::default()],
            current: 0,
            window: Window::new(rows.saturating_sub(CHROME_ROWS)),
            display: Display::new(show_line_numbers),
            decoration_types: Vec::new(),
        }
    }

    pub fn current_buffer(&self) -> &Buffer {
        &self.buffers[self.current]
    }

    pub fn current_buffer_mut(&mut self) -> &mut Buffer {
        &mut self.buffers[self.current]
    }

    pub fn current_index(&self) -> usize {
        self.current
    }

    pub fn buffer_count(&self) -> usize {
        self.buffers.len()
    }

    pub fn buffer_names(&self) -> Vec<&str> {
        self.buffers.iter().map(|b| b.name()).collect()
    }

    /// Focused buffer and its edit version, for change detection
    pub fn focus_state(&self) -> (usize, u64) {
        (self.current, self.current_buffer().version())
    }

    pub fn decoration_styles(&self) -> &[Style] {
        &self.decoration_types
    }

    /// Draw the focused buffer with its decorations
    pub fn render(&mut self, terminal: &mut Terminal) -> Result<()> {
        let buffer = &self.buffers[self.current];
        self.display.render(terminal, buffer, &self.window, &self.decoration_types)
    }

    pub fn resize(&mut self, rows: u16) {
        self.window.set_height(rows.saturating_sub(CHROME_ROWS));
        self.display.force_redraw();
    }

    /// Focus buffer `idx`
    pub fn focus(&mut self, idx: usize) {
        if idx < self.buffers.len() && idx != self.current {
            self.current = idx;
            self.window.reset();
            self.display.force_redraw();
            debug!(buffer = self.current_buffer().name(), "buffer focused");
        }
    }

    pub fn focus_by_name(&mut self, name: &str) -> Result<()> {
        let idx = self
            .buffers
            .iter()
            .position(|b| b.name() == name)
            .ok_or_else(|| EditorError::NoSuchBuffer(name.to_string()))?;
        self.focus(idx);
        Ok(())
    }

    pub fn next_buffer(&mut self) {
        self.focus((self.current + 1) % self.buffers.len());
    }

    pub fn previous_buffer(&mut self) {
        self.focus((self.current + self.buffers.len() - 1) % self.buffers.len());
    }

    /// Open `path` and focus it. An already open file is just focused;
    /// a missing one becomes an empty buffer that will be created on save.
    pub fn open_file(&mut self, path: &Path) -> Result<()> {
        if let Some(idx) = self.buffers.iter().position(|b| b.filename() == Some(path)) {
            self.focus(idx);
            return Ok(());
        }

        let buffer = match Buffer::from_file(path) {
            Ok(buffer) => buffer,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let mut buffer = Buffer::new(buffer_name(path));
                buffer.set_filename(path.to_path_buf());
                self.display.set_message(format!("(New file) {}", buffer.name()));
                buffer
            }
            Err(e) => return Err(e.into()),
        };
        info!(path = %path.display(), lines = buffer.line_count(), "opened file");

        self.buffers.push(buffer);
        self.focus(self.buffers.len() - 1);
        Ok(())
    }

    pub fn save_current(&mut self) -> Result<()> {
        let buffer = self.current_buffer_mut();
        if buffer.filename().is_none() {
            return Err(EditorError::NoFilename);
        }
        buffer.save()?;
        let msg = format!("Wrote {}", buffer.name());
        info!(buffer = buffer.name(), "saved");
        self.display.set_message(msg);
        Ok(())
    }

    // Cursor movement and editing on the focused buffer

    pub fn insert_char(&mut self, ch: char) {
        let (line, col) = self.cursor();
        self.current_buffer_mut().insert_char(line, col, ch);
        self.window.set_cursor(line, col + ch.len_utf8());
        self.update_goal_col();
    }

    pub fn newline(&mut self) {
        let (line, col) = self.cursor();
        self.current_buffer_mut().insert_newline(line, col);
        self.window.set_cursor(line + 1, 0);
        self.window.set_goal_col(0);
    }

    pub fn delete_forward(&mut self) -> bool {
        let (line, col) = self.cursor();
        self.current_buffer_mut().delete_char(line, col)
    }

    pub fn delete_backward(&mut self) -> bool {
        let (line, col) = self.cursor();
        match self.current_buffer_mut().delete_backward(line, col) {
            Some((line, col)) => {
                self.window.set_cursor(line, col);
                self.update_goal_col();
                true
            }
            None => false,
        }
    }

    pub fn kill_line(&mut self) -> bool {
        let (line, col) = self.cursor();
        self.current_buffer_mut().kill_to_eol(line, col).is_some()
    }

    pub fn move_right(&mut self) -> bool {
        let (line, col) = self.cursor();
        let buffer = self.current_buffer();
        let text = buffer.line(line).unwrap_or("");
        let target = if let Some(ch) = text[col..].chars().next() {
            (line, col + ch.len_utf8())
        } else if line + 1 < buffer.line_count() {
            (line + 1, 0)
        } else {
            return false;
        };
        self.window.set_cursor(target.0, target.1);
        self.update_goal_col();
        true
    }

    pub fn move_left(&mut self) -> bool {
        let (line, col) = self.cursor();
        let buffer = self.current_buffer();
        let target = if let Some(ch) = buffer.line(line).and_then(|t| t[..col].chars().last()) {
            (line, col - ch.len_utf8())
        } else if line > 0 {
            (line - 1, buffer.line_len(line - 1))
        } else {
            return false;
        };
        self.window.set_cursor(target.0, target.1);
        self.update_goal_col();
        true
    }

    pub fn move_down(&mut self, n: usize) -> bool {
        let (line, _) = self.cursor();
        let last = self.current_buffer().line_count() - 1;
        let target = (line + n).min(last);
        self.move_to_line_keeping_goal(target);
        target != line
    }

    pub fn move_up(&mut self, n: usize) -> bool {
        let (line, _) = self.cursor();
        let target = line.saturating_sub(n);
        self.move_to_line_keeping_goal(target);
        target != line
    }

    pub fn move_to_bol(&mut self) {
        let (line, _) = self.cursor();
        self.window.set_cursor(line, 0);
        self.window.set_goal_col(0);
    }

    pub fn move_to_eol(&mut self) {
        let (line, _) = self.cursor();
        let len = self.current_buffer().line_len(line);
        self.window.set_cursor(line, len);
        self.update_goal_col();
    }

    pub fn page_size(&self) -> usize {
        (self.window.height() as usize).saturating_sub(2).max(1)
    }

    fn cursor(&self) -> (usize, usize) {
        (self.window.cursor_line(), self.window.cursor_col())
    }

    fn move_to_line_keeping_goal(&mut self, line: usize) {
        let goal = self.window.goal_col();
        let col = col_to_byte(self.current_buffer().line(line).unwrap_or(""), goal);
        self.window.set_cursor(line, col);
    }

    fn update_goal_col(&mut self) {
        let (line, col) = self.cursor();
        let text = self.current_buffer().line(line).unwrap_or("");
        self.window.set_goal_col(byte_to_col(text, col));
    }
}

impl Host for Workbench {
    fn active_document(&self) -> Option<&dyn TextDocument> {
        self.buffers.get(self.current).map(|b| b as &dyn TextDocument)
    }

    fn create_decoration_type(&mut self, style: Style) -> DecorationHandle {
        self.decoration_types.push(style);
        DecorationHandle(self.decoration_types.len() - 1)
    }

    fn set_decorations(&mut self, decoration: DecorationHandle, ranges: &[Range]) {
        self.current_buffer_mut().set_decorations(decoration, ranges);
        self.display.force_redraw();
    }

    fn show_information_message(&mut self, message: &str) {
        info!(text = message, "information message");
        self.display.set_message(message);
    }
}
