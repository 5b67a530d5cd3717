//! Window representation - a viewport onto the focused buffer

/// Viewport and cursor for the text area
#[derive(Debug, Clone)]
pub struct Window {
    /// First visible line
    top_line: usize,
    /// Cursor line (0-indexed)
    cursor_line: usize,
    /// Cursor column (byte offset within line)
    cursor_col: usize,
    /// Number of text rows (excluding mode line)
    height: u16,
    /// Goal display column for vertical movement
    goal_col: usize,
}

impl Window {
    pub fn new(height: u16) -> Self {
        Self {
            top_line: 0,
            cursor_line: 0,
            cursor_col: 0,
            height: height.max(1),
            goal_col: 0,
        }
    }

    /// Reset the viewport for a freshly focused buffer
    pub fn reset(&mut self) {
        self.top_line = 0;
        self.cursor_line = 0;
        self.cursor_col = 0;
        self.goal_col = 0;
    }

    pub fn top_line(&self) -> usize {
        self.top_line
    }

    pub fn cursor_line(&self) -> usize {
        self.cursor_line
    }

    pub fn cursor_col(&self) -> usize {
        self.cursor_col
    }

    pub fn set_cursor(&mut self, line: usize, col: usize) {
        self.cursor_line = line;
        self.cursor_col = col;
        self.ensure_cursor_visible();
    }

    pub fn goal_col(&self) -> usize {
        self.goal_col
    }

    pub fn set_goal_col(&mut self, col: usize) {
        self.goal_col = col;
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn set_height(&mut self, height: u16) {
        self.height = height.max(1);
        self.ensure_cursor_visible();
    }

    /// Scroll so the cursor line is on screen
    pub fn ensure_cursor_visible(&mut self) {
        let height = self.height as usize;
        if self.cursor_line < self.top_line {
            self.top_line = self.cursor_line;
        } else if self.cursor_line >= self.top_line + height {
            self.top_line = self.cursor_line + 1 - height;
        }
    }

    /// Put the cursor line in the middle of the window
    pub fn recenter(&mut self) {
        self.top_line = self.cursor_line.saturating_sub(self.height as usize / 2);
    }
}
