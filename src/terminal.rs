//! Terminal abstraction using crossterm

use std::io::{self, Stdout, Write};

use crossterm::{
    cursor,
    event::{self, Event, KeyEvent},
    execute, queue,
    style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor},
    terminal::{self, ClearType},
};

use crate::error::Result;
use crate::style::Style;

/// What the event loop gets from the terminal
pub enum TermEvent {
    Key(KeyEvent),
    Resize(u16, u16),
}

/// Raw-mode terminal on the alternate screen; restored on drop
pub struct Terminal {
    out: Stdout,
    cols: u16,
    rows: u16,
}

impl Terminal {
    /// Enter raw mode and the alternate screen
    pub fn new() -> Result<Self> {
        terminal::enable_raw_mode()?;
        let (cols, rows) = terminal::size()?;
        let mut out = io::stdout();
        execute!(out, terminal::EnterAlternateScreen, cursor::Hide)?;
        Ok(Self { out, cols, rows })
    }

    pub fn cols(&self) -> u16 {
        self.cols
    }

    pub fn rows(&self) -> u16 {
        self.rows
    }

    pub fn clear_screen(&mut self) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::All))?;
        Ok(())
    }

    pub fn clear_to_eol(&mut self) -> Result<()> {
        queue!(self.out, terminal::Clear(ClearType::UntilNewLine))?;
        Ok(())
    }

    /// Move cursor to position (0-indexed)
    pub fn move_cursor(&mut self, row: u16, col: u16) -> Result<()> {
        queue!(self.out, cursor::MoveTo(col, row))?;
        Ok(())
    }

    pub fn write_str(&mut self, s: &str) -> Result<()> {
        queue!(self.out, Print(s))?;
        Ok(())
    }

    pub fn flush(&mut self) -> Result<()> {
        self.out.flush()?;
        Ok(())
    }

    pub fn set_cursor_visible(&mut self, visible: bool) -> Result<()> {
        if visible {
            queue!(self.out, cursor::Show)?;
        } else {
            queue!(self.out, cursor::Hide)?;
        }
        Ok(())
    }

    /// Wait for the next key press or resize
    pub fn read_event(&mut self) -> Result<TermEvent> {
        loop {
            match event::read()? {
                Event::Key(key_event) => return Ok(TermEvent::Key(key_event)),
                Event::Resize(cols, rows) => {
                    self.cols = cols;
                    self.rows = rows;
                    return Ok(TermEvent::Resize(cols, rows));
                }
                _ => {}
            }
        }
    }

    /// Apply colors and attributes for the text that follows
    pub fn apply_style(&mut self, style: &Style) -> Result<()> {
        queue!(
            self.out,
            SetForegroundColor(style.fg.to_term()),
            SetBackgroundColor(style.bg.to_term())
        )?;
        if style.bold {
            queue!(self.out, SetAttribute(Attribute::Bold))?;
        }
        if style.reverse {
            queue!(self.out, SetAttribute(Attribute::Reverse))?;
        }
        Ok(())
    }

    pub fn set_reverse(&mut self, enabled: bool) -> Result<()> {
        let attr = if enabled { Attribute::Reverse } else { Attribute::NoReverse };
        queue!(self.out, SetAttribute(attr))?;
        Ok(())
    }

    pub fn set_dim(&mut self, enabled: bool) -> Result<()> {
        let attr = if enabled { Attribute::Dim } else { Attribute::NormalIntensity };
        queue!(self.out, SetAttribute(attr))?;
        Ok(())
    }

    pub fn reset_attributes(&mut self) -> Result<()> {
        queue!(self.out, SetAttribute(Attribute::Reset))?;
        Ok(())
    }

    pub fn beep(&mut self) -> Result<()> {
        queue!(self.out, Print('\x07'))?;
        self.flush()
    }
}

impl Drop for Terminal {
    fn drop(&mut self) {
        let _ = execute!(self.out, cursor::Show, terminal::LeaveAlternateScreen);
        let _ = terminal::disable_raw_mode();
    }
}
