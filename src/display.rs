//! Display rendering

use unicode_width::UnicodeWidthChar;

use crate::buffer::{byte_to_col, Buffer};
use crate::error::Result;
use crate::style::{Span, Style};
use crate::terminal::Terminal;
use crate::window::Window;

/// Display state
pub struct Display {
    /// Whether a full redraw is needed
    needs_redraw: bool,
    /// Message to show in the minibuffer (bottom line)
    message: Option<String>,
    /// Whether to show line numbers
    pub show_line_numbers: bool,
}

impl Display {
    pub fn new(show_line_numbers: bool) -> Self {
        Self {
            needs_redraw: true,
            message: None,
            show_line_numbers,
        }
    }

    pub fn toggle_line_numbers(&mut self) {
        self.show_line_numbers = !self.show_line_numbers;
        self.needs_redraw = true;
    }

    /// Width of the line number gutter, separator included
    fn gutter_width(&self, line_count: usize) -> usize {
        if !self.show_line_numbers {
            return 0;
        }
        line_count.max(1).to_string().len().max(3) + 1
    }

    pub fn force_redraw(&mut self) {
        self.needs_redraw = true;
    }

    pub fn set_message(&mut self, msg: impl Into<String>) {
        self.message = Some(msg.into());
    }

    pub fn clear_message(&mut self) {
        self.message = None;
    }

    pub fn message(&self) -> Option<&str> {
        self.message.as_deref()
    }

    /// Draw the text area, mode line and minibuffer
    pub fn render(
        &mut self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        styles: &[Style],
    ) -> Result<()> {
        let cols = terminal.cols() as usize;
        let rows = terminal.rows();

        terminal.set_cursor_visible(false)?;
        if self.needs_redraw {
            terminal.clear_screen()?;
        }

        let gutter = self.gutter_width(buffer.line_count());
        let text_cols = cols.saturating_sub(gutter);

        for row in 0..window.height() {
            let line_idx = window.top_line() + row as usize;
            terminal.move_cursor(row, 0)?;

            match buffer.line(line_idx) {
                Some(text) => {
                    if self.show_line_numbers {
                        terminal.set_dim(true)?;
                        terminal.write_str(&format!("{:>width$} ", line_idx + 1, width = gutter - 1))?;
                        terminal.set_dim(false)?;
                    }
                    let spans = buffer.line_spans(line_idx, styles);
                    render_line(terminal, text, &spans, text_cols)?;
                }
                None => {
                    terminal.write_str(&" ".repeat(gutter))?;
                    terminal.set_dim(true)?;
                    terminal.write_str("~")?;
                    terminal.set_dim(false)?;
                }
            }
            terminal.clear_to_eol()?;
        }

        self.render_mode_line(terminal, buffer, window, window.height(), cols)?;
        self.render_minibuffer(terminal, rows.saturating_sub(1), cols)?;

        // Hardware cursor
        let cursor_line = window.cursor_line();
        let display_col = buffer
            .line(cursor_line)
            .map_or(0, |text| byte_to_col(text, window.cursor_col()));
        let screen_row = cursor_line.saturating_sub(window.top_line()) as u16;
        let screen_col = (gutter + display_col).min(cols.saturating_sub(1)) as u16;
        terminal.move_cursor(screen_row, screen_col)?;

        terminal.set_cursor_visible(true)?;
        terminal.flush()?;
        self.needs_redraw = false;
        Ok(())
    }

    fn render_mode_line(
        &self,
        terminal: &mut Terminal,
        buffer: &Buffer,
        window: &Window,
        row: u16,
        cols: usize,
    ) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        terminal.set_reverse(true)?;

        let modified = if buffer.is_modified() { "**" } else { "--" };
        let filename = buffer
            .filename()
            .map(|p| p.display().to_string())
            .unwrap_or_else(|| "no file".to_string());
        let line_count = buffer.line_count();
        let cursor_line = window.cursor_line() + 1;
        let percent = if line_count <= 1 {
            "All".to_string()
        } else if cursor_line == 1 {
            "Top".to_string()
        } else if cursor_line >= line_count {
            "Bot".to_string()
        } else {
            format!("{}%", cursor_line * 100 / line_count)
        };

        let mode_line = format!(
            "{}= paritylight: {} ({}) L{} {} ",
            modified,
            buffer.name(),
            filename,
            cursor_line,
            percent
        );
        let mut padded = truncate_to_width(&mode_line, cols);
        let width: usize = padded.chars().map(|c| c.width().unwrap_or(1)).sum();
        padded.push_str(&"-".repeat(cols.saturating_sub(width)));

        terminal.write_str(&padded)?;
        terminal.set_reverse(false)?;
        Ok(())
    }

    fn render_minibuffer(&self, terminal: &mut Terminal, row: u16, cols: usize) -> Result<()> {
        terminal.move_cursor(row, 0)?;
        if let Some(msg) = &self.message {
            terminal.write_str(&truncate_to_width(msg, cols))?;
        }
        terminal.clear_to_eol()?;
        Ok(())
    }
}

impl Default for Display {
    fn default() -> Self {
        Self::new(false)
    }
}

/// Write one line, switching style at span edges, clipped to `max_cols`
fn render_line(terminal: &mut Terminal, text: &str, spans: &[Span], max_cols: usize) -> Result<()> {
    let mut used = 0;
    for (segment, style) in segments(text, spans) {
        if used >= max_cols {
            break;
        }
        let clipped = truncate_to_width(segment, max_cols - used);
        used += clipped.chars().map(|c| c.width().unwrap_or(1)).sum::<usize>();
        match style {
            Some(style) => {
                terminal.apply_style(&style)?;
                terminal.write_str(&clipped)?;
                terminal.reset_attributes()?;
            }
            None => terminal.write_str(&clipped)?,
        }
    }
    Ok(())
}

/// Split a line into plain and styled pieces. Spans must be sorted and
/// sit on char boundaries; overlaps are cut at the earlier span's end.
fn segments<'a>(text: &'a str, spans: &[Span]) -> Vec<(&'a str, Option<Style>)> {
    let mut out = Vec::new();
    let mut pos = 0;
    for span in spans {
        let start = span.start.max(pos);
        let end = span.end.min(text.len());
        if start >= end {
            continue;
        }
        if pos < start {
            out.push((&text[pos..start], None));
        }
        out.push((&text[start..end], Some(span.style)));
        pos = end;
    }
    if pos < text.len() {
        out.push((&text[pos..], None));
    }
    out
}

/// Truncate a string to fit within a display width
fn truncate_to_width(s: &str, max_width: usize) -> String {
    let mut result = String::new();
    let mut width = 0;
    for ch in s.chars() {
        let ch_width = ch.width().unwrap_or(1);
        if width + ch_width > max_width {
            break;
        }
        result.push(ch);
        width += ch_width;
    }
    result
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::style::Color;

    #[test]
    fn test_segments_without_spans() {
        assert_eq!(segments("abc", &[]), vec![("abc", None)]);
        assert!(segments("", &[]).is_empty());
    }

    #[test]
    fn test_segments_alternate() {
        let even = Style::bg(Color::Green);
        let odd = Style::bg(Color::Magenta);
        let spans = [Span::new(0, 1, odd), Span::new(2, 4, even)];
        assert_eq!(
            segments("1 22 x", &spans),
            vec![("1", Some(odd)), (" ", None), ("22", Some(even)), (" x", None)]
        );
    }

    #[test]
    fn test_segments_overlap_is_cut() {
        let a = Style::bg(Color::Green);
        let b = Style::bg(Color::Blue);
        let spans = [Span::new(0, 3, a), Span::new(2, 5, b)];
        assert_eq!(
            segments("abcdef", &spans),
            vec![("abc", Some(a)), ("de", Some(b)), ("f", None)]
        );
    }

    #[test]
    fn test_truncate_to_width() {
        assert_eq!(truncate_to_width("hello", 3), "hel");
        assert_eq!(truncate_to_width("日本", 3), "日");
        assert_eq!(truncate_to_width("ok", 10), "ok");
    }

    #[test]
    fn test_gutter_width() {
        let mut display = Display::new(false);
        assert_eq!(display.gutter_width(5000), 0);
        display.toggle_line_numbers();
        assert_eq!(display.gutter_width(5), 4);
        assert_eq!(display.gutter_width(12345), 6);
    }
}
