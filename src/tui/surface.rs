//! # Surface
//!
//! Drawing primitives over a [`Console`]: positioned text, centered and
//! word-wrapped text, boxes, region blanking, and a blocking line editor.
//!
//! There is no off-screen composition. Every call goes straight to the
//! console, so callers decide which regions to repaint (see `scene`).

use std::io;
use std::time::Duration;

use log::debug;
use ratatui::style::Style;
use ratatui::symbols::line;
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use super::console::Console;
use super::event::{Direction, Key};
use crate::core::config::BorderStyle;

/// Returned by [`Surface::get_line`] when the user pressed Escape. Never part
/// of committed input, which is printable ASCII only.
pub const ABORT_SENTINEL: &str = "\u{1b}";

/// Outcome of a line edit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LineInput {
    Committed(String),
    Aborted,
}

impl LineInput {
    pub fn committed(self) -> Option<String> {
        match self {
            LineInput::Committed(text) => Some(text),
            LineInput::Aborted => None,
        }
    }
}

#[derive(Debug, Clone, Copy)]
struct BorderGlyphs {
    horizontal: &'static str,
    vertical: &'static str,
    top_left: &'static str,
    top_right: &'static str,
    bottom_left: &'static str,
    bottom_right: &'static str,
}

impl BorderGlyphs {
    fn for_style(style: BorderStyle) -> Self {
        let set = match style {
            BorderStyle::Plain => line::NORMAL,
            BorderStyle::Rounded => line::ROUNDED,
            BorderStyle::Double => line::DOUBLE,
            BorderStyle::Thick => line::THICK,
        };
        Self {
            horizontal: set.horizontal,
            vertical: set.vertical,
            top_left: set.top_left,
            top_right: set.top_right,
            bottom_left: set.bottom_left,
            bottom_right: set.bottom_right,
        }
    }
}

pub struct Surface<C: Console> {
    console: C,
    width: u16,
    height: u16,
    default_style: Style,
    line_buffer: String,
    border: BorderGlyphs,
}

impl<C: Console> Surface<C> {
    pub fn new(mut console: C, border: BorderStyle) -> io::Result<Self> {
        let (width, height) = console.size()?;
        debug!("Surface created at {}x{}", width, height);
        Ok(Self {
            console,
            width,
            height,
            default_style: Style::default(),
            line_buffer: String::new(),
            border: BorderGlyphs::for_style(border),
        })
    }

    pub fn width(&self) -> u16 {
        self.width
    }

    pub fn height(&self) -> u16 {
        self.height
    }

    pub fn console(&self) -> &C {
        &self.console
    }

    pub fn console_mut(&mut self) -> &mut C {
        &mut self.console
    }

    pub fn default_style(&self) -> Style {
        self.default_style
    }

    // ------------------------------------------------------------------------
    // Size tracking
    // ------------------------------------------------------------------------

    /// Size the terminal reports right now (may differ from the cached size).
    pub fn query_size(&mut self) -> io::Result<(u16, u16)> {
        self.console.size()
    }

    /// Adopt a new size as the surface's own.
    pub fn apply_size(&mut self, width: u16, height: u16) {
        debug!("Surface size {}x{} -> {}x{}", self.width, self.height, width, height);
        self.width = width;
        self.height = height;
    }

    /// Ask the terminal to go back to the cached size.
    pub fn restore_size(&mut self) -> io::Result<()> {
        self.console.set_size(self.width, self.height)
    }

    // ------------------------------------------------------------------------
    // Drawing
    // ------------------------------------------------------------------------

    /// Out-of-range coordinates are clamped to the last row/column.
    pub fn move_cursor(&mut self, x: u16, y: u16) -> io::Result<()> {
        let x = x.min(self.width.saturating_sub(1));
        let y = y.min(self.height.saturating_sub(1));
        self.console.move_to(x, y)
    }

    pub fn draw_text(&mut self, text: &str, x: u16, y: u16) -> io::Result<()> {
        self.draw_styled_text(text, x, y, self.default_style)
    }

    /// Text past the right edge is dropped; rows past the bottom draw nothing.
    pub fn draw_styled_text(&mut self, text: &str, x: u16, y: u16, style: Style) -> io::Result<()> {
        if x >= self.width || y >= self.height || text.is_empty() {
            return Ok(());
        }
        let visible = clip_to_width(text, usize::from(self.width - x));
        self.console.move_to(x, y)?;
        self.console.print(visible, style)
    }

    pub fn draw_centered_text(&mut self, text: &str, y: u16, style: Style) -> io::Result<()> {
        let x = centered_x(self.width, text.width());
        self.draw_styled_text(text, x, y, style)
    }

    /// Greedy word wrap. Returns the number of rows drawn.
    pub fn draw_wrapped_text(&mut self, text: &str, x: u16, y: u16, max_width: u16) -> io::Result<u16> {
        let lines = wrap_words(text, usize::from(max_width));
        for (offset, line) in lines.iter().enumerate() {
            self.draw_text(line, x, y.saturating_add(offset as u16))?;
        }
        Ok(lines.len() as u16)
    }

    /// Overwrite a rectangle with spaces in the default style.
    pub fn blank_region(&mut self, x: u16, y: u16, width: u16, height: u16) -> io::Result<()> {
        if width == 0 {
            return Ok(());
        }
        let blank = " ".repeat(usize::from(width));
        for row in y..y.saturating_add(height) {
            self.draw_text(&blank, x, row)?;
        }
        Ok(())
    }

    /// Fill a rectangle with spaces in `style`.
    pub fn fill_region(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) -> io::Result<()> {
        if width == 0 {
            return Ok(());
        }
        let fill = " ".repeat(usize::from(width));
        for row in y..y.saturating_add(height) {
            self.draw_styled_text(&fill, x, row, style)?;
        }
        Ok(())
    }

    /// Rectangle outline. Boxes smaller than 2x2 draw nothing.
    pub fn draw_box(&mut self, x: u16, y: u16, width: u16, height: u16) -> io::Result<()> {
        self.draw_styled_box(x, y, width, height, self.default_style)
    }

    pub fn draw_styled_box(&mut self, x: u16, y: u16, width: u16, height: u16, style: Style) -> io::Result<()> {
        if width < 2 || height < 2 {
            return Ok(());
        }
        let glyphs = self.border;
        let span = usize::from(width - 2);
        let top = format!("{}{}{}", glyphs.top_left, glyphs.horizontal.repeat(span), glyphs.top_right);
        let bottom = format!("{}{}{}", glyphs.bottom_left, glyphs.horizontal.repeat(span), glyphs.bottom_right);

        self.draw_styled_text(&top, x, y, style)?;
        for row in y + 1..y + height - 1 {
            self.draw_styled_text(glyphs.vertical, x, row, style)?;
            self.draw_styled_text(glyphs.vertical, x + width - 1, row, style)?;
        }
        self.draw_styled_text(&bottom, x, y + height - 1, style)
    }

    pub fn draw_border(&mut self) -> io::Result<()> {
        self.draw_box(0, 0, self.width, self.height)
    }

    pub fn clear(&mut self) -> io::Result<()> {
        self.console.clear(self.default_style)
    }

    pub fn flush(&mut self) -> io::Result<()> {
        self.console.flush()
    }

    // ------------------------------------------------------------------------
    // Input
    // ------------------------------------------------------------------------

    pub fn read_key(&mut self) -> io::Result<Key> {
        self.console.read_key()
    }

    pub fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        self.console.poll_key(timeout)
    }

    /// Blocking line editor at `(x, y)`.
    ///
    /// Returns the typed text on Enter, or [`ABORT_SENTINEL`] on Escape.
    /// Only printable ASCII is accepted, up to `max_length` characters.
    pub fn get_line(&mut self, x: u16, y: u16, max_length: usize) -> io::Result<String> {
        self.line_buffer.clear();
        let mut cursor = 0usize;
        self.console.show_cursor(true)?;

        let result = loop {
            self.redraw_line(x, y, max_length, cursor)?;
            match self.console.read_key()? {
                Key::Enter => break std::mem::take(&mut self.line_buffer),
                Key::Escape => break ABORT_SENTINEL.to_string(),
                Key::Backspace if cursor > 0 => {
                    cursor -= 1;
                    self.line_buffer.remove(cursor);
                }
                Key::Arrow(Direction::Left) => cursor = cursor.saturating_sub(1),
                Key::Arrow(Direction::Right) if cursor < self.line_buffer.len() => cursor += 1,
                Key::Char(c) if is_line_char(c) && self.line_buffer.len() < max_length => {
                    self.line_buffer.insert(cursor, c);
                    cursor += 1;
                }
                _ => {}
            }
        };

        self.console.show_cursor(false)?;
        Ok(result)
    }

    /// [`get_line`](Self::get_line) with the sentinel already checked.
    pub fn prompt_line(&mut self, x: u16, y: u16, max_length: usize) -> io::Result<LineInput> {
        let line = self.get_line(x, y, max_length)?;
        if line == ABORT_SENTINEL {
            Ok(LineInput::Aborted)
        } else {
            Ok(LineInput::Committed(line))
        }
    }

    /// Full repaint of the edit line: blank, buffer, cursor.
    fn redraw_line(&mut self, x: u16, y: u16, max_length: usize, cursor: usize) -> io::Result<()> {
        let field = max_length.min(usize::from(self.width.saturating_sub(x))) as u16;
        self.blank_region(x, y, field, 1)?;
        let text = self.line_buffer.clone();
        self.draw_text(&text, x, y)?;
        self.move_cursor(x.saturating_add(cursor as u16), y)?;
        self.console.flush()
    }
}

fn is_line_char(c: char) -> bool {
    (' '..='~').contains(&c)
}

/// Left column that centers `text_width` cells in `width`.
pub fn centered_x(width: u16, text_width: usize) -> u16 {
    (usize::from(width).saturating_sub(text_width) / 2) as u16
}

/// Longest prefix of `text` that fits in `max` columns.
fn clip_to_width(text: &str, max: usize) -> &str {
    let mut used = 0;
    for (index, c) in text.char_indices() {
        used += c.width().unwrap_or(0);
        if used > max {
            return &text[..index];
        }
    }
    text
}

/// Greedy word wrap. Words longer than `max_width` are kept whole on their
/// own line.
pub fn wrap_words(text: &str, max_width: usize) -> Vec<String> {
    let normalized = text.split_whitespace().collect::<Vec<_>>().join(" ");
    if normalized.is_empty() {
        return Vec::new();
    }
    let options = textwrap::Options::new(max_width.max(1))
        .break_words(false)
        .word_separator(textwrap::WordSeparator::AsciiSpace)
        .wrap_algorithm(textwrap::WrapAlgorithm::FirstFit);
    textwrap::wrap(&normalized, options)
        .into_iter()
        .map(|line| line.into_owned())
        .filter(|line| !line.is_empty())
        .collect()
}
