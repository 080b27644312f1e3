//! # Console
//!
//! The one seam between the scene framework and a terminal. The [`Surface`]
//! draws through a [`Console`]; nothing above it touches crossterm.
//!
//! - [`CrosstermConsole`]: the real terminal, commands queued then flushed.
//! - [`HeadlessConsole`]: an in-memory grid of cells plus a scripted key
//!   queue, for tests and for replaying scan-code input.
//!
//! [`Surface`]: super::surface::Surface

use std::collections::VecDeque;
use std::io::{self, Write};
use std::time::Duration;

use crossterm::cursor::{Hide, MoveTo, Show};
use crossterm::event::{self, Event};
use crossterm::style::{Attribute, Print, SetAttribute, SetBackgroundColor, SetForegroundColor};
use crossterm::terminal::{
    self, Clear, ClearType, EnterAlternateScreen, LeaveAlternateScreen, SetSize,
};
use crossterm::{execute, queue};
use log::{debug, info};
use ratatui::buffer::Buffer;
use ratatui::layout::Rect;
use ratatui::style::{Color, Modifier, Style};

use super::event::{Key, ScanDecoder, key_from_crossterm};

pub trait Console {
    /// Current terminal size as `(width, height)` in cells.
    fn size(&mut self) -> io::Result<(u16, u16)>;
    /// Ask the terminal to take a specific size.
    fn set_size(&mut self, width: u16, height: u16) -> io::Result<()>;
    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()>;
    /// Write `text` at the cursor, advancing it.
    fn print(&mut self, text: &str, style: Style) -> io::Result<()>;
    /// Blank the whole screen in `style` and home the cursor.
    fn clear(&mut self, style: Style) -> io::Result<()>;
    fn show_cursor(&mut self, visible: bool) -> io::Result<()>;
    fn flush(&mut self) -> io::Result<()>;
    /// Block until a key arrives.
    fn read_key(&mut self) -> io::Result<Key>;
    /// Wait up to `timeout` for a key.
    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>>;
}

// ============================================================================
// Real terminal
// ============================================================================

pub struct CrosstermConsole<W: Write> {
    out: W,
}

impl<W: Write> CrosstermConsole<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }
}

impl<W: Write> Console for CrosstermConsole<W> {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        terminal::size()
    }

    fn set_size(&mut self, width: u16, height: u16) -> io::Result<()> {
        queue!(self.out, SetSize(width, height))
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        queue!(self.out, MoveTo(x, y))
    }

    fn print(&mut self, text: &str, style: Style) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_crossterm_color(style.fg.unwrap_or(Color::Reset))),
            SetBackgroundColor(to_crossterm_color(style.bg.unwrap_or(Color::Reset)))
        )?;
        for attribute in attributes(style.add_modifier) {
            queue!(self.out, SetAttribute(attribute))?;
        }
        queue!(self.out, Print(text))
    }

    fn clear(&mut self, style: Style) -> io::Result<()> {
        queue!(
            self.out,
            SetAttribute(Attribute::Reset),
            SetForegroundColor(to_crossterm_color(style.fg.unwrap_or(Color::Reset))),
            SetBackgroundColor(to_crossterm_color(style.bg.unwrap_or(Color::Reset))),
            Clear(ClearType::All),
            MoveTo(0, 0)
        )
    }

    fn show_cursor(&mut self, visible: bool) -> io::Result<()> {
        if visible {
            queue!(self.out, Show)
        } else {
            queue!(self.out, Hide)
        }
    }

    fn flush(&mut self) -> io::Result<()> {
        self.out.flush()
    }

    fn read_key(&mut self) -> io::Result<Key> {
        loop {
            if let Event::Key(key_event) = event::read()? {
                if let Some(key) = key_from_crossterm(&key_event) {
                    return Ok(key);
                }
            }
        }
    }

    fn poll_key(&mut self, timeout: Duration) -> io::Result<Option<Key>> {
        if !event::poll(timeout)? {
            return Ok(None);
        }
        match event::read()? {
            Event::Key(key_event) => Ok(key_from_crossterm(&key_event)),
            _ => Ok(None),
        }
    }
}

fn attributes(modifier: Modifier) -> Vec<Attribute> {
    let mut out = Vec::new();
    if modifier.contains(Modifier::BOLD) {
        out.push(Attribute::Bold);
    }
    if modifier.contains(Modifier::UNDERLINED) {
        out.push(Attribute::Underlined);
    }
    if modifier.contains(Modifier::REVERSED) {
        out.push(Attribute::Reverse);
    }
    out
}

fn to_crossterm_color(color: Color) -> crossterm::style::Color {
    use crossterm::style::Color as C;
    match color {
        Color::Reset => C::Reset,
        Color::Black => C::Black,
        Color::Red => C::DarkRed,
        Color::Green => C::DarkGreen,
        Color::Yellow => C::DarkYellow,
        Color::Blue => C::DarkBlue,
        Color::Magenta => C::DarkMagenta,
        Color::Cyan => C::DarkCyan,
        Color::Gray => C::Grey,
        Color::DarkGray => C::DarkGrey,
        Color::LightRed => C::Red,
        Color::LightGreen => C::Green,
        Color::LightYellow => C::Yellow,
        Color::LightBlue => C::Blue,
        Color::LightMagenta => C::Magenta,
        Color::LightCyan => C::Cyan,
        Color::White => C::White,
        Color::Rgb(r, g, b) => C::Rgb { r, g, b },
        Color::Indexed(i) => C::AnsiValue(i),
    }
}

/// Puts the terminal into raw mode on the alternate screen for its lifetime.
pub struct TerminalGuard;

impl TerminalGuard {
    pub fn new() -> io::Result<Self> {
        terminal::enable_raw_mode()?;
        execute!(io::stdout(), EnterAlternateScreen, Hide)?;
        info!("Terminal modes enabled (raw, alternate screen)");
        Ok(Self)
    }
}

impl Drop for TerminalGuard {
    fn drop(&mut self) {
        let _ = execute!(io::stdout(), LeaveAlternateScreen, Show);
        let _ = terminal::disable_raw_mode();
        info!("Terminal modes restored");
    }
}

// ============================================================================
// Headless
// ============================================================================

/// In-memory console. Draws into a cell buffer; keys come from a script.
pub struct HeadlessConsole {
    buffer: Buffer,
    cursor: (u16, u16),
    cursor_visible: bool,
    /// `None` entries are poll timeouts.
    keys: VecDeque<Option<Key>>,
    decoder: ScanDecoder,
    writes: usize,
}

impl HeadlessConsole {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            buffer: Buffer::empty(Rect::new(0, 0, width, height)),
            cursor: (0, 0),
            cursor_visible: false,
            keys: VecDeque::new(),
            decoder: ScanDecoder::new(),
            writes: 0,
        }
    }

    pub fn push_keys(&mut self, keys: impl IntoIterator<Item = Key>) {
        self.keys.extend(keys.into_iter().map(Some));
    }

    /// Queue `count` poll timeouts. Blocking reads skip over them.
    pub fn push_timeouts(&mut self, count: usize) {
        self.keys.extend(std::iter::repeat_n(None, count));
    }

    /// Queue raw scan-code bytes, decoded the same way a console stream is.
    pub fn push_scan_codes(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            if let Some(key) = self.decoder.feed(byte) {
                self.keys.push_back(Some(key));
            }
        }
    }

    pub fn pending_keys(&self) -> usize {
        self.keys.len()
    }

    /// Simulate the user resizing the terminal window.
    pub fn resize_to(&mut self, width: u16, height: u16) {
        debug!("Headless console resized to {}x{}", width, height);
        self.buffer.resize(Rect::new(0, 0, width, height));
    }

    pub fn row(&self, y: u16) -> String {
        let area = self.buffer.area;
        (0..area.width)
            .filter_map(|x| self.buffer.cell((x, y)))
            .map(|cell| cell.symbol())
            .collect()
    }

    pub fn rows(&self) -> Vec<String> {
        (0..self.buffer.area.height).map(|y| self.row(y)).collect()
    }

    /// Whole screen as one string, rows joined by newlines.
    pub fn text(&self) -> String {
        self.rows().join("\n")
    }

    pub fn cell_style(&self, x: u16, y: u16) -> Option<Style> {
        self.buffer.cell((x, y)).map(|cell| cell.style())
    }

    pub fn cursor(&self) -> (u16, u16) {
        self.cursor
    }

    pub fn cursor_visible(&self) -> bool {
        self.cursor_visible
    }

    /// Number of `print` calls so far.
    pub fn write_count(&self) -> usize {
        self.writes
    }
}

impl Console for HeadlessConsole {
    fn size(&mut self) -> io::Result<(u16, u16)> {
        Ok((self.buffer.area.width, self.buffer.area.height))
    }

    fn set_size(&mut self, width: u16, height: u16) -> io::Result<()> {
        self.resize_to(width, height);
        Ok(())
    }

    fn move_to(&mut self, x: u16, y: u16) -> io::Result<()> {
        self.cursor = (x, y);
        Ok(())
    }

    fn print(&mut self, text: &str, style: Style) -> io::Result<()> {
        self.writes += 1;
        let (mut x, y) = self.cursor;
        for c in text.chars() {
            if let Some(cell) = self.buffer.cell_mut((x, y)) {
                cell.reset();
                cell.set_char(c);
                cell.set_style(style);
            }
            x = x.saturating_add(1);
        }
        self.cursor = (x, y);
        Ok(())
    }

    fn clear(&mut self, style: Style) -> io::Result<()> {
        self.buffer.reset();
        let area = self.buffer.area;
        self.buffer.set_style(area, style);
        self.cursor = (0, 0);
        Ok(())
    }

    fn show_cursor(&mut self, visible: bool) -> io::Result<()> {
        self.cursor_visible = visible;
        Ok(())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }

    fn read_key(&mut self) -> io::Result<Key> {
        while let Some(entry) = self.keys.pop_front() {
            if let Some(key) = entry {
                return Ok(key);
            }
        }
        Err(script_exhausted())
    }

    fn poll_key(&mut self, _timeout: Duration) -> io::Result<Option<Key>> {
        self.keys.pop_front().ok_or_else(script_exhausted)
    }
}

fn script_exhausted() -> io::Error {
    io::Error::new(io::ErrorKind::UnexpectedEof, "key script exhausted")
}
