//! Keyboard input decoding.
//!
//! Two sources feed the same [`Key`] vocabulary: crossterm key events from a
//! real terminal, and raw console scan codes (a byte stream where arrows arrive
//! as a prefix byte followed by a second byte), used by scripted input.

use crossterm::event::{KeyCode, KeyEvent, KeyEventKind};

/// Bytes that announce a two-byte arrow sequence.
pub const ARROW_PREFIXES: [u8; 2] = [0x00, 0xE0];

pub const SCAN_UP: u8 = 72;
pub const SCAN_DOWN: u8 = 80;
pub const SCAN_LEFT: u8 = 75;
pub const SCAN_RIGHT: u8 = 77;

pub const SCAN_ENTER: u8 = 13;
pub const SCAN_ESCAPE: u8 = 27;
pub const SCAN_BACKSPACE: u8 = 8;

/// Arrow direction. The discriminants are the values menus historically
/// used for linear navigation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[repr(i8)]
pub enum Direction {
    Up = -1,
    Down = 1,
    Left = 4,
    Right = 5,
}

impl Direction {
    /// `(row delta, column delta)` for grid navigation.
    pub fn grid_delta(self) -> (i32, i32) {
        match self {
            Direction::Up => (-1, 0),
            Direction::Down => (1, 0),
            Direction::Left => (0, -1),
            Direction::Right => (0, 1),
        }
    }

    pub fn code(self) -> i8 {
        self as i8
    }

    /// Up and Left move backwards through a linear menu.
    pub fn is_backward(self) -> bool {
        matches!(self, Direction::Up | Direction::Left)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    /// Printable ASCII (32..=126).
    Char(char),
    Enter,
    Escape,
    Backspace,
    Arrow(Direction),
    Other,
}

impl Key {
    pub fn is_space(self) -> bool {
        self == Key::Char(' ')
    }

    /// Lowercased letter for case-insensitive shortcuts.
    pub fn letter(self) -> Option<char> {
        match self {
            Key::Char(c) if c.is_ascii_alphabetic() => Some(c.to_ascii_lowercase()),
            _ => None,
        }
    }
}

/// Stateful decoder for the scan-code byte stream.
#[derive(Debug, Default)]
pub struct ScanDecoder {
    pending_prefix: bool,
}

impl ScanDecoder {
    pub fn new() -> Self {
        Self::default()
    }

    /// Feed one byte. Returns `None` only while waiting for the second byte
    /// of an arrow sequence.
    pub fn feed(&mut self, byte: u8) -> Option<Key> {
        if self.pending_prefix {
            self.pending_prefix = false;
            return Some(match byte {
                SCAN_UP => Key::Arrow(Direction::Up),
                SCAN_DOWN => Key::Arrow(Direction::Down),
                SCAN_LEFT => Key::Arrow(Direction::Left),
                SCAN_RIGHT => Key::Arrow(Direction::Right),
                _ => Key::Other,
            });
        }

        if ARROW_PREFIXES.contains(&byte) {
            self.pending_prefix = true;
            return None;
        }

        Some(match byte {
            SCAN_ENTER | b'\n' => Key::Enter,
            SCAN_ESCAPE => Key::Escape,
            SCAN_BACKSPACE | 127 => Key::Backspace,
            32..=126 => Key::Char(byte as char),
            _ => Key::Other,
        })
    }

    pub fn is_pending(&self) -> bool {
        self.pending_prefix
    }
}

/// Decode a complete byte sequence. A dangling prefix byte at the end is dropped.
pub fn decode_scan_codes(bytes: &[u8]) -> Vec<Key> {
    let mut decoder = ScanDecoder::new();
    bytes.iter().filter_map(|&b| decoder.feed(b)).collect()
}

/// Map a crossterm key event. Release/repeat events are ignored.
pub fn key_from_crossterm(event: &KeyEvent) -> Option<Key> {
    if event.kind != KeyEventKind::Press {
        return None;
    }
    let key = match event.code {
        KeyCode::Char(c) if (' '..='~').contains(&c) => Key::Char(c),
        KeyCode::Enter => Key::Enter,
        KeyCode::Esc => Key::Escape,
        KeyCode::Backspace => Key::Backspace,
        KeyCode::Up => Key::Arrow(Direction::Up),
        KeyCode::Down => Key::Arrow(Direction::Down),
        KeyCode::Left => Key::Arrow(Direction::Left),
        KeyCode::Right => Key::Arrow(Direction::Right),
        _ => Key::Other,
    };
    log::debug!("Key event: {:?} -> {:?}", event.code, key);
    Some(key)
}
