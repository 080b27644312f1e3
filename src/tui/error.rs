//! Error types for the scene framework.

use std::fmt;
use std::io;

use super::assets::AssetError;
use crate::core::deck::DeckError;

/// A named menu could not be used as asked.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuError {
    NotFound(String),
    WrongKind { name: String, expected: &'static str },
}

impl fmt::Display for MenuError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            MenuError::NotFound(name) => write!(f, "no menu named '{name}'"),
            MenuError::WrongKind { name, expected } => write!(f, "menu '{name}' is not a {expected} menu"),
        }
    }
}

impl std::error::Error for MenuError {}

/// Anything that can go wrong during a tick.
#[derive(Debug)]
pub enum UiError {
    Io(io::Error),
    Menu(MenuError),
    Asset(AssetError),
    Deck(DeckError),
    /// A scene was asked to open a deck index the library doesn't have.
    NoSuchDeck(usize),
}

impl fmt::Display for UiError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            UiError::Io(e) => write!(f, "terminal I/O error: {e}"),
            UiError::Menu(e) => write!(f, "menu error: {e}"),
            UiError::Asset(e) => write!(f, "asset error: {e}"),
            UiError::Deck(e) => write!(f, "deck error: {e}"),
            UiError::NoSuchDeck(index) => write!(f, "no deck at index {index}"),
        }
    }
}

impl std::error::Error for UiError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            UiError::Io(e) => Some(e),
            UiError::Menu(e) => Some(e),
            UiError::Asset(e) => Some(e),
            UiError::Deck(e) => Some(e),
            UiError::NoSuchDeck(_) => None,
        }
    }
}

impl From<io::Error> for UiError {
    fn from(e: io::Error) -> Self {
        UiError::Io(e)
    }
}

impl From<MenuError> for UiError {
    fn from(e: MenuError) -> Self {
        UiError::Menu(e)
    }
}

impl From<AssetError> for UiError {
    fn from(e: AssetError) -> Self {
        UiError::Asset(e)
    }
}

impl From<DeckError> for UiError {
    fn from(e: DeckError) -> Self {
        UiError::Deck(e)
    }
}

impl UiError {
    /// The scripted key source ran dry. Only headless consoles report this.
    pub fn is_input_exhausted(&self) -> bool {
        matches!(self, UiError::Io(e) if e.kind() == io::ErrorKind::UnexpectedEof)
    }
}
