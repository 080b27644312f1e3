//! # Flashcard Decks
//!
//! The line-oriented `.deck` record format and the on-disk deck directory.
//!
//! ```text
//! Spanish Basics          <- first line: deck title
//! Q: hola                 <- question
//! A: hello                <- answer
//! D: LOW                  <- difficulty (name or 0..=3)
//! N: 4                    <- times answered
//! -                       <- end of record
//! ```
//!
//! The UI never parses this format itself; scenes receive in-memory `Deck`s.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use log::{debug, info, warn};

pub const DECK_EXTENSION: &str = "deck";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Difficulty {
    #[default]
    Unknown,
    Low,
    Medium,
    High,
}

impl Difficulty {
    /// Parse a `D:` field. Accepts the names and the legacy numeric codes.
    pub fn parse(field: &str) -> Option<Self> {
        match field.trim().to_ascii_uppercase().as_str() {
            "UNKNOWN" | "0" => Some(Difficulty::Unknown),
            "LOW" | "1" => Some(Difficulty::Low),
            "MEDIUM" | "2" => Some(Difficulty::Medium),
            "HIGH" | "3" => Some(Difficulty::High),
            _ => None,
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            Difficulty::Unknown => "UNKNOWN",
            Difficulty::Low => "LOW",
            Difficulty::Medium => "MEDIUM",
            Difficulty::High => "HIGH",
        }
    }

    /// How hard the card felt, for study ordering (higher = study first).
    pub fn priority(self) -> u8 {
        match self {
            Difficulty::High => 3,
            Difficulty::Medium => 2,
            Difficulty::Unknown => 1,
            Difficulty::Low => 0,
        }
    }
}

impl fmt::Display for Difficulty {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct FlashCard {
    pub question: String,
    pub answer: String,
    pub difficulty: Difficulty,
    pub times_answered: u32,
}

impl FlashCard {
    pub fn new(question: impl Into<String>, answer: impl Into<String>) -> Self {
        Self {
            question: question.into(),
            answer: answer.into(),
            ..Default::default()
        }
    }

    fn is_blank(&self) -> bool {
        self.question.is_empty() && self.answer.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Deck {
    pub name: String,
    pub cards: Vec<FlashCard>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            cards: Vec::new(),
        }
    }

    /// File name this deck is stored under: the name lowercased, runs of
    /// non-alphanumerics collapsed to `_`.
    pub fn file_name(&self) -> String {
        let mut slug = String::with_capacity(self.name.len());
        for c in self.name.trim().chars() {
            if c.is_ascii_alphanumeric() {
                slug.push(c.to_ascii_lowercase());
            } else if !slug.ends_with('_') {
                slug.push('_');
            }
        }
        let slug = slug.trim_matches('_');
        let slug = if slug.is_empty() { "untitled" } else { slug };
        format!("{slug}.{DECK_EXTENSION}")
    }
}

// ============================================================================
// Error Type
// ============================================================================

#[derive(Debug)]
pub enum DeckError {
    Io(io::Error),
    Empty,
    Parse { line: usize, reason: String },
}

impl fmt::Display for DeckError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            DeckError::Io(e) => write!(f, "deck I/O error: {e}"),
            DeckError::Empty => write!(f, "deck file has no title line"),
            DeckError::Parse { line, reason } => write!(f, "deck parse error on line {line}: {reason}"),
        }
    }
}

impl std::error::Error for DeckError {}

impl From<io::Error> for DeckError {
    fn from(e: io::Error) -> Self {
        DeckError::Io(e)
    }
}

// ============================================================================
// Format
// ============================================================================

/// Parse the text of a `.deck` file.
pub fn parse_deck(text: &str) -> Result<Deck, DeckError> {
    let mut lines = text.lines().enumerate();
    let name = match lines.next() {
        Some((_, title)) if !title.trim().is_empty() => title.trim().to_string(),
        _ => return Err(DeckError::Empty),
    };

    let mut deck = Deck::new(name);
    let mut card = FlashCard::default();

    for (index, raw) in lines {
        let line = raw.trim_end();
        if line.trim() == "-" {
            let finished = std::mem::take(&mut card);
            if !finished.is_blank() {
                deck.cards.push(finished);
            }
            continue;
        }

        if let Some(question) = line.strip_prefix("Q:") {
            card.question = question.trim().to_string();
        } else if let Some(answer) = line.strip_prefix("A:") {
            card.answer = answer.trim().to_string();
        } else if let Some(difficulty) = line.strip_prefix("D:") {
            card.difficulty = Difficulty::parse(difficulty).ok_or_else(|| DeckError::Parse {
                line: index + 1,
                reason: format!("unknown difficulty '{}'", difficulty.trim()),
            })?;
        } else if let Some(count) = line.strip_prefix("N:") {
            card.times_answered = count.trim().parse().map_err(|_| DeckError::Parse {
                line: index + 1,
                reason: format!("bad answer count '{}'", count.trim()),
            })?;
        } else if !line.trim().is_empty() {
            debug!("Ignoring deck line {}: {:?}", index + 1, line);
        }
    }

    // A trailing record without its `-` terminator still counts.
    if !card.is_blank() {
        deck.cards.push(card);
    }

    Ok(deck)
}

/// Serialize a deck back to the `.deck` format.
pub fn render_deck(deck: &Deck) -> String {
    let mut out = String::new();
    out.push_str(&deck.name);
    out.push('\n');
    for card in &deck.cards {
        out.push_str(&format!(
            "Q: {}\nA: {}\nD: {}\nN: {}\n-\n",
            card.question, card.answer, card.difficulty, card.times_answered
        ));
    }
    out
}

// ============================================================================
// Deck Directory
// ============================================================================

/// Load every `*.deck` file in `dir`, sorted by file name.
///
/// A missing directory yields no decks. Files that fail to read or parse are
/// skipped with a warning.
pub fn load_decks(dir: &Path) -> Vec<Deck> {
    let entries = match fs::read_dir(dir) {
        Ok(entries) => entries,
        Err(e) => {
            warn!("Cannot read deck directory {}: {}", dir.display(), e);
            return Vec::new();
        }
    };

    let mut paths: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok().map(|e| e.path()))
        .filter(|path| path.is_file() && path.extension().is_some_and(|ext| ext == DECK_EXTENSION))
        .collect();
    paths.sort();

    let mut decks = Vec::with_capacity(paths.len());
    for path in paths {
        match fs::read_to_string(&path).map_err(DeckError::from).and_then(|text| parse_deck(&text)) {
            Ok(deck) => {
                debug!("Loaded deck '{}' ({} cards) from {}", deck.name, deck.cards.len(), path.display());
                decks.push(deck);
            }
            Err(e) => warn!("Skipping deck {}: {}", path.display(), e),
        }
    }
    info!("Loaded {} decks from {}", decks.len(), dir.display());
    decks
}

/// Write `deck` into `dir`, creating the directory if needed.
pub fn save_deck(dir: &Path, deck: &Deck) -> Result<PathBuf, DeckError> {
    fs::create_dir_all(dir)?;
    let path = dir.join(deck.file_name());
    let tmp = path.with_extension("deck.tmp");
    fs::write(&tmp, render_deck(deck))?;
    fs::rename(&tmp, &path)?;
    info!("Saved deck '{}' to {}", deck.name, path.display());
    Ok(path)
}

/// Remove the file backing `deck`. A file that is already gone is not an error.
pub fn delete_deck(dir: &Path, deck: &Deck) -> Result<(), DeckError> {
    let path = dir.join(deck.file_name());
    match fs::remove_file(&path) {
        Ok(()) => {
            info!("Deleted deck file {}", path.display());
            Ok(())
        }
        Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e.into()),
    }
}
