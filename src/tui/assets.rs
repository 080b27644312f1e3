//! # Art Assets
//!
//! Named, positioned art looked up at draw time.
//!
//! - [`PlainArt`]: rows of text drawn as-is.
//! - [`ColorArt`]: a grid of 256-color palette indices. Each cell paints two
//!   blank columns with that color as foreground and background, so a cell
//!   reads as a square block.
//!
//! The built-in catalog is embedded at compile time from `assets/art/`
//! (`*.txt` plain, `*.ans` color) by `build.rs`.

use std::collections::HashMap;
use std::fmt;
use std::io;

use log::{debug, warn};
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

use super::console::Console;
use super::surface::{Surface, centered_x};

mod embedded {
    include!(concat!(env!("OUT_DIR"), "/art_assets.rs"));
}

#[derive(Debug)]
pub enum AssetError {
    NotFound(String),
    Parse { name: String, line: usize, reason: String },
}

impl fmt::Display for AssetError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            AssetError::NotFound(name) => write!(f, "no asset named '{name}'"),
            AssetError::Parse { name, line, reason } => {
                write!(f, "asset '{name}' line {line}: {reason}")
            }
        }
    }
}

impl std::error::Error for AssetError {}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PlainArt {
    name: String,
    rows: Vec<String>,
    x: u16,
    y: u16,
}

impl PlainArt {
    pub fn new(name: impl Into<String>, rows: Vec<String>) -> Self {
        Self {
            name: name.into(),
            rows,
            x: 0,
            y: 0,
        }
    }

    /// One row per line. A leading blank line (from a raw string literal) is dropped.
    pub fn from_text(name: impl Into<String>, text: &str) -> Self {
        let text = text.strip_prefix('\n').unwrap_or(text);
        Self::new(name, text.lines().map(str::to_string).collect())
    }

    pub fn rows(&self) -> &[String] {
        &self.rows
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColorArt {
    name: String,
    cells: Vec<Vec<u8>>,
    x: u16,
    y: u16,
}

impl ColorArt {
    pub fn new(name: impl Into<String>, cells: Vec<Vec<u8>>) -> Self {
        Self {
            name: name.into(),
            cells,
            x: 0,
            y: 0,
        }
    }

    /// One row per line, palette indices separated by commas or whitespace.
    /// Blank lines are skipped.
    pub fn parse(name: impl Into<String>, text: &str) -> Result<Self, AssetError> {
        let name = name.into();
        let mut cells = Vec::new();
        for (index, line) in text.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let row = line
                .split(|c: char| c == ',' || c.is_whitespace())
                .filter(|token| !token.is_empty())
                .map(|token| {
                    token.parse::<u8>().map_err(|_| AssetError::Parse {
                        name: name.clone(),
                        line: index + 1,
                        reason: format!("'{token}' is not a color index"),
                    })
                })
                .collect::<Result<Vec<u8>, AssetError>>()?;
            cells.push(row);
        }
        Ok(Self::new(name, cells))
    }

    pub fn cells(&self) -> &[Vec<u8>] {
        &self.cells
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Asset {
    Plain(PlainArt),
    Color(ColorArt),
}

impl Asset {
    pub fn name(&self) -> &str {
        match self {
            Asset::Plain(art) => &art.name,
            Asset::Color(art) => &art.name,
        }
    }

    /// Width in terminal columns.
    pub fn width(&self) -> u16 {
        match self {
            Asset::Plain(art) => art.rows.iter().map(|row| row.width()).max().unwrap_or(0) as u16,
            Asset::Color(art) => (art.cells.iter().map(Vec::len).max().unwrap_or(0) * 2) as u16,
        }
    }

    pub fn height(&self) -> u16 {
        match self {
            Asset::Plain(art) => art.rows.len() as u16,
            Asset::Color(art) => art.cells.len() as u16,
        }
    }

    pub fn position(&self) -> (u16, u16) {
        match self {
            Asset::Plain(art) => (art.x, art.y),
            Asset::Color(art) => (art.x, art.y),
        }
    }

    pub fn set_position(&mut self, x: u16, y: u16) {
        match self {
            Asset::Plain(art) => (art.x, art.y) = (x, y),
            Asset::Color(art) => (art.x, art.y) = (x, y),
        }
    }

    fn fits(&self, width: u16, height: u16) -> bool {
        let (x, y) = self.position();
        u32::from(x) + u32::from(self.width()) <= u32::from(width)
            && u32::from(y) + u32::from(self.height()) <= u32::from(height)
    }

    fn blit<C: Console>(&self, surface: &mut Surface<C>) -> io::Result<()> {
        let (x, y) = self.position();
        match self {
            Asset::Plain(art) => {
                for (offset, row) in art.rows.iter().enumerate() {
                    surface.draw_text(row, x, y + offset as u16)?;
                }
            }
            Asset::Color(art) => {
                for (offset, row) in art.cells.iter().enumerate() {
                    let row_y = y + offset as u16;
                    let mut column = x;
                    // One print per run of equal colors
                    for run in row.chunk_by(|a, b| a == b) {
                        let color = Color::Indexed(run[0]);
                        let style = Style::default().fg(color).bg(color);
                        surface.draw_styled_text(&"  ".repeat(run.len()), column, row_y, style)?;
                        column += (run.len() * 2) as u16;
                    }
                }
            }
        }
        Ok(())
    }
}

/// What [`AssetStore::draw`] ended up putting on screen.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArtDraw {
    Drawn,
    /// The art didn't fit, its name was drawn instead.
    Placeholder,
    /// No asset by that name, its name was drawn instead.
    Missing,
}

#[derive(Debug, Default)]
pub struct AssetStore {
    assets: HashMap<String, Asset>,
}

impl AssetStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Last registration of a name wins. Returns the entry it replaced.
    pub fn register(&mut self, asset: Asset) -> Option<Asset> {
        let replaced = self.assets.insert(asset.name().to_string(), asset);
        if let Some(old) = &replaced {
            debug!("Asset '{}' re-registered", old.name());
        }
        replaced
    }

    pub fn lookup(&self, name: &str) -> Result<&Asset, AssetError> {
        self.assets
            .get(name)
            .ok_or_else(|| AssetError::NotFound(name.to_string()))
    }

    pub fn len(&self) -> usize {
        self.assets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assets.is_empty()
    }

    /// Move the named asset to `(x, y)` and draw it.
    ///
    /// Art that would cross the surface edge, or that isn't registered, is
    /// replaced by `[name]` centered on the surface.
    pub fn draw<C: Console>(&mut self, name: &str, x: u16, y: u16, surface: &mut Surface<C>) -> io::Result<ArtDraw> {
        let Some(asset) = self.assets.get_mut(name) else {
            warn!("Asset '{}' not found, drawing placeholder", name);
            draw_placeholder(name, surface)?;
            return Ok(ArtDraw::Missing);
        };
        asset.set_position(x, y);

        if asset.fits(surface.width(), surface.height()) {
            asset.blit(surface)?;
            return Ok(ArtDraw::Drawn);
        }

        debug!(
            "Asset '{}' ({}x{}) at ({}, {}) exceeds {}x{}, drawing placeholder",
            name,
            asset.width(),
            asset.height(),
            x,
            y,
            surface.width(),
            surface.height()
        );
        draw_placeholder(name, surface)?;
        Ok(ArtDraw::Placeholder)
    }
}

fn draw_placeholder<C: Console>(name: &str, surface: &mut Surface<C>) -> io::Result<()> {
    let label = format!("[{name}]");
    let label_x = centered_x(surface.width(), label.width());
    surface.draw_text(&label, label_x, surface.height() / 2)
}

/// Store holding every art file compiled into the binary.
pub fn builtin_store() -> AssetStore {
    let mut store = AssetStore::new();
    for (name, text) in embedded::PLAIN_ART {
        store.register(Asset::Plain(PlainArt::from_text(*name, text)));
    }
    for (name, text) in embedded::COLOR_ART {
        match ColorArt::parse(*name, text) {
            Ok(art) => {
                store.register(Asset::Color(art));
            }
            Err(e) => warn!("Skipping built-in art: {}", e),
        }
    }
    debug!("Built-in asset store holds {} assets", store.len());
    store
}
