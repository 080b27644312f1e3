//! # Application Scenes
//!
//! The StudyDungeon screens built on the scene framework. The [`Router`]
//! is the host's scene factory; scenes talk to each other only through
//! [`SceneId`] values and the shared [`Library`].

mod about;
mod browse;
mod edit_cards;
mod edit_decks;
mod main_menu;
mod results;
mod settings;
mod study;

use std::cell::RefCell;
use std::path::{Path, PathBuf};
use std::rc::Rc;

use log::info;

use super::console::Console;
use super::error::UiError;
use super::menu::SelectionPolicy;
use super::scene::{Scene, SceneContext, SceneFactory};
use super::surface::{Surface, wrap_words};
use crate::core::config::StudySettings;
use crate::core::deck::{self, Deck, Difficulty};
use crate::core::study::StudySummary;

pub use about::AboutScene;
pub use browse::BrowseDecksScene;
pub use edit_cards::EditCardsScene;
pub use edit_decks::EditDecksScene;
pub use main_menu::MainMenuScene;
pub use results::ResultsScene;
pub use settings::SettingsScene;
pub use study::StudyScene;

/// Every screen the app can show. Deck payloads are indices into the library.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SceneId {
    MainMenu,
    Settings,
    About,
    BrowseDecks,
    Study { deck: usize },
    Results(StudySummary),
    EditDecks,
    EditCards { deck: usize },
}

/// Actions carried by menu widgets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Command {
    BeginStudy,
    EditDecks,
    Settings,
    About,
    Quit,
    MoreCards,
    FewerCards,
    MoreTime,
    LessTime,
    Defaults,
    Back,
    Rate(Difficulty),
    MainMenu,
    DeckSelection,
}

// ============================================================================
// Library
// ============================================================================

/// Decks and settings shared by every scene.
#[derive(Debug)]
pub struct Library {
    pub decks: Vec<Deck>,
    pub settings: StudySettings,
    deck_dir: PathBuf,
}

pub type SharedLibrary = Rc<RefCell<Library>>;

impl Library {
    pub fn new(deck_dir: impl Into<PathBuf>, decks: Vec<Deck>, settings: StudySettings) -> Self {
        Self {
            decks,
            settings,
            deck_dir: deck_dir.into(),
        }
    }

    /// Read every deck file in `deck_dir`.
    pub fn load(deck_dir: impl Into<PathBuf>, settings: StudySettings) -> Self {
        let deck_dir = deck_dir.into();
        let decks = deck::load_decks(&deck_dir);
        info!("Library loaded {} deck(s) from {}", decks.len(), deck_dir.display());
        Self::new(deck_dir, decks, settings)
    }

    pub fn shared(self) -> SharedLibrary {
        Rc::new(RefCell::new(self))
    }

    pub fn deck_dir(&self) -> &Path {
        &self.deck_dir
    }

    pub fn deck(&self, index: usize) -> Result<&Deck, UiError> {
        self.decks.get(index).ok_or(UiError::NoSuchDeck(index))
    }

    pub fn deck_mut(&mut self, index: usize) -> Result<&mut Deck, UiError> {
        self.decks.get_mut(index).ok_or(UiError::NoSuchDeck(index))
    }

    /// Whether another deck would be written to the same file as `name`.
    pub fn name_taken(&self, name: &str, except: Option<usize>) -> bool {
        let file_name = Deck::new(name).file_name();
        self.decks
            .iter()
            .enumerate()
            .any(|(i, deck)| Some(i) != except && deck.file_name() == file_name)
    }

    /// Write one deck back to its file.
    pub fn save(&self, index: usize) -> Result<(), UiError> {
        let path = deck::save_deck(&self.deck_dir, self.deck(index)?)?;
        info!("Saved deck to {}", path.display());
        Ok(())
    }

    /// Create and save an empty deck. Returns its index.
    pub fn add_deck(&mut self, name: &str) -> Result<usize, UiError> {
        self.decks.push(Deck::new(name));
        let index = self.decks.len() - 1;
        self.save(index)?;
        Ok(index)
    }

    /// Rename a deck, moving its file if the file name changes.
    pub fn rename_deck(&mut self, index: usize, name: &str) -> Result<(), UiError> {
        let old = self.deck(index)?.clone();
        self.deck_mut(index)?.name = name.to_string();
        self.save(index)?;
        if old.file_name() != self.deck(index)?.file_name() {
            deck::delete_deck(&self.deck_dir, &old)?;
        }
        Ok(())
    }

    pub fn remove_deck(&mut self, index: usize) -> Result<Deck, UiError> {
        deck::delete_deck(&self.deck_dir, self.deck(index)?)?;
        Ok(self.decks.remove(index))
    }
}

// ============================================================================
// Router
// ============================================================================

/// Builds scenes for the host from a [`SceneId`].
pub struct Router {
    library: SharedLibrary,
    menu_policy: SelectionPolicy,
}

impl Router {
    /// `menu_policy` is the selection policy of general navigation menus.
    /// The study difficulty menu always clamps.
    pub fn new(library: SharedLibrary, menu_policy: SelectionPolicy) -> Self {
        Self { library, menu_policy }
    }

    pub fn library(&self) -> &SharedLibrary {
        &self.library
    }
}

impl<C: Console> SceneFactory<C, Command, SceneId> for Router {
    fn create(
        &mut self,
        id: &SceneId,
        ctx: &mut SceneContext<'_, C, Command>,
    ) -> Result<Box<dyn Scene<C, Command, SceneId>>, UiError> {
        let library = Rc::clone(&self.library);
        let policy = self.menu_policy;
        let scene: Box<dyn Scene<C, Command, SceneId>> = match id {
            SceneId::MainMenu => Box::new(MainMenuScene::new(ctx.menus, policy)),
            SceneId::Settings => Box::new(SettingsScene::new(library, ctx.menus, policy)),
            SceneId::About => Box::new(AboutScene::new(ctx.menus)),
            SceneId::BrowseDecks => Box::new(BrowseDecksScene::new(library)),
            SceneId::Study { deck } => Box::new(StudyScene::new(library, *deck, ctx.menus)?),
            SceneId::Results(summary) => Box::new(ResultsScene::new(summary.clone(), ctx.menus, policy)),
            SceneId::EditDecks => Box::new(EditDecksScene::new(library)),
            SceneId::EditCards { deck } => Box::new(EditCardsScene::new(library, *deck)?),
        };
        Ok(scene)
    }

    fn rebuild_on_visit(&self, id: &SceneId) -> bool {
        !matches!(id, SceneId::MainMenu | SceneId::Settings | SceneId::About)
    }
}

// ============================================================================
// Shared drawing helpers
// ============================================================================

/// Number of pages needed for `items` at `per_page` each. Never zero.
pub(crate) fn page_count(items: usize, per_page: usize) -> usize {
    items.div_ceil(per_page.max(1)).max(1)
}

/// Deck names one per row, the selected one marked with `> `.
pub(crate) fn draw_deck_list<C: Console>(
    surface: &mut Surface<C>,
    decks: &[Deck],
    selected: usize,
    x: u16,
    y: u16,
    rows: u16,
) -> Result<(), UiError> {
    if decks.is_empty() {
        surface.draw_text("(no decks)", x, y)?;
        return Ok(());
    }
    // Keep the selection on screen once the list outgrows its rows
    let rows = usize::from(rows.max(1));
    let first = selected.saturating_sub(rows - 1);
    for (offset, (index, deck)) in decks.iter().enumerate().skip(first).take(rows).enumerate() {
        let marker = if index == selected { "> " } else { "  " };
        surface.draw_text(&format!("{marker}{}", deck.name), x, y + offset as u16)?;
    }
    Ok(())
}

/// Word-wrapped text cut off after `max_rows` rows.
pub(crate) fn draw_wrapped_rows<C: Console>(
    surface: &mut Surface<C>,
    text: &str,
    x: u16,
    y: u16,
    width: u16,
    max_rows: u16,
) -> Result<(), UiError> {
    let lines = wrap_words(text, usize::from(width));
    for (offset, line) in lines.iter().take(usize::from(max_rows)).enumerate() {
        surface.draw_text(line, x, y + offset as u16)?;
    }
    Ok(())
}
