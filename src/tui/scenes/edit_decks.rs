//! Deck management: add, rename and delete decks, or open one to edit its
//! cards.

use log::info;

use super::{Command, SceneId, SharedLibrary, draw_deck_list};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::event::{Direction, Key};
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::surface::LineInput;

const LIST_TOP: u16 = 4;
const MAX_NAME: usize = 40;

pub struct EditDecksScene {
    library: SharedLibrary,
    selected: usize,
    confirm_delete: bool,
    status: Option<String>,
    static_drawn: bool,
    needs_redraw: bool,
}

impl EditDecksScene {
    pub fn new(library: SharedLibrary) -> Self {
        Self {
            library,
            selected: 0,
            confirm_delete: false,
            status: None,
            static_drawn: false,
            needs_redraw: true,
        }
    }

    fn status_row(height: u16) -> u16 {
        height.saturating_sub(3)
    }

    /// Ask for a deck name on the status row. `None` if the user backed out
    /// or typed nothing.
    fn prompt_name<C: Console>(&mut self, ctx: &mut SceneContext<'_, C, Command>, label: &str) -> Result<Option<String>, UiError> {
        let surface = &mut *ctx.surface;
        let row = Self::status_row(surface.height());
        surface.blank_region(1, row, surface.width().saturating_sub(2), 1)?;
        surface.draw_text(label, 2, row)?;
        let x = 2 + label.len() as u16;
        let max = MAX_NAME.min(usize::from(surface.width().saturating_sub(x + 2)));
        let name = match surface.prompt_line(x, row, max)? {
            LineInput::Committed(name) => name.trim().to_string(),
            LineInput::Aborted => String::new(),
        };
        Ok((!name.is_empty()).then_some(name))
    }

    fn add<C: Console>(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let Some(name) = self.prompt_name(ctx, "New deck name: ")? else {
            self.status = Some("No deck added.".to_string());
            return Ok(());
        };
        let mut library = self.library.borrow_mut();
        if library.name_taken(&name, None) {
            self.status = Some(format!("A deck called '{name}' already exists."));
            return Ok(());
        }
        self.selected = library.add_deck(&name)?;
        info!("Added deck '{}'", name);
        self.status = Some(format!("Added '{name}'."));
        Ok(())
    }

    fn rename<C: Console>(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let Some(name) = self.prompt_name(ctx, "Rename to: ")? else {
            self.status = Some("Name unchanged.".to_string());
            return Ok(());
        };
        let mut library = self.library.borrow_mut();
        if library.name_taken(&name, Some(self.selected)) {
            self.status = Some(format!("A deck called '{name}' already exists."));
            return Ok(());
        }
        library.rename_deck(self.selected, &name)?;
        info!("Renamed deck {} to '{}'", self.selected, name);
        self.status = Some(format!("Renamed to '{name}'."));
        Ok(())
    }

    fn delete(&mut self) -> Result<(), UiError> {
        let mut library = self.library.borrow_mut();
        if !self.confirm_delete {
            self.confirm_delete = true;
            let name = &library.deck(self.selected)?.name;
            self.status = Some(format!("Press D again to delete '{name}'."));
            return Ok(());
        }
        self.confirm_delete = false;
        let removed = library.remove_deck(self.selected)?;
        self.selected = self.selected.min(library.decks.len().saturating_sub(1));
        info!("Deleted deck '{}'", removed.name);
        self.status = Some(format!("Deleted '{}'.", removed.name));
        Ok(())
    }
}

impl<C: Console> Scene<C, Command, SceneId> for EditDecksScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        if !self.static_drawn {
            let style = ctx.surface.default_style();
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            ctx.surface.draw_centered_text("Edit Decks", 2, style)?;
            ctx.surface.draw_text(
                "A: Add  R: Rename  D: Delete  Enter: Edit Cards  Esc: Back",
                2,
                height.saturating_sub(2),
            )?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        let status_row = Self::status_row(height);
        let body_height = (status_row + 1).saturating_sub(LIST_TOP);
        ctx.surface.blank_region(1, LIST_TOP, width.saturating_sub(2), body_height)?;

        let library = self.library.borrow();
        draw_deck_list(ctx.surface, &library.decks, self.selected, 2, LIST_TOP, status_row.saturating_sub(LIST_TOP + 1))?;
        if let Some(deck) = library.decks.get(self.selected) {
            let count = format!("{} card(s)", deck.cards.len());
            ctx.surface.draw_text(&count, width / 2, LIST_TOP)?;
        }
        if let Some(status) = &self.status {
            ctx.surface.draw_text(status, 2, status_row)?;
        }

        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let key = ctx.surface.read_key()?;
        let deck_count = self.library.borrow().decks.len();
        let letter = key.letter();
        if letter != Some('d') {
            self.confirm_delete = false;
        }
        self.status = None;
        // Prompts and deletes repaint the body even if they fail part way
        self.needs_redraw = true;

        match key {
            Key::Arrow(Direction::Up) => self.selected = self.selected.saturating_sub(1),
            Key::Arrow(Direction::Down) if self.selected + 1 < deck_count => self.selected += 1,
            Key::Enter if self.selected < deck_count => {
                return Ok(Navigation::GoTo(SceneId::EditCards { deck: self.selected }));
            }
            Key::Escape | Key::Backspace => return Ok(Navigation::GoBack),
            _ => match letter {
                Some('a') => self.add(ctx)?,
                Some('r') if self.selected < deck_count => self.rename(ctx)?,
                Some('d') if self.selected < deck_count => self.delete()?,
                _ => {}
            },
        }
        Ok(Navigation::None)
    }

    fn static_drawn(&self) -> bool {
        self.static_drawn
    }

    fn set_static_drawn(&mut self, drawn: bool) {
        self.static_drawn = drawn;
    }
}
