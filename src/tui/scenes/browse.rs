//! Deck picker for study: the deck list on the left, a paged preview of the
//! selected deck's cards on the right.

use log::debug;

use super::{Command, SceneId, SharedLibrary, draw_deck_list, draw_wrapped_rows, page_count};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::event::{Direction, Key};
use crate::tui::scene::{Navigation, Scene, SceneContext};

const LIST_TOP: u16 = 4;
const ROWS_PER_CARD: u16 = 5;

pub struct BrowseDecksScene {
    library: SharedLibrary,
    selected: usize,
    page: usize,
    status: Option<String>,
    static_drawn: bool,
    needs_redraw: bool,
}

impl BrowseDecksScene {
    pub fn new(library: SharedLibrary) -> Self {
        Self {
            library,
            selected: 0,
            page: 0,
            status: None,
            static_drawn: false,
            needs_redraw: true,
        }
    }

    fn cards_per_page(height: u16) -> usize {
        usize::from(height.saturating_sub(LIST_TOP + 5) / ROWS_PER_CARD).max(1)
    }

    fn draw_preview<C: Console>(&self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let library = self.library.borrow();
        let Some(deck) = library.decks.get(self.selected) else {
            return Ok(());
        };
        let surface = &mut *ctx.surface;
        let (width, height) = (surface.width(), surface.height());
        let x = width / 2;
        let text_width = width.saturating_sub(x + 2);
        let per_page = Self::cards_per_page(height);
        let pages = page_count(deck.cards.len(), per_page);

        surface.draw_text(&format!("Deck Contents (Page {}/{}):", self.page + 1, pages), x, LIST_TOP - 1)?;
        if deck.cards.is_empty() {
            surface.draw_text("(no cards)", x, LIST_TOP)?;
        }
        let first = self.page * per_page;
        for (slot, card) in deck.cards.iter().skip(first).take(per_page).enumerate() {
            let y = LIST_TOP + slot as u16 * ROWS_PER_CARD;
            draw_wrapped_rows(surface, &format!("Q: {}", card.question), x, y, text_width, 2)?;
            draw_wrapped_rows(surface, &format!("A: {}", card.answer), x, y + 2, text_width, 2)?;
            surface.draw_text(&format!("D: {}", card.difficulty), x, y + 4)?;
            surface.draw_text(&format!("Times answered: {}", card.times_answered), x + 20, y + 4)?;
        }
        surface.draw_text("Use Left/Right arrows to change pages", x, height.saturating_sub(3))?;
        Ok(())
    }

    fn page_limit(&self, height: u16) -> usize {
        let library = self.library.borrow();
        let cards = library.decks.get(self.selected).map_or(0, |deck| deck.cards.len());
        page_count(cards, Self::cards_per_page(height))
    }
}

impl<C: Console> Scene<C, Command, SceneId> for BrowseDecksScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        if !self.static_drawn {
            let style = ctx.surface.default_style();
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            ctx.surface.draw_centered_text("Browse Decks", 2, style)?;
            ctx.surface.draw_text(
                "Up/Down to choose, Enter to study, Esc to go back",
                2,
                height.saturating_sub(2),
            )?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        // Everything between the title and the instruction line
        let body_height = height.saturating_sub(LIST_TOP - 1 + 2);
        ctx.surface.blank_region(1, LIST_TOP - 1, width.saturating_sub(2), body_height)?;

        let list_rows = height.saturating_sub(LIST_TOP + 4);
        {
            let library = self.library.borrow();
            draw_deck_list(ctx.surface, &library.decks, self.selected, 2, LIST_TOP, list_rows)?;
        }
        self.draw_preview(ctx)?;
        if let Some(status) = &self.status {
            ctx.surface.draw_text(status, 2, height.saturating_sub(3))?;
        }

        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let key = ctx.surface.read_key()?;
        let deck_count = self.library.borrow().decks.len();
        let status = self.status.take();
        let mut navigation = Navigation::None;

        match key {
            Key::Arrow(Direction::Up) if self.selected > 0 => {
                self.selected -= 1;
                self.page = 0;
            }
            Key::Arrow(Direction::Down) if self.selected + 1 < deck_count => {
                self.selected += 1;
                self.page = 0;
            }
            Key::Arrow(Direction::Left) if self.page > 0 => self.page -= 1,
            Key::Arrow(Direction::Right) if self.page + 1 < self.page_limit(ctx.surface.height()) => self.page += 1,
            Key::Enter if self.selected < deck_count => {
                if self.library.borrow().decks[self.selected].cards.is_empty() {
                    self.status = Some("That deck has no cards yet.".to_string());
                } else {
                    navigation = Navigation::GoTo(SceneId::Study { deck: self.selected });
                }
            }
            Key::Escape | Key::Backspace => navigation = Navigation::GoBack,
            _ => {
                // Nothing changed; keep any message on screen
                self.status = status;
                return Ok(Navigation::None);
            }
        }

        debug!("Browse: deck {} page {}", self.selected, self.page);
        self.needs_redraw = true;
        Ok(navigation)
    }

    fn static_drawn(&self) -> bool {
        self.static_drawn
    }

    fn set_static_drawn(&mut self, drawn: bool) {
        self.static_drawn = drawn;
    }
}
