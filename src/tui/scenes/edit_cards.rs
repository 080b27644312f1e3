//! Card editor for one deck: a paged card list with add, edit and delete.
//!
//! Editing asks for question, answer and rating in turn. An empty answer
//! keeps the current value; Escape at any prompt drops the whole edit.

use log::info;

use super::{Command, SceneId, SharedLibrary, page_count};
use crate::core::deck::{Difficulty, FlashCard};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::event::{Direction, Key};
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::surface::{LineInput, Surface};

const LIST_TOP: u16 = 4;
const ROWS_PER_CARD: u16 = 3;

/// Rating typed at the prompt. Accepts the study names as well as the
/// stored ones.
fn parse_rating(text: &str) -> Option<Difficulty> {
    match text.trim().to_ascii_lowercase().as_str() {
        "e" | "easy" => Some(Difficulty::Low),
        "m" => Some(Difficulty::Medium),
        "h" | "hard" => Some(Difficulty::High),
        other => Difficulty::parse(other),
    }
}

/// Label, then a line editor on the row below it.
fn ask<C: Console>(surface: &mut Surface<C>, label: &str, y: u16) -> Result<LineInput, UiError> {
    surface.draw_text(label, 2, y)?;
    let max = usize::from(surface.width().saturating_sub(4));
    Ok(surface.prompt_line(2, y + 1, max)?)
}

pub struct EditCardsScene {
    library: SharedLibrary,
    deck: usize,
    title: String,
    selected: usize,
    status: Option<String>,
    static_drawn: bool,
    needs_redraw: bool,
}

impl EditCardsScene {
    pub fn new(library: SharedLibrary, deck: usize) -> Result<Self, UiError> {
        let title = format!("Edit Cards - {}", library.borrow().deck(deck)?.name);
        Ok(Self {
            library,
            deck,
            title,
            selected: 0,
            status: None,
            static_drawn: false,
            needs_redraw: true,
        })
    }

    fn cards_per_page(height: u16) -> usize {
        usize::from(height.saturating_sub(LIST_TOP + 5) / ROWS_PER_CARD).max(1)
    }

    fn card_count(&self) -> usize {
        self.library.borrow().deck(self.deck).map_or(0, |deck| deck.cards.len())
    }

    /// Clear the body for a form.
    fn blank_body<C: Console>(surface: &mut Surface<C>) -> Result<(), UiError> {
        let (width, height) = (surface.width(), surface.height());
        surface.blank_region(1, LIST_TOP - 1, width.saturating_sub(2), height.saturating_sub(LIST_TOP + 1))?;
        Ok(())
    }

    fn edit_selected<C: Console>(&mut self, surface: &mut Surface<C>) -> Result<(), UiError> {
        let total = self.card_count();
        let Ok(mut card) = self.library.borrow().deck(self.deck).map(|deck| deck.cards[self.selected].clone()) else {
            return Ok(());
        };

        Self::blank_body(surface)?;
        surface.draw_text(&format!("Editing card {} of {}", self.selected + 1, total), 2, LIST_TOP)?;

        surface.draw_text(&format!("Current question: {}", card.question), 2, LIST_TOP + 2)?;
        let LineInput::Committed(question) = ask(surface, "New question (Enter keeps current):", LIST_TOP + 3)? else {
            self.status = Some("Edit cancelled.".to_string());
            return Ok(());
        };
        surface.draw_text(&format!("Current answer: {}", card.answer), 2, LIST_TOP + 6)?;
        let LineInput::Committed(answer) = ask(surface, "New answer (Enter keeps current):", LIST_TOP + 7)? else {
            self.status = Some("Edit cancelled.".to_string());
            return Ok(());
        };
        surface.draw_text(&format!("Current difficulty: {}", card.difficulty), 2, LIST_TOP + 10)?;
        let LineInput::Committed(rating) = ask(surface, "New difficulty (easy, medium, hard):", LIST_TOP + 11)? else {
            self.status = Some("Edit cancelled.".to_string());
            return Ok(());
        };

        if !question.trim().is_empty() {
            card.question = question.trim().to_string();
        }
        if !answer.trim().is_empty() {
            card.answer = answer.trim().to_string();
        }
        self.status = Some("Card updated.".to_string());
        if !rating.trim().is_empty() {
            match parse_rating(&rating) {
                Some(difficulty) => card.difficulty = difficulty,
                None => self.status = Some(format!("Unknown difficulty '{}', kept {}.", rating.trim(), card.difficulty)),
            }
        }

        let mut library = self.library.borrow_mut();
        library.deck_mut(self.deck)?.cards[self.selected] = card;
        library.save(self.deck)?;
        info!("Edited card {} of deck {}", self.selected, self.deck);
        Ok(())
    }

    fn add_card<C: Console>(&mut self, surface: &mut Surface<C>) -> Result<(), UiError> {
        Self::blank_body(surface)?;
        surface.draw_text("New card", 2, LIST_TOP)?;
        let question = match ask(surface, "Question:", LIST_TOP + 2)? {
            LineInput::Committed(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                self.status = Some("No card added.".to_string());
                return Ok(());
            }
        };
        let answer = match ask(surface, "Answer:", LIST_TOP + 5)? {
            LineInput::Committed(text) if !text.trim().is_empty() => text.trim().to_string(),
            _ => {
                self.status = Some("No card added.".to_string());
                return Ok(());
            }
        };

        let mut library = self.library.borrow_mut();
        let deck = library.deck_mut(self.deck)?;
        deck.cards.push(FlashCard::new(question, answer));
        self.selected = deck.cards.len() - 1;
        library.save(self.deck)?;
        info!("Added card to deck {}", self.deck);
        self.status = Some("Card added.".to_string());
        Ok(())
    }

    fn delete_selected(&mut self) -> Result<(), UiError> {
        let mut library = self.library.borrow_mut();
        let deck = library.deck_mut(self.deck)?;
        if self.selected >= deck.cards.len() {
            return Ok(());
        }
        deck.cards.remove(self.selected);
        self.selected = self.selected.min(deck.cards.len().saturating_sub(1));
        library.save(self.deck)?;
        info!("Deleted a card from deck {}", self.deck);
        self.status = Some("Card deleted.".to_string());
        Ok(())
    }

    fn draw_cards<C: Console>(&self, surface: &mut Surface<C>) -> Result<(), UiError> {
        let library = self.library.borrow();
        let deck = library.deck(self.deck)?;
        let per_page = Self::cards_per_page(surface.height());
        let page = self.selected / per_page;
        let pages = page_count(deck.cards.len(), per_page);

        surface.draw_text(&format!("Flashcards (Page {}/{}):", page + 1, pages), 2, LIST_TOP - 1)?;
        if deck.cards.is_empty() {
            surface.draw_text("(no cards, press A to add one)", 2, LIST_TOP)?;
        }
        let first = page * per_page;
        for (slot, card) in deck.cards.iter().enumerate().skip(first).take(per_page) {
            let y = LIST_TOP + (slot - first) as u16 * ROWS_PER_CARD;
            let marker = if slot == self.selected { "> " } else { "  " };
            surface.draw_text(&format!("{marker}Q: {}", card.question), 2, y)?;
            surface.draw_text(&format!("  A: {}", card.answer), 2, y + 1)?;
            surface.draw_text(&format!("  D: {}", card.difficulty), 2, y + 2)?;
        }
        Ok(())
    }
}

impl<C: Console> Scene<C, Command, SceneId> for EditCardsScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let height = ctx.surface.height();
        if !self.static_drawn {
            let style = ctx.surface.default_style();
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            ctx.surface.draw_centered_text(&self.title, 2, style)?;
            ctx.surface.draw_text(
                "Up/Down: Select  Left/Right: Page  Enter: Edit  A: Add  D: Delete  Esc: Back",
                2,
                height.saturating_sub(2),
            )?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        Self::blank_body(ctx.surface)?;
        self.draw_cards(ctx.surface)?;
        if let Some(status) = &self.status {
            ctx.surface.draw_text(status, 2, height.saturating_sub(3))?;
        }
        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let key = ctx.surface.read_key()?;
        let count = self.card_count();
        let per_page = Self::cards_per_page(ctx.surface.height());
        let last = count.saturating_sub(1);
        self.status = None;
        self.needs_redraw = true;

        match key {
            Key::Arrow(Direction::Up) => self.selected = self.selected.saturating_sub(1),
            Key::Arrow(Direction::Down) => self.selected = (self.selected + 1).min(last),
            Key::Arrow(Direction::Left) => self.selected = self.selected.saturating_sub(per_page),
            Key::Arrow(Direction::Right) => self.selected = (self.selected + per_page).min(last),
            Key::Enter if self.selected < count => self.edit_selected(ctx.surface)?,
            Key::Escape | Key::Backspace => return Ok(Navigation::GoBack),
            _ => match key.letter() {
                Some('a') => self.add_card(ctx.surface)?,
                Some('d') => self.delete_selected()?,
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

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::config::StudySettings;
    use crate::core::deck::load_decks;
    use crate::test_support::{SceneRig, sample_deck};
    use crate::tui::console::HeadlessConsole;
    use crate::tui::scenes::Library;

    struct Fixture {
        dir: tempfile::TempDir,
        library: SharedLibrary,
        rig: SceneRig<Command>,
        scene: EditCardsScene,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::new(dir.path(), vec![sample_deck()], StudySettings::default()).shared();
        Fixture {
            scene: EditCardsScene::new(library.clone(), 0).unwrap(),
            dir,
            library,
            rig: SceneRig::new(80, 24),
        }
    }

    impl Fixture {
        fn keys(&mut self, bytes: &[u8]) {
            self.rig.console().push_scan_codes(bytes);
        }

        fn input(&mut self) -> Navigation<SceneId> {
            Scene::<HeadlessConsole, Command, SceneId>::handle_input(&mut self.scene, &mut self.rig.ctx()).unwrap()
        }

        fn render(&mut self) {
            Scene::<HeadlessConsole, Command, SceneId>::render(&mut self.scene, &mut self.rig.ctx()).unwrap();
        }

        fn card(&self, index: usize) -> FlashCard {
            self.library.borrow().decks[0].cards[index].clone()
        }
    }

    #[test]
    fn test_parse_rating() {
        assert_eq!(parse_rating("Easy"), Some(Difficulty::Low));
        assert_eq!(parse_rating(" h "), Some(Difficulty::High));
        assert_eq!(parse_rating("medium"), Some(Difficulty::Medium));
        assert_eq!(parse_rating("3"), Some(Difficulty::High));
        assert_eq!(parse_rating("sometimes"), None);
    }

    #[test]
    fn test_lists_cards_with_pages() {
        let mut f = fixture();
        f.render();
        let screen = f.rig.screen();
        assert!(screen.contains("Edit Cards - Trivia"));
        // 24 rows fit five cards a page
        assert!(screen.contains("Flashcards (Page 1/1):"));
        assert!(screen.contains("> Q: What is the capital of Peru?"));
        assert!(screen.contains("  D: MEDIUM"));
    }

    #[test]
    fn test_edit_keeps_blank_fields() {
        let mut f = fixture();
        f.keys(b"\r\rCusco\rhard\r");
        f.input();
        let card = f.card(0);
        assert_eq!(card.question, "What is the capital of Peru?");
        assert_eq!(card.answer, "Cusco");
        assert_eq!(card.difficulty, Difficulty::High);
        assert_eq!(f.scene.status.as_deref(), Some("Card updated."));
        let saved = load_decks(f.dir.path());
        assert_eq!(saved[0].cards[0].answer, "Cusco");
    }

    #[test]
    fn test_escape_rolls_back_whole_edit() {
        let mut f = fixture();
        let before = f.card(1);
        f.keys(&[0xE0, 80, 13]);
        f.keys(b"Changed question\rChanged answer\r\x1b");
        f.input();
        f.input();
        assert_eq!(f.card(1), before);
        assert_eq!(f.scene.status.as_deref(), Some("Edit cancelled."));
        assert!(load_decks(f.dir.path()).is_empty(), "nothing written");
    }

    #[test]
    fn test_unknown_rating_keeps_difficulty() {
        let mut f = fixture();
        f.keys(b"\r\r\rsometimes\r");
        f.input();
        assert_eq!(f.card(0).difficulty, Difficulty::High);
        assert_eq!(f.scene.status.as_deref(), Some("Unknown difficulty 'sometimes', kept HIGH."));
    }

    #[test]
    fn test_add_and_delete() {
        let mut f = fixture();
        f.keys(b"aCapital of Chile?\rSantiago\r");
        f.input();
        assert_eq!(f.library.borrow().decks[0].cards.len(), 5);
        assert_eq!(f.scene.selected, 4);
        assert_eq!(f.card(4).answer, "Santiago");

        f.keys(b"d");
        f.input();
        assert_eq!(f.library.borrow().decks[0].cards.len(), 4);
        assert_eq!(f.scene.selected, 3);
        assert_eq!(load_decks(f.dir.path())[0].cards.len(), 4);
    }

    #[test]
    fn test_add_needs_both_fields() {
        let mut f = fixture();
        f.keys(b"aQuestion only\r\r");
        f.input();
        assert_eq!(f.library.borrow().decks[0].cards.len(), 4);
        assert_eq!(f.scene.status.as_deref(), Some("No card added."));
    }

    #[test]
    fn test_page_keys_move_by_page() {
        let mut f = fixture();
        f.keys(&[0xE0, 77, 0xE0, 75]);
        f.input();
        assert_eq!(f.scene.selected, 3);
        f.input();
        assert_eq!(f.scene.selected, 0);
        f.keys(&[27]);
        assert_eq!(f.input(), Navigation::GoBack);
    }
}
