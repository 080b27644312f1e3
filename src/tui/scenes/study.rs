//! One study round over a deck.
//!
//! Input is polled rather than awaited so `update` can end the round when
//! the time limit runs out.

use std::time::{Duration, Instant};

use log::{info, warn};

use super::{Command, SceneId, SharedLibrary, draw_wrapped_rows};
use crate::core::deck::Difficulty;
use crate::core::study::StudySession;
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::event::Key;
use crate::tui::menu::{Layout, MenuInput, SelectionPolicy};
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::surface::centered_x;

const MENU: &str = "difficulty";
const POLL_INTERVAL: Duration = Duration::from_millis(250);
const BODY_TOP: u16 = 5;

pub struct StudyScene {
    library: SharedLibrary,
    deck_index: usize,
    session: StudySession,
    started: Option<Instant>,
    time_limit: Duration,
    static_drawn: bool,
    needs_redraw: bool,
}

impl StudyScene {
    pub fn new(library: SharedLibrary, deck_index: usize, menus: &mut MenuRegistry<Command>) -> Result<Self, UiError> {
        let (session, time_limit) = {
            let library = library.borrow();
            let deck = library.deck(deck_index)?.clone();
            let session = StudySession::new(deck, library.settings.card_limit());
            (session, library.settings.time_limit())
        };

        // Rating never wraps from Hard back to Easy
        menus
            .create_menu(MENU, Layout::Horizontal, SelectionPolicy::Clamp)
            .add_action("Easy", Command::Rate(Difficulty::Low))
            .add_action("Medium", Command::Rate(Difficulty::Medium))
            .add_action("Hard", Command::Rate(Difficulty::High));

        Ok(Self {
            library,
            deck_index,
            session,
            started: None,
            time_limit,
            static_drawn: false,
            needs_redraw: true,
        })
    }

    /// End the round: write the ratings back and show the results.
    fn finish(&mut self) -> Navigation<SceneId> {
        let summary = self.session.summary();
        let mut library = self.library.borrow_mut();
        library.settings.end_session();

        if summary.total() > 0 {
            match library.deck_mut(self.deck_index) {
                Ok(deck) => *deck = self.session.deck().clone(),
                Err(e) => warn!("Study results not kept: {}", e),
            }
            if let Err(e) = library.save(self.deck_index) {
                warn!("Could not save ratings for '{}': {}", summary.deck, e);
            }
        }

        info!(
            "Study round on '{}' ended: {} easy, {} medium, {} hard (complete: {})",
            summary.deck, summary.easy, summary.medium, summary.hard, summary.complete
        );
        Navigation::GoTo(SceneId::Results(summary))
    }

    fn draw_card<C: Console>(&self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let style = ctx.surface.default_style();
        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        let Some(card) = self.session.current() else {
            ctx.surface.draw_centered_text("All cards reviewed!", height / 2, style)?;
            return Ok(());
        };

        let text_width = width.saturating_sub(4);
        let middle = height / 2;
        let question_rows = middle.saturating_sub(BODY_TOP + 3).max(1);
        draw_wrapped_rows(ctx.surface, &card.question, 2, BODY_TOP + 1, text_width, question_rows)?;

        let prompt_row = height * 2 / 3;
        if self.session.is_revealed() {
            ctx.surface.draw_centered_text("Answer:", middle.saturating_sub(1), style)?;
            let answer_rows = prompt_row.saturating_sub(middle + 2).max(1);
            draw_wrapped_rows(ctx.surface, &card.answer, 2, middle + 1, text_width, answer_rows)?;

            let menu = ctx.menus.menu(MENU)?;
            let (menu_width, _) = menu.extent();
            menu.draw(ctx.surface, centered_x(width, usize::from(menu_width)), prompt_row)?;
            ctx.surface.draw_text(
                "Use arrow keys to select difficulty, Enter to confirm",
                2,
                height.saturating_sub(2),
            )?;
        } else {
            ctx.surface.draw_centered_text("Press SPACE to show answer", prompt_row, style)?;
        }

        let (position, total) = self.session.progress();
        ctx.surface.draw_text(&format!("Card {position} of {total}"), 2, height.saturating_sub(3))?;
        let limit = format!("{} min limit", self.time_limit.as_secs() / 60);
        let limit_x = width.saturating_sub(limit.len() as u16 + 2);
        ctx.surface.draw_text(&limit, limit_x, height.saturating_sub(3))?;
        Ok(())
    }
}

impl<C: Console> Scene<C, Command, SceneId> for StudyScene {
    fn init(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        self.started = Some(self.library.borrow_mut().settings.begin_session());
        ctx.menus.menu_mut(MENU)?.select(0);
        self.needs_redraw = true;
        info!("Study round started on '{}'", self.session.deck().name);
        Ok(())
    }

    fn update(&mut self, _ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        if self.session.is_finished() {
            return Ok(self.finish());
        }
        if let Some(started) = self.started {
            if self.session.expired(started, Instant::now(), self.time_limit) {
                info!("Study time limit reached");
                return Ok(self.finish());
            }
        }
        Ok(Navigation::None)
    }

    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        if !self.static_drawn {
            let style = ctx.surface.default_style();
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            let title = format!("Studying: {}", self.session.deck().name);
            ctx.surface.draw_centered_text(&title, 2, style)?;
            ctx.surface.draw_centered_text("Question:", 4, style)?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        ctx.surface
            .blank_region(1, BODY_TOP, width.saturating_sub(2), height.saturating_sub(BODY_TOP + 1))?;
        self.draw_card(ctx)?;
        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let Some(key) = ctx.surface.poll_key(POLL_INTERVAL)? else {
            return Ok(Navigation::None);
        };

        if key == Key::Escape {
            info!("Study round ended early");
            return Ok(self.finish());
        }
        if !self.session.is_revealed() {
            if key.is_space() {
                self.session.reveal();
                self.needs_redraw = true;
            }
            return Ok(Navigation::None);
        }

        let menu = ctx.menus.menu_mut(MENU)?;
        match menu.handle_key(key) {
            MenuInput::Activated(Command::Rate(difficulty)) => {
                self.session.rate(difficulty);
                menu.select(0);
                self.needs_redraw = true;
                if self.session.is_finished() {
                    return Ok(self.finish());
                }
            }
            input => self.needs_redraw |= input.changed_view(),
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
    use crate::core::study::StudySummary;
    use crate::test_support::{SceneRig, sample_deck};
    use crate::tui::console::HeadlessConsole;
    use crate::tui::scenes::Library;

    struct Fixture {
        _dir: tempfile::TempDir,
        library: SharedLibrary,
        rig: SceneRig<Command>,
        scene: StudyScene,
    }

    fn fixture() -> Fixture {
        let dir = tempfile::tempdir().unwrap();
        let library = Library::new(dir.path(), vec![sample_deck()], StudySettings::new(3, 20)).shared();
        let mut rig = SceneRig::new(80, 24);
        let mut scene = StudyScene::new(library.clone(), 0, &mut rig.menus).unwrap();
        Scene::<HeadlessConsole, Command, SceneId>::init(&mut scene, &mut rig.ctx()).unwrap();
        Fixture {
            _dir: dir,
            library,
            rig,
            scene,
        }
    }

    impl Fixture {
        fn render(&mut self) {
            Scene::<HeadlessConsole, Command, SceneId>::render(&mut self.scene, &mut self.rig.ctx()).unwrap();
        }

        fn input(&mut self) -> Navigation<SceneId> {
            Scene::<HeadlessConsole, Command, SceneId>::handle_input(&mut self.scene, &mut self.rig.ctx()).unwrap()
        }

        fn update(&mut self) -> Navigation<SceneId> {
            Scene::<HeadlessConsole, Command, SceneId>::update(&mut self.scene, &mut self.rig.ctx()).unwrap()
        }
    }

    #[test]
    fn test_space_reveals_answer() {
        let mut f = fixture();
        f.render();
        assert!(f.rig.screen().contains("What is the capital of Peru?"));
        assert!(f.rig.screen().contains("Press SPACE to show answer"));
        assert!(f.rig.screen().contains("Card 1 of 3"));

        f.rig.console().push_scan_codes(b" ");
        f.input();
        f.render();
        let screen = f.rig.screen();
        assert!(screen.contains("Lima"));
        assert!(screen.contains("[Easy]"));
        assert!(!screen.contains("Press SPACE"));
    }

    #[test]
    fn test_rating_menu_clamps_and_rates() {
        let mut f = fixture();
        f.rig.console().push_scan_codes(&[b' ', 0xE0, 75, 0xE0, 77, 0xE0, 77, 0xE0, 77, 13]);
        f.input();
        // Left at Easy stays put
        f.input();
        assert_eq!(f.rig.menus.menu(MENU).unwrap().selected(), Some(0));
        f.input();
        f.input();
        f.input();
        assert_eq!(f.rig.menus.menu(MENU).unwrap().selected(), Some(2));
        assert_eq!(f.input(), Navigation::None);

        f.render();
        assert!(f.rig.screen().contains("Card 2 of 3"));
        assert!(f.rig.screen().contains("Which planet has the most moons?"));
        assert_eq!(f.rig.menus.menu(MENU).unwrap().selected(), Some(0));
    }

    #[test]
    fn test_escape_ends_early_and_saves() {
        let mut f = fixture();
        f.rig.console().push_scan_codes(&[b' ', 13, 27]);
        f.input();
        f.input();
        let navigation = f.input();
        assert_eq!(
            navigation,
            Navigation::GoTo(SceneId::Results(StudySummary {
                deck: "Trivia".to_string(),
                easy: 1,
                medium: 0,
                hard: 0,
                complete: false,
            }))
        );

        let library = f.library.borrow();
        assert!(!library.settings.session_underway());
        let peru = &library.decks[0].cards[0];
        assert_eq!(peru.difficulty, Difficulty::Low);
        assert_eq!(peru.times_answered, 3);
        let saved = load_decks(library.deck_dir());
        assert_eq!(saved[0].cards[0].difficulty, Difficulty::Low);
    }

    #[test]
    fn test_finishing_every_card_goes_to_results() {
        let mut f = fixture();
        for _ in 0..3 {
            f.rig.console().push_scan_codes(&[b' ', 13]);
        }
        f.input();
        f.input();
        f.input();
        f.input();
        f.input();
        match f.input() {
            Navigation::GoTo(SceneId::Results(summary)) => {
                assert!(summary.complete);
                assert_eq!(summary.easy, 3);
            }
            other => panic!("expected results, got {other:?}"),
        }
    }

    #[test]
    fn test_time_limit_ends_round() {
        let mut f = fixture();
        assert_eq!(f.update(), Navigation::None);
        f.scene.time_limit = Duration::ZERO;
        assert!(matches!(f.update(), Navigation::GoTo(SceneId::Results(_))));
    }

    #[test]
    fn test_poll_timeout_changes_nothing() {
        let mut f = fixture();
        f.render();
        f.rig.console().push_timeouts(1);
        assert_eq!(f.input(), Navigation::None);
        let writes = f.rig.console().write_count();
        f.render();
        assert_eq!(f.rig.console().write_count(), writes);
    }
}
