//! Tally of one study round.

use super::{Command, SceneId};
use crate::core::study::StudySummary;
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::menu::{Layout, MenuInput, SelectionPolicy};
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::surface::centered_x;

const MENU: &str = "results";

pub struct ResultsScene {
    summary: StudySummary,
    static_drawn: bool,
    needs_redraw: bool,
}

impl ResultsScene {
    pub fn new(summary: StudySummary, menus: &mut MenuRegistry<Command>, policy: SelectionPolicy) -> Self {
        menus
            .create_menu(MENU, Layout::Horizontal, policy)
            .add_action("Main Menu", Command::MainMenu)
            .add_action("Deck Selection", Command::DeckSelection);
        Self {
            summary,
            static_drawn: false,
            needs_redraw: true,
        }
    }
}

impl<C: Console> Scene<C, Command, SceneId> for ResultsScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        let middle = height / 2;
        if !self.static_drawn {
            let style = ctx.surface.default_style();
            let summary = &self.summary;
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            ctx.surface.draw_centered_text("Results", 2, style)?;
            ctx.surface.draw_centered_text(&format!("Deck: {}", summary.deck), 4, style)?;
            ctx.surface.draw_centered_text(&format!("Easy: {}", summary.easy), middle.saturating_sub(2), style)?;
            ctx.surface.draw_centered_text(&format!("Medium: {}", summary.medium), middle, style)?;
            ctx.surface.draw_centered_text(&format!("Hard: {}", summary.hard), middle + 2, style)?;
            if !summary.complete {
                ctx.surface.draw_centered_text("(round ended early)", middle + 4, style)?;
            }
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        let menu = ctx.menus.menu(MENU)?;
        let (menu_width, menu_height) = menu.extent();
        let x = centered_x(width, usize::from(menu_width));
        let y = height * 3 / 4;
        ctx.surface.blank_region(x, y, menu_width, menu_height)?;
        menu.draw(ctx.surface, x, y)?;
        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let input = ctx.menus.menu_mut(MENU)?.handle_input(ctx.surface)?;
        let navigation = match input {
            MenuInput::Activated(Command::MainMenu) | MenuInput::Back => Navigation::GoTo(SceneId::MainMenu),
            MenuInput::Activated(Command::DeckSelection) => Navigation::GoTo(SceneId::BrowseDecks),
            input => {
                self.needs_redraw |= input.changed_view();
                Navigation::None
            }
        };
        Ok(navigation)
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
    use crate::test_support::SceneRig;
    use crate::tui::console::HeadlessConsole;

    fn summary(complete: bool) -> StudySummary {
        StudySummary {
            deck: "Trivia".to_string(),
            easy: 2,
            medium: 1,
            hard: 4,
            complete,
        }
    }

    fn input(scene: &mut ResultsScene, rig: &mut SceneRig<Command>) -> Navigation<SceneId> {
        Scene::<HeadlessConsole, Command, SceneId>::handle_input(scene, &mut rig.ctx()).unwrap()
    }

    #[test]
    fn test_shows_tallies() {
        let mut rig = SceneRig::new(60, 20);
        let mut scene = ResultsScene::new(summary(false), &mut rig.menus, SelectionPolicy::Wrap);
        Scene::<HeadlessConsole, Command, SceneId>::render(&mut scene, &mut rig.ctx()).unwrap();
        let screen = rig.screen();
        assert!(screen.contains("Deck: Trivia"));
        assert!(rig.console().row(8).contains("Easy: 2"));
        assert!(rig.console().row(10).contains("Medium: 1"));
        assert!(rig.console().row(12).contains("Hard: 4"));
        assert!(screen.contains("(round ended early)"));
        assert!(rig.console().row(15).contains("[Main Menu]"));
        assert!(rig.console().row(15).contains("Deck Selection"));
    }

    #[test]
    fn test_complete_round_has_no_early_note() {
        let mut rig = SceneRig::new(60, 20);
        let mut scene = ResultsScene::new(summary(true), &mut rig.menus, SelectionPolicy::Wrap);
        Scene::<HeadlessConsole, Command, SceneId>::render(&mut scene, &mut rig.ctx()).unwrap();
        assert!(!rig.screen().contains("ended early"));
    }

    #[test]
    fn test_menu_navigation() {
        let mut rig = SceneRig::new(60, 20);
        let mut scene = ResultsScene::new(summary(true), &mut rig.menus, SelectionPolicy::Wrap);
        rig.console().push_scan_codes(&[0xE0, 77, 13, 0xE0, 77, 13, 27]);
        assert_eq!(input(&mut scene, &mut rig), Navigation::None);
        assert_eq!(input(&mut scene, &mut rig), Navigation::GoTo(SceneId::BrowseDecks));
        // Right wraps back to Main Menu
        input(&mut scene, &mut rig);
        assert_eq!(input(&mut scene, &mut rig), Navigation::GoTo(SceneId::MainMenu));
        assert_eq!(input(&mut scene, &mut rig), Navigation::GoTo(SceneId::MainMenu));
    }
}
