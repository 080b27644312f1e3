//! About screen: a grid of topics, each opening its own grid of tips.
//!
//! The grid runs its own input loop through the menu registry, so this
//! scene only paints the first frame and hands over control.

use super::{Command, SceneId};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::grid::{Footprint, GridMenu};
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::widget::Widget;

const MENU: &str = "about";

const TOPICS: [(&str, &str, [&str; 4]); 4] = [
    (
        "Studying",
        "about.study",
        [
            "Pick a deck and press Enter to start a round.",
            "Press Space to reveal the answer, then rate the card Easy, Medium or Hard.",
            "Cards rated Hard come back first next time.",
            "Escape ends the round early. The timer ends it too.",
        ],
    ),
    (
        "Editing",
        "about.edit",
        [
            "A adds a deck or card, D deletes it (twice for decks).",
            "R renames the selected deck.",
            "Enter on a card edits question, answer and rating.",
            "Escape at any prompt throws the whole edit away.",
        ],
    ),
    (
        "Settings",
        "about.settings",
        [
            "Cards per round can be 1 to 100.",
            "Study time can be 1 to 60 minutes.",
            "Defaults puts both back to 15 cards and 25 minutes.",
            "Decks are read from the deck folder at startup.",
        ],
    ),
    (
        "Controls",
        "about.controls",
        [
            "Arrow keys move between items.",
            "Enter chooses, Escape goes back.",
            "D hides a tip on these pages.",
            "Resizing the window asks before keeping the new size.",
        ],
    ),
];

pub struct AboutScene {
    static_drawn: bool,
}

impl AboutScene {
    pub fn new(menus: &mut MenuRegistry<Command>) -> Self {
        let mut topics = GridMenu::new("About StudyDungeon", 3, 2);
        for (i, (label, submenu, tips)) in TOPICS.iter().enumerate() {
            topics.add_item(Widget::submenu(*label, *submenu), Footprint::cell(i / 2, i % 2));

            let mut page = GridMenu::new(*label, 2, 2).with_removal(true);
            for (j, tip) in tips.iter().enumerate() {
                page.add_item(Widget::action(*tip, Command::About).disabled(), Footprint::cell(j / 2, j % 2));
            }
            menus.create_grid(submenu, page);
        }
        topics.add_item(Widget::action("Back", Command::Back), Footprint::new(2, 0, 2, 1));
        menus.create_grid(MENU, topics);

        Self { static_drawn: false }
    }
}

impl<C: Console> Scene<C, Command, SceneId> for AboutScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        if !self.static_drawn {
            ctx.menus.grid(MENU)?.render(ctx.surface)?;
            self.static_drawn = true;
        }
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        // Back and Escape both leave; tips are disabled so nothing else returns
        ctx.menus.run_menu(MENU, ctx.surface)?;
        Ok(Navigation::GoBack)
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

    fn input(scene: &mut AboutScene, rig: &mut SceneRig<Command>) -> Navigation<SceneId> {
        Scene::<HeadlessConsole, Command, SceneId>::handle_input(scene, &mut rig.ctx()).unwrap()
    }

    #[test]
    fn test_builds_topic_and_tip_grids() {
        let mut rig = SceneRig::new(80, 24);
        let _scene = AboutScene::new(&mut rig.menus);
        let topics = rig.menus.grid(MENU).unwrap();
        assert_eq!(topics.len(), 5);
        assert!(topics.is_valid_cell(2, 1), "Back spans both columns");
        assert_eq!(rig.menus.grid("about.controls").unwrap().len(), 4);
    }

    #[test]
    fn test_render_draws_grid_once() {
        let mut rig = SceneRig::new(80, 24);
        let mut scene = AboutScene::new(&mut rig.menus);
        Scene::<HeadlessConsole, Command, SceneId>::render(&mut scene, &mut rig.ctx()).unwrap();
        assert!(rig.screen().contains("About StudyDungeon"));
        assert!(rig.screen().contains("Studying"));
        let writes = rig.console().write_count();
        Scene::<HeadlessConsole, Command, SceneId>::render(&mut scene, &mut rig.ctx()).unwrap();
        assert_eq!(rig.console().write_count(), writes);
    }

    #[test]
    fn test_tip_page_then_back() {
        let mut rig = SceneRig::new(80, 24);
        let mut scene = AboutScene::new(&mut rig.menus);
        // Open Studying, dismiss a tip, leave the page, go down twice to Back
        rig.console().push_scan_codes(&[13, b'd', 27, 0xE0, 80, 0xE0, 80, 13]);
        assert_eq!(input(&mut scene, &mut rig), Navigation::GoBack);
        assert_eq!(rig.menus.grid("about.study").unwrap().len(), 3);
        assert_eq!(rig.console().pending_keys(), 0);
    }

    #[test]
    fn test_escape_leaves() {
        let mut rig = SceneRig::new(80, 24);
        let mut scene = AboutScene::new(&mut rig.menus);
        rig.console().push_scan_codes(&[27]);
        assert_eq!(input(&mut scene, &mut rig), Navigation::GoBack);
    }
}
