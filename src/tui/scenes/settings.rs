//! Study settings: cards per round and session length.

use log::info;

use super::{Command, SceneId, SharedLibrary};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::menu::{Layout, MenuInput, SelectionPolicy};
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::{Navigation, Scene, SceneContext};

const MENU: &str = "settings";
const MENU_WIDTH: u16 = 30;
const FIRST_LINE: u16 = 5;
const LINES: u16 = 3;

pub struct SettingsScene {
    library: SharedLibrary,
    static_drawn: bool,
    needs_redraw: bool,
}

impl SettingsScene {
    pub fn new(library: SharedLibrary, menus: &mut MenuRegistry<Command>, policy: SelectionPolicy) -> Self {
        menus
            .create_menu(MENU, Layout::Vertical, policy)
            .add_action("Increment Cards", Command::MoreCards)
            .add_action("Decrement Cards", Command::FewerCards)
            .add_action("Increment Time", Command::MoreTime)
            .add_action("Decrement Time", Command::LessTime)
            .add_action("Defaults", Command::Defaults)
            .add_action("Back", Command::Back);
        Self {
            library,
            static_drawn: false,
            needs_redraw: true,
        }
    }

    fn lines(&self) -> [String; LINES as usize] {
        let library = self.library.borrow();
        let settings = &library.settings;
        [
            format!("Deck location: {}", library.deck_dir().display()),
            format!("Number of Cards per Round: {}", settings.card_limit()),
            format!("Study time (mins): {}", settings.study_minutes()),
        ]
    }

    /// Apply a settings command. Returns false for commands that leave the scene.
    fn apply(&mut self, command: Command) -> bool {
        let mut library = self.library.borrow_mut();
        let settings = &mut library.settings;
        match command {
            Command::MoreCards => settings.increase_card_limit(),
            Command::FewerCards => settings.decrease_card_limit(),
            Command::MoreTime => settings.increase_minutes(),
            Command::LessTime => settings.decrease_minutes(),
            Command::Defaults => settings.reset(),
            _ => return false,
        }
        info!(
            "Settings now {} cards, {} minutes",
            settings.card_limit(),
            settings.study_minutes()
        );
        true
    }
}

impl<C: Console> Scene<C, Command, SceneId> for SettingsScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let style = ctx.surface.default_style();
        if !self.static_drawn {
            ctx.surface.clear()?;
            ctx.surface.draw_border()?;
            ctx.surface.draw_centered_text("Settings", 2, style)?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        let (width, height) = (ctx.surface.width(), ctx.surface.height());
        let inner = width.saturating_sub(2);
        ctx.surface.blank_region(1, FIRST_LINE, inner, LINES)?;
        for (offset, line) in self.lines().iter().enumerate() {
            ctx.surface.draw_centered_text(line, FIRST_LINE + offset as u16, style)?;
        }

        let menu = ctx.menus.menu(MENU)?;
        let x = width.saturating_sub(MENU_WIDTH) / 2;
        let y = height.saturating_sub(menu.len() as u16 + 4);
        let (menu_width, menu_height) = menu.extent();
        ctx.surface.blank_region(x, y, menu_width, menu_height)?;
        menu.draw(ctx.surface, x, y)?;

        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let input = ctx.menus.menu_mut(MENU)?.handle_input(ctx.surface)?;
        let navigation = match input {
            MenuInput::Back | MenuInput::Activated(Command::Back) => Navigation::GoBack,
            MenuInput::Activated(command) => {
                self.needs_redraw |= self.apply(command);
                Navigation::None
            }
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
    use crate::core::config::{DEFAULT_CARD_LIMIT, StudySettings};
    use crate::test_support::SceneRig;
    use crate::tui::console::HeadlessConsole;
    use crate::tui::scenes::Library;

    fn setup() -> (SettingsScene, SceneRig<Command>, SharedLibrary) {
        let mut rig = SceneRig::new(60, 20);
        let library = Library::new("decks", Vec::new(), StudySettings::new(5, 10)).shared();
        let scene = SettingsScene::new(library.clone(), &mut rig.menus, SelectionPolicy::Wrap);
        (scene, rig, library)
    }

    fn tick(scene: &mut SettingsScene, rig: &mut SceneRig<Command>) -> Navigation<SceneId> {
        let nav = Scene::<HeadlessConsole, Command, SceneId>::handle_input(scene, &mut rig.ctx()).unwrap();
        Scene::<HeadlessConsole, Command, SceneId>::render(scene, &mut rig.ctx()).unwrap();
        nav
    }

    #[test]
    fn test_increment_cards_updates_line() {
        let (mut scene, mut rig, library) = setup();
        Scene::<HeadlessConsole, Command, SceneId>::render(&mut scene, &mut rig.ctx()).unwrap();
        assert!(rig.screen().contains("Number of Cards per Round: 5"));

        rig.console().push_scan_codes(&[13]);
        assert_eq!(tick(&mut scene, &mut rig), Navigation::None);
        assert_eq!(library.borrow().settings.card_limit(), 6);
        assert!(rig.screen().contains("Number of Cards per Round: 6"));
        assert!(rig.screen().contains("Deck location: decks"));
    }

    #[test]
    fn test_defaults_and_back() {
        let (mut scene, mut rig, library) = setup();
        // Up wraps to Back, Up again lands on Defaults
        rig.console().push_scan_codes(&[0xE0, 72, 0xE0, 72, 13, 0xE0, 80, 13]);
        tick(&mut scene, &mut rig);
        tick(&mut scene, &mut rig);
        tick(&mut scene, &mut rig);
        assert_eq!(library.borrow().settings.card_limit(), DEFAULT_CARD_LIMIT);
        tick(&mut scene, &mut rig);
        assert_eq!(tick(&mut scene, &mut rig), Navigation::GoBack);
    }

    #[test]
    fn test_escape_goes_back() {
        let (mut scene, mut rig, _) = setup();
        rig.console().push_scan_codes(&[27]);
        assert_eq!(tick(&mut scene, &mut rig), Navigation::GoBack);
    }
}
