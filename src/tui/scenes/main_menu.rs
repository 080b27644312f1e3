//! Title screen: the dungeon art and the top-level menu.

use super::{Command, SceneId};
use crate::tui::console::Console;
use crate::tui::error::UiError;
use crate::tui::menu::{Layout, MenuInput, SelectionPolicy};
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::{Navigation, Scene, SceneContext};
use crate::tui::surface::centered_x;

const MENU: &str = "main";
const TITLE_ROW: u16 = 2;

pub struct MainMenuScene {
    static_drawn: bool,
    needs_redraw: bool,
    menu_origin: (u16, u16),
}

impl MainMenuScene {
    pub fn new(menus: &mut MenuRegistry<Command>, policy: SelectionPolicy) -> Self {
        menus
            .create_menu(MENU, Layout::Vertical, policy)
            .add_action("Begin Study", Command::BeginStudy)
            .add_action("Edit Decks", Command::EditDecks)
            .add_action("Settings", Command::Settings)
            .add_action("About", Command::About)
            .add_action("Quit", Command::Quit);
        Self {
            static_drawn: false,
            needs_redraw: true,
            menu_origin: (0, 0),
        }
    }

    fn draw_static<C: Console>(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        let surface = &mut *ctx.surface;
        surface.clear()?;
        surface.draw_border()?;

        let (width, height) = (surface.width(), surface.height());
        let title = ctx.assets.lookup("title").map(|art| (art.width(), art.height()));
        let (title_width, title_height) = title.unwrap_or((0, 1));
        ctx.assets.draw("title", centered_x(width, usize::from(title_width)), TITLE_ROW, surface)?;

        // Scenery along the bottom edge; skipped quietly on small terminals
        let floor = height.saturating_sub(8);
        ctx.assets.draw("bookshelf", 3, floor, surface)?;
        ctx.assets.draw("librarian", width.saturating_sub(13), floor, surface)?;

        let (menu_width, menu_height) = ctx.menus.menu(MENU)?.extent();
        let below_title = TITLE_ROW + title_height + 2;
        let y = below_title.min(height.saturating_sub(menu_height + 1));
        self.menu_origin = (centered_x(width, usize::from(menu_width)), y);
        Ok(())
    }
}

impl<C: Console> Scene<C, Command, SceneId> for MainMenuScene {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<(), UiError> {
        if !self.static_drawn {
            self.draw_static(ctx)?;
            self.static_drawn = true;
            self.needs_redraw = true;
        }
        if !self.needs_redraw {
            return Ok(());
        }

        let menu = ctx.menus.menu(MENU)?;
        let (x, y) = self.menu_origin;
        let (width, height) = menu.extent();
        ctx.surface.blank_region(x, y, width, height)?;
        menu.draw(ctx.surface, x, y)?;
        self.needs_redraw = false;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, Command>) -> Result<Navigation<SceneId>, UiError> {
        let input = ctx.menus.menu_mut(MENU)?.handle_input(ctx.surface)?;
        let navigation = match input {
            MenuInput::Activated(command) => match command {
                Command::BeginStudy => Navigation::GoTo(SceneId::BrowseDecks),
                Command::EditDecks => Navigation::GoTo(SceneId::EditDecks),
                Command::Settings => Navigation::GoTo(SceneId::Settings),
                Command::About => Navigation::GoTo(SceneId::About),
                Command::Quit => Navigation::Quit,
                _ => Navigation::None,
            },
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
