//! # Menu Registry
//!
//! Menus live here by name, not inside scenes, so a menu outlives the scene
//! that built it and several scenes can share or repopulate one.
//!
//! Widgets that open a submenu carry only the submenu's name; [`run_menu`]
//! resolves it here and gives the submenu the terminal until it exits.
//!
//! [`run_menu`]: MenuRegistry::run_menu

use std::collections::HashMap;

use log::{debug, info};

use super::console::Console;
use super::error::{MenuError, UiError};
use super::grid::GridMenu;
use super::menu::{Layout, Menu, MenuInput, SelectionPolicy};
use super::surface::{Surface, centered_x};

/// A menu taken out of the registry.
#[derive(Debug, Clone)]
pub enum AnyMenu<A> {
    List(Menu<A>),
    Grid(GridMenu<A>),
}

/// Names are unique across both kinds of menu.
#[derive(Debug)]
pub struct MenuRegistry<A> {
    lists: HashMap<String, Menu<A>>,
    grids: HashMap<String, GridMenu<A>>,
}

impl<A> Default for MenuRegistry<A> {
    fn default() -> Self {
        Self {
            lists: HashMap::new(),
            grids: HashMap::new(),
        }
    }
}

impl<A> MenuRegistry<A> {
    pub fn new() -> Self {
        Self::default()
    }

    /// Register an empty linear menu, replacing any menu of that name.
    pub fn create_menu(&mut self, name: &str, layout: Layout, policy: SelectionPolicy) -> &mut Menu<A> {
        debug!("Creating menu '{}'", name);
        self.grids.remove(name);
        self.lists
            .entry(name.to_string())
            .insert_entry(Menu::new(layout, policy))
            .into_mut()
    }

    /// Register a grid menu, replacing any menu of that name.
    pub fn create_grid(&mut self, name: &str, grid: GridMenu<A>) -> &mut GridMenu<A> {
        debug!("Creating grid menu '{}'", name);
        self.lists.remove(name);
        self.grids.entry(name.to_string()).insert_entry(grid).into_mut()
    }

    pub fn contains(&self, name: &str) -> bool {
        self.lists.contains_key(name) || self.grids.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.lists.len() + self.grids.len()
    }

    pub fn is_empty(&self) -> bool {
        self.lists.is_empty() && self.grids.is_empty()
    }

    pub fn menu(&self, name: &str) -> Result<&Menu<A>, MenuError> {
        self.lists
            .get(name)
            .ok_or_else(|| missing(name, "list", self.grids.contains_key(name)))
    }

    pub fn menu_mut(&mut self, name: &str) -> Result<&mut Menu<A>, MenuError> {
        self.lists
            .get_mut(name)
            .ok_or_else(|| missing(name, "list", self.grids.contains_key(name)))
    }

    pub fn grid(&self, name: &str) -> Result<&GridMenu<A>, MenuError> {
        self.grids
            .get(name)
            .ok_or_else(|| missing(name, "grid", self.lists.contains_key(name)))
    }

    /// Empty the named menu but keep it registered. Unknown names are ignored.
    pub fn clear_menu(&mut self, name: &str) {
        if let Some(menu) = self.lists.get_mut(name) {
            menu.clear();
        } else if let Some(grid) = self.grids.get_mut(name) {
            grid.clear();
        }
    }

    pub fn remove(&mut self, name: &str) -> Option<AnyMenu<A>> {
        self.lists
            .remove(name)
            .map(AnyMenu::List)
            .or_else(|| self.grids.remove(name).map(AnyMenu::Grid))
    }
}

/// `NotFound`, or `WrongKind` when the name belongs to the other kind.
fn missing(name: &str, expected: &'static str, other_kind: bool) -> MenuError {
    if other_kind {
        MenuError::WrongKind {
            name: name.to_string(),
            expected,
        }
    } else {
        MenuError::NotFound(name.to_string())
    }
}

impl<A: Clone> MenuRegistry<A> {
    /// Give the named menu the whole terminal until it exits.
    ///
    /// Returns `Some(action)` when a widget's action is chosen (from this
    /// menu or any submenu it opens) and `None` when the user backs out with
    /// Escape. Backing out of a submenu returns to this menu.
    pub fn run_menu<C: Console>(&mut self, name: &str, surface: &mut Surface<C>) -> Result<Option<A>, UiError> {
        info!("Entering menu '{}'", name);
        self.paint(name, surface, true)?;

        loop {
            surface.flush()?;
            let key = surface.read_key()?;
            let input = match self.grids.get_mut(name) {
                Some(grid) => grid.handle_key(key),
                None => self.menu_mut(name)?.handle_key(key),
            };

            match input {
                MenuInput::Activated(action) => {
                    info!("Menu '{}' chose an action", name);
                    return Ok(Some(action));
                }
                MenuInput::Back => {
                    info!("Leaving menu '{}'", name);
                    return Ok(None);
                }
                MenuInput::OpenSubmenu(child) => {
                    if let Some(action) = self.run_menu(&child, surface)? {
                        return Ok(Some(action));
                    }
                    self.paint(name, surface, true)?;
                }
                MenuInput::Moved => self.paint(name, surface, false)?,
                MenuInput::Removed(_) => self.paint(name, surface, true)?,
                MenuInput::Idle | MenuInput::Unhandled(_) => {}
            }
        }
    }

    /// Paint a menu running in its own loop. `full` repaints the frame too.
    fn paint<C: Console>(&self, name: &str, surface: &mut Surface<C>, full: bool) -> Result<(), UiError> {
        if let Some(grid) = self.grids.get(name) {
            if full {
                grid.render(surface)?;
            } else {
                grid.render_items(surface)?;
            }
            return Ok(());
        }

        let menu = self.menu(name)?;
        if full {
            surface.clear()?;
            surface.draw_border()?;
        }
        let (width, height) = menu.extent();
        let x = centered_x(surface.width(), usize::from(width));
        let y = surface.height().saturating_sub(height) / 2;
        menu.draw(surface, x, y)?;
        Ok(())
    }
}
