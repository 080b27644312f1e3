//! # TUI Adapter
//!
//! The terminal side of StudyDungeon: a cell-addressed drawing surface over
//! a [`Console`](console::Console), menus and grids of widgets, and a scene
//! host that drives one screen at a time.
//!
//! This is the only module that knows about ratatui and crossterm.
//!
//! ## Redraw Strategy
//!
//! There is no frame loop. Each tick the active scene renders, then blocks
//! on input (or polls, while a study timer is running). Scenes split their
//! output into a static layer painted once per visit and a dynamic layer
//! repainted only when marked dirty, so an idle tick writes nothing.

pub mod assets;
pub mod console;
pub mod error;
pub mod event;
pub mod grid;
pub mod host;
pub mod menu;
pub mod registry;
pub mod scene;
pub mod scenes;
pub mod surface;
pub mod widget;

use std::io::stdout;

use log::info;

use crate::core::config::ResolvedConfig;
use assets::builtin_store;
use console::{CrosstermConsole, TerminalGuard};
use error::UiError;
use host::SceneHost;
use menu::SelectionPolicy;
use scenes::{Library, Router, SceneId};
use surface::Surface;

/// Take over the terminal and run the app until the user quits.
pub fn run(config: ResolvedConfig) -> Result<(), UiError> {
    let _terminal_guard = TerminalGuard::new()?;
    let surface = Surface::new(CrosstermConsole::new(stdout()), config.border)?;
    info!("Surface ready at {}x{}", surface.width(), surface.height());

    let library = Library::load(config.deck_dir, config.settings).shared();
    let router = Router::new(library, SelectionPolicy::from_wrap(config.menu_wrap));
    let mut host = SceneHost::new(surface, builtin_store(), router);

    host.set_active_scene(SceneId::MainMenu)?;
    host.run();
    info!("Scene host stopped");
    Ok(())
}
