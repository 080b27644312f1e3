//! # Scenes
//!
//! A scene is one screen's worth of UI: it draws itself, reads input, and
//! asks the host to go somewhere else by returning a [`Navigation`] value.
//! Scenes never construct or reference each other.
//!
//! ## Redraw discipline
//!
//! Every render follows the same two-tier pattern:
//!
//! 1. If the static layer (border, art, labels that never change) is not
//!    drawn, paint it, mark it drawn, and mark the dynamic layer dirty.
//! 2. If the dynamic layer is clean, return without writing anything.
//! 3. Otherwise blank just the dynamic regions, redraw them, mark clean.
//!
//! The host clears every scene's static flag when the active scene changes
//! or the terminal is resized, which is what forces a full repaint on return.

use super::assets::AssetStore;
use super::console::Console;
use super::error::UiError;
use super::registry::MenuRegistry;
use super::surface::Surface;

/// What a scene wants the host to do after a hook.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Navigation<Id> {
    None,
    /// Return to the scene that navigated here.
    GoBack,
    GoTo(Id),
    Quit,
}

/// Everything a scene may touch during one hook call.
pub struct SceneContext<'a, C: Console, A> {
    pub surface: &'a mut Surface<C>,
    pub menus: &'a mut MenuRegistry<A>,
    pub assets: &'a mut AssetStore,
}

pub trait Scene<C: Console, A, Id> {
    /// Called each time the scene becomes active.
    fn init(&mut self, _ctx: &mut SceneContext<'_, C, A>) -> Result<(), UiError> {
        Ok(())
    }

    /// Per-tick logic that doesn't depend on input (timers and the like).
    fn update(&mut self, _ctx: &mut SceneContext<'_, C, A>) -> Result<Navigation<Id>, UiError> {
        Ok(Navigation::None)
    }

    fn render(&mut self, ctx: &mut SceneContext<'_, C, A>) -> Result<(), UiError>;

    /// Read input (normally one blocking key) and react to it.
    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, A>) -> Result<Navigation<Id>, UiError>;

    fn static_drawn(&self) -> bool;

    fn set_static_drawn(&mut self, drawn: bool);
}

/// Builds scenes on demand for the host.
pub trait SceneFactory<C: Console, A, Id> {
    fn create(&mut self, id: &Id, ctx: &mut SceneContext<'_, C, A>) -> Result<Box<dyn Scene<C, A, Id>>, UiError>;

    /// Scenes whose contents depend on state that may have changed since
    /// they were built return true here and are rebuilt on every visit.
    fn rebuild_on_visit(&self, _id: &Id) -> bool {
        false
    }
}
