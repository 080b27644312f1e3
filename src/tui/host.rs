//! # Scene Host
//!
//! Owns the surface, the menu registry and the art store, and drives the
//! active scene through `update → render → handle_input` once per tick.
//!
//! Scenes are built lazily by a [`SceneFactory`] and cached, one per kind
//! of scene id. Navigation requests returned by scenes are applied here;
//! `GoBack` pops a history stack of visited ids, and going to an id that is
//! already on the stack unwinds the stack back to it.
//!
//! A tick never fails: errors from any hook are logged and the loop carries
//! on with the same scene.

use std::fmt::Debug;
use std::mem::discriminant;

use log::{debug, error, info, warn};

use super::assets::AssetStore;
use super::console::Console;
use super::error::UiError;
use super::event::Key;
use super::registry::MenuRegistry;
use super::scene::{Navigation, Scene, SceneContext, SceneFactory};
use super::surface::Surface;

/// Whether the outer loop should keep going.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Flow {
    Continue,
    Quit,
}

struct CachedScene<C: Console, A, Id> {
    id: Id,
    scene: Box<dyn Scene<C, A, Id>>,
}

pub struct SceneHost<C: Console, A, Id, F> {
    surface: Surface<C>,
    menus: MenuRegistry<A>,
    assets: AssetStore,
    factory: F,
    scenes: Vec<CachedScene<C, A, Id>>,
    active: Option<usize>,
    history: Vec<Id>,
}

impl<C, A, Id, F> SceneHost<C, A, Id, F>
where
    C: Console,
    Id: Clone + PartialEq + Debug,
    F: SceneFactory<C, A, Id>,
{
    pub fn new(surface: Surface<C>, assets: AssetStore, factory: F) -> Self {
        Self {
            surface,
            menus: MenuRegistry::new(),
            assets,
            factory,
            scenes: Vec::new(),
            active: None,
            history: Vec::new(),
        }
    }

    pub fn surface(&self) -> &Surface<C> {
        &self.surface
    }

    pub fn surface_mut(&mut self) -> &mut Surface<C> {
        &mut self.surface
    }

    pub fn menus(&self) -> &MenuRegistry<A> {
        &self.menus
    }

    pub fn assets(&self) -> &AssetStore {
        &self.assets
    }

    pub fn factory(&self) -> &F {
        &self.factory
    }

    pub fn active_id(&self) -> Option<&Id> {
        self.active.map(|i| &self.scenes[i].id)
    }

    pub fn history(&self) -> &[Id] {
        &self.history
    }

    /// Static flag of the cached scene built for `id`, if there is one.
    pub fn static_drawn(&self, id: &Id) -> Option<bool> {
        self.scenes
            .iter()
            .find(|cached| &cached.id == id)
            .map(|cached| cached.scene.static_drawn())
    }

    fn invalidate_all(&mut self) {
        for cached in &mut self.scenes {
            cached.scene.set_static_drawn(false);
        }
    }

    /// Make `id` the active scene, building it if needed, and call its `init`.
    ///
    /// Every cached scene loses its static layer, so whichever scene shows
    /// next repaints in full.
    pub fn set_active_scene(&mut self, id: Id) -> Result<(), UiError> {
        self.invalidate_all();

        let Self {
            surface,
            menus,
            assets,
            factory,
            scenes,
            ..
        } = self;
        let mut ctx = SceneContext { surface, menus, assets };

        let slot = scenes.iter().position(|cached| discriminant(&cached.id) == discriminant(&id));
        let index = match slot {
            Some(i) if scenes[i].id == id && !factory.rebuild_on_visit(&id) => i,
            Some(i) => {
                debug!("Rebuilding scene {:?}", id);
                scenes[i] = CachedScene {
                    id: id.clone(),
                    scene: factory.create(&id, &mut ctx)?,
                };
                i
            }
            None => {
                debug!("Building scene {:?}", id);
                scenes.push(CachedScene {
                    id: id.clone(),
                    scene: factory.create(&id, &mut ctx)?,
                });
                scenes.len() - 1
            }
        };

        info!("Active scene -> {:?}", id);
        self.active = Some(index);
        let Self {
            surface,
            menus,
            assets,
            scenes,
            ..
        } = self;
        let mut ctx = SceneContext { surface, menus, assets };
        scenes[index].scene.init(&mut ctx)
    }

    fn with_active<R>(
        &mut self,
        hook: impl FnOnce(&mut dyn Scene<C, A, Id>, &mut SceneContext<'_, C, A>) -> Result<R, UiError>,
    ) -> Result<Option<R>, UiError> {
        let Some(index) = self.active else {
            return Ok(None);
        };
        let Self {
            surface,
            menus,
            assets,
            scenes,
            ..
        } = self;
        let mut ctx = SceneContext { surface, menus, assets };
        hook(scenes[index].scene.as_mut(), &mut ctx).map(Some)
    }

    pub fn update(&mut self) -> Result<Navigation<Id>, UiError> {
        Ok(self.with_active(|scene, ctx| scene.update(ctx))?.unwrap_or(Navigation::None))
    }

    pub fn render(&mut self) -> Result<(), UiError> {
        self.with_active(|scene, ctx| scene.render(ctx))?;
        self.surface.flush()?;
        Ok(())
    }

    pub fn handle_input(&mut self) -> Result<Navigation<Id>, UiError> {
        Ok(self.with_active(|scene, ctx| scene.handle_input(ctx))?.unwrap_or(Navigation::None))
    }

    /// Apply a scene's navigation request.
    pub fn navigate(&mut self, navigation: Navigation<Id>) -> Result<Flow, UiError> {
        match navigation {
            Navigation::None => {}
            Navigation::GoTo(id) => {
                let previous = self.active_id().cloned();
                let seen = self.history.iter().position(|visited| visited == &id);
                // A factory failure leaves the active scene and the history alone
                let switched = self.set_active_scene(id);
                if self.active_id() != previous.as_ref() {
                    // Going to a scene already on the stack unwinds back to it
                    if let Some(seen) = seen {
                        self.history.truncate(seen);
                    } else if let Some(previous) = previous {
                        self.history.push(previous);
                    }
                }
                switched?;
            }
            Navigation::GoBack => match self.history.pop() {
                Some(previous) => self.set_active_scene(previous)?,
                None => warn!("GoBack with empty history, staying put"),
            },
            Navigation::Quit => {
                info!("Quit requested");
                return Ok(Flow::Quit);
            }
        }
        Ok(Flow::Continue)
    }

    /// If the terminal size changed since the last tick, ask the user whether
    /// to keep it, then force every scene to repaint.
    ///
    /// Returns whether a resize was handled.
    pub fn check_resize(&mut self) -> Result<bool, UiError> {
        let (width, height) = self.surface.query_size()?;
        let (old_width, old_height) = (self.surface.width(), self.surface.height());
        if (width, height) == (old_width, old_height) {
            return Ok(false);
        }

        info!("Terminal resized {}x{} -> {}x{}", old_width, old_height, width, height);
        self.surface.apply_size(width, height);
        self.surface.clear()?;
        let style = self.surface.default_style();
        let middle = height / 2;
        self.surface
            .draw_centered_text(&format!("Window resized to {width}x{height}."), middle.saturating_sub(1), style)?;
        self.surface
            .draw_centered_text("Keep the new size? (Y/N)", middle, style)?;
        self.surface.flush()?;

        let keep = loop {
            match self.surface.read_key()? {
                key if key.letter() == Some('y') => break true,
                key if key.letter() == Some('n') => break false,
                Key::Escape => break false,
                _ => {}
            }
        };

        if keep {
            info!("Keeping new terminal size");
        } else {
            info!("Reverting terminal size");
            self.surface.apply_size(old_width, old_height);
            self.surface.restore_size()?;
        }
        self.invalidate_all();
        Ok(true)
    }

    fn try_tick(&mut self) -> Result<Flow, UiError> {
        self.check_resize()?;
        let navigation = self.update()?;
        if self.navigate(navigation)? == Flow::Quit {
            return Ok(Flow::Quit);
        }
        self.render()?;
        let navigation = self.handle_input()?;
        self.navigate(navigation)
    }

    /// One `update → render → handle_input` cycle.
    ///
    /// Errors are logged and swallowed. Running out of scripted input ends
    /// the loop.
    pub fn tick(&mut self) -> Flow {
        match self.try_tick() {
            Ok(flow) => flow,
            Err(e) if e.is_input_exhausted() => {
                info!("Input exhausted, stopping");
                Flow::Quit
            }
            Err(e) => {
                error!("Tick failed on {:?}: {}", self.active_id(), e);
                Flow::Continue
            }
        }
    }

    /// Tick until a scene asks to quit.
    pub fn run(&mut self) {
        while self.tick() == Flow::Continue {}
    }
}
