//! Test utilities shared across the crate.
//!
//! This module is only compiled during tests (`#[cfg(test)]`).

use crate::core::config::BorderStyle;
use crate::core::deck::{Deck, Difficulty, FlashCard};
use crate::tui::assets::{AssetStore, builtin_store};
use crate::tui::console::HeadlessConsole;
use crate::tui::registry::MenuRegistry;
use crate::tui::scene::SceneContext;
use crate::tui::surface::Surface;

/// A surface over an empty in-memory console.
pub fn headless_surface(width: u16, height: u16) -> Surface<HeadlessConsole> {
    Surface::new(HeadlessConsole::new(width, height), BorderStyle::Plain)
        .expect("headless console never fails to report its size")
}

fn card(question: &str, answer: &str, difficulty: Difficulty, times_answered: u32) -> FlashCard {
    FlashCard {
        question: question.to_string(),
        answer: answer.to_string(),
        difficulty,
        times_answered,
    }
}

/// Four cards, one of each rating bucket except Unknown.
pub fn sample_deck() -> Deck {
    Deck {
        name: "Trivia".to_string(),
        cards: vec![
            card("What is the capital of Peru?", "Lima", Difficulty::High, 2),
            card("How many legs does a spider have?", "Eight", Difficulty::Low, 1),
            card("What does CPU stand for?", "Central Processing Unit", Difficulty::Medium, 0),
            card("Which planet has the most moons?", "Saturn", Difficulty::High, 4),
        ],
    }
}

/// Owns everything a [`SceneContext`] borrows, for driving one scene by hand.
pub struct SceneRig<A> {
    pub surface: Surface<HeadlessConsole>,
    pub menus: MenuRegistry<A>,
    pub assets: AssetStore,
}

impl<A> SceneRig<A> {
    pub fn new(width: u16, height: u16) -> Self {
        Self {
            surface: headless_surface(width, height),
            menus: MenuRegistry::new(),
            assets: builtin_store(),
        }
    }

    pub fn ctx(&mut self) -> SceneContext<'_, HeadlessConsole, A> {
        SceneContext {
            surface: &mut self.surface,
            menus: &mut self.menus,
            assets: &mut self.assets,
        }
    }

    pub fn console(&mut self) -> &mut HeadlessConsole {
        self.surface.console_mut()
    }

    pub fn screen(&self) -> String {
        self.surface.console().text()
    }
}
