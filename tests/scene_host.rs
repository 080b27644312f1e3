//! Scene host behaviour driven through the public API with a headless console.

use std::cell::RefCell;
use std::rc::Rc;

use studydungeon::core::config::{BorderStyle, StudySettings};
use studydungeon::core::deck::{Deck, Difficulty, FlashCard, load_decks, save_deck};
use studydungeon::core::study::StudySummary;
use studydungeon::tui::assets::builtin_store;
use studydungeon::tui::console::{Console, HeadlessConsole};
use studydungeon::tui::error::UiError;
use studydungeon::tui::event::Key;
use studydungeon::tui::host::{Flow, SceneHost};
use studydungeon::tui::menu::SelectionPolicy;
use studydungeon::tui::scene::{Navigation, Scene, SceneContext, SceneFactory};
use studydungeon::tui::scenes::{Library, Router, SceneId};
use studydungeon::tui::surface::Surface;

// ============================================================================
// Test scenes
// ============================================================================

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Screen {
    A,
    B,
    C,
}

type Log = Rc<RefCell<Vec<String>>>;

/// Paints its name once per visit and records every static repaint.
///
/// Keys: `a`/`b`/`c` go to that screen, Backspace goes back, Escape quits,
/// `e` fails the hook.
struct Marker {
    screen: Screen,
    log: Log,
    static_drawn: bool,
}

impl<C: Console> Scene<C, (), Screen> for Marker {
    fn render(&mut self, ctx: &mut SceneContext<'_, C, ()>) -> Result<(), UiError> {
        if self.static_drawn {
            return Ok(());
        }
        ctx.surface.clear()?;
        ctx.surface.draw_text(&format!("screen {:?}", self.screen), 1, 1)?;
        self.log.borrow_mut().push(format!("paint {:?}", self.screen));
        self.static_drawn = true;
        Ok(())
    }

    fn handle_input(&mut self, ctx: &mut SceneContext<'_, C, ()>) -> Result<Navigation<Screen>, UiError> {
        let navigation = match ctx.surface.read_key()? {
            Key::Char('a') => Navigation::GoTo(Screen::A),
            Key::Char('b') => Navigation::GoTo(Screen::B),
            Key::Char('c') => Navigation::GoTo(Screen::C),
            Key::Char('e') => return Err(UiError::NoSuchDeck(9)),
            Key::Backspace => Navigation::GoBack,
            Key::Escape => Navigation::Quit,
            _ => Navigation::None,
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

struct MarkerFactory {
    log: Log,
    /// Screen the factory refuses to build.
    broken: Option<Screen>,
}

impl<C: Console> SceneFactory<C, (), Screen> for MarkerFactory {
    fn create(&mut self, id: &Screen, _ctx: &mut SceneContext<'_, C, ()>) -> Result<Box<dyn Scene<C, (), Screen>>, UiError> {
        if self.broken == Some(*id) {
            return Err(UiError::NoSuchDeck(7));
        }
        self.log.borrow_mut().push(format!("build {id:?}"));
        Ok(Box::new(Marker {
            screen: *id,
            log: Rc::clone(&self.log),
            static_drawn: false,
        }))
    }
}

type MarkerHost = SceneHost<HeadlessConsole, (), Screen, MarkerFactory>;

fn marker_host() -> (MarkerHost, Log) {
    host_with_broken(None)
}

fn host_with_broken(broken: Option<Screen>) -> (MarkerHost, Log) {
    let log = Log::default();
    let surface = Surface::new(HeadlessConsole::new(40, 12), BorderStyle::Plain).unwrap();
    let factory = MarkerFactory {
        log: Rc::clone(&log),
        broken,
    };
    let mut host = SceneHost::new(surface, builtin_store(), factory);
    host.set_active_scene(Screen::A).unwrap();
    (host, log)
}

fn push(host: &mut MarkerHost, keys: &[Key]) {
    host.surface_mut().console_mut().push_keys(keys.iter().copied());
}

// ============================================================================
// Host behaviour
// ============================================================================

#[test]
fn test_returning_scene_repaints_static_layer() {
    let (mut host, log) = marker_host();
    push(&mut host, &[Key::Char('b'), Key::Backspace]);
    host.run();

    assert_eq!(host.active_id(), Some(&Screen::A));
    assert_eq!(host.static_drawn(&Screen::B), Some(false));
    assert_eq!(
        *log.borrow(),
        vec!["build A", "paint A", "build B", "paint B", "paint A"],
        "A is reused from the cache but painted again"
    );
    assert!(host.surface().console().text().contains("screen A"));
}

#[test]
fn test_idle_render_writes_nothing() {
    let (mut host, _log) = marker_host();
    host.render().unwrap();
    let writes = host.surface().console().write_count();
    host.render().unwrap();
    host.render().unwrap();
    assert_eq!(host.surface().console().write_count(), writes);
}

#[test]
fn test_failed_hook_keeps_loop_running() {
    let (mut host, _log) = marker_host();
    push(&mut host, &[Key::Char('e'), Key::Char('b'), Key::Escape]);
    assert_eq!(host.tick(), Flow::Continue);
    assert_eq!(host.active_id(), Some(&Screen::A));
    assert_eq!(host.tick(), Flow::Continue);
    assert_eq!(host.active_id(), Some(&Screen::B));
    assert_eq!(host.tick(), Flow::Quit);
}

#[test]
fn test_exhausted_script_stops_loop() {
    let (mut host, _log) = marker_host();
    assert_eq!(host.tick(), Flow::Quit);
}

#[test]
fn test_history_unwinds_to_revisited_scene() {
    let (mut host, _log) = marker_host();
    push(&mut host, &[Key::Char('b'), Key::Char('c')]);
    host.tick();
    host.tick();
    assert_eq!(host.history(), &[Screen::A, Screen::B]);

    push(&mut host, &[Key::Char('a')]);
    host.tick();
    assert_eq!(host.active_id(), Some(&Screen::A));
    assert!(host.history().is_empty());

    // Nowhere to go back to
    assert_eq!(host.navigate(Navigation::GoBack).unwrap(), Flow::Continue);
    assert_eq!(host.active_id(), Some(&Screen::A));
}

#[test]
fn test_failed_build_leaves_history_alone() {
    let (mut host, _log) = host_with_broken(Some(Screen::C));
    push(&mut host, &[Key::Char('b'), Key::Char('c')]);
    host.tick();
    assert_eq!(host.tick(), Flow::Continue, "the failure is logged, not fatal");
    assert_eq!(host.active_id(), Some(&Screen::B));
    assert_eq!(host.history(), &[Screen::A]);

    assert!(host.navigate(Navigation::GoTo(Screen::C)).is_err());
    assert_eq!(host.history(), &[Screen::A]);
    host.navigate(Navigation::GoBack).unwrap();
    assert_eq!(host.active_id(), Some(&Screen::A));
}

#[test]
fn test_resize_kept() {
    let (mut host, _log) = marker_host();
    host.render().unwrap();
    assert!(!host.check_resize().unwrap(), "nothing changed yet");

    host.surface_mut().console_mut().resize_to(60, 20);
    push(&mut host, &[Key::Char('Y')]);
    assert!(host.check_resize().unwrap());
    assert_eq!((host.surface().width(), host.surface().height()), (60, 20));
    assert_eq!(host.static_drawn(&Screen::A), Some(false));
}

#[test]
fn test_resize_reverted() {
    let (mut host, log) = marker_host();
    host.render().unwrap();
    host.surface_mut().console_mut().resize_to(60, 20);
    push(&mut host, &[Key::Char('x'), Key::Char('n')]);
    assert!(host.check_resize().unwrap());

    assert_eq!((host.surface().width(), host.surface().height()), (40, 12));
    assert_eq!(host.surface_mut().query_size().unwrap(), (40, 12));
    host.render().unwrap();
    assert_eq!(log.borrow().last().map(String::as_str), Some("paint A"));
    assert_eq!(log.borrow().iter().filter(|entry| *entry == "paint A").count(), 2);
}

// ============================================================================
// Full app through the router
// ============================================================================

const DOWN: [u8; 2] = [0xE0, 80];
const UP: [u8; 2] = [0xE0, 72];
const RIGHT: [u8; 2] = [0xE0, 77];
const ENTER: u8 = 13;
const ESCAPE: u8 = 27;

type AppHost = SceneHost<HeadlessConsole, studydungeon::tui::scenes::Command, SceneId, Router>;

fn app(dir: &std::path::Path, settings: StudySettings) -> AppHost {
    let library = Library::load(dir, settings).shared();
    let surface = Surface::new(HeadlessConsole::new(80, 24), BorderStyle::Plain).unwrap();
    let mut host = SceneHost::new(surface, builtin_store(), Router::new(library, SelectionPolicy::Wrap));
    host.set_active_scene(SceneId::MainMenu).unwrap();
    host
}

fn script(host: &mut AppHost, bytes: &[u8]) {
    host.surface_mut().console_mut().push_scan_codes(bytes);
}

fn geography() -> Deck {
    let mut deck = Deck::new("Geography");
    deck.cards = vec![
        FlashCard::new("Capital of France?", "Paris"),
        FlashCard::new("Capital of Japan?", "Tokyo"),
        FlashCard::new("Capital of Kenya?", "Nairobi"),
    ];
    deck
}

#[test]
fn test_settings_round_trip_then_quit() {
    let dir = tempfile::tempdir().unwrap();
    let mut host = app(dir.path(), StudySettings::new(10, 5));

    let mut keys = Vec::new();
    keys.extend(DOWN);
    keys.extend(DOWN);
    keys.push(ENTER); // Settings
    keys.push(ENTER); // Increment Cards
    keys.push(ESCAPE); // back to the main menu, still on Settings
    keys.extend(UP);
    keys.extend(DOWN);
    keys.extend(DOWN);
    keys.extend(DOWN); // Quit
    keys.push(ENTER);
    script(&mut host, &keys);
    host.run();

    assert_eq!(host.active_id(), Some(&SceneId::MainMenu));
    assert!(host.history().is_empty());
    assert_eq!(host.factory().library().borrow().settings.card_limit(), 11);
    assert_eq!(host.surface().console().pending_keys(), 0);
}

#[test]
fn test_study_round_reaches_results_and_saves() {
    let dir = tempfile::tempdir().unwrap();
    save_deck(dir.path(), &geography()).unwrap();
    let mut host = app(dir.path(), StudySettings::new(2, 5));

    let mut keys = vec![ENTER, ENTER]; // Begin Study, first deck
    keys.push(b' ');
    keys.push(ENTER); // Easy
    keys.push(b' ');
    keys.extend(RIGHT);
    keys.extend(RIGHT);
    keys.push(ENTER); // Hard
    script(&mut host, &keys);
    host.run();

    let expected = StudySummary {
        deck: "Geography".to_string(),
        easy: 1,
        medium: 0,
        hard: 1,
        complete: true,
    };
    assert_eq!(host.active_id(), Some(&SceneId::Results(expected)));
    assert!(host.surface().console().text().contains("Easy: 1"));

    let saved = load_decks(dir.path());
    let ratings: Vec<Difficulty> = saved[0].cards.iter().map(|card| card.difficulty).collect();
    assert_eq!(ratings.iter().filter(|d| **d == Difficulty::Low).count(), 1);
    assert_eq!(ratings.iter().filter(|d| **d == Difficulty::High).count(), 1);
}

#[test]
fn test_results_menu_returns_to_main_menu() {
    let dir = tempfile::tempdir().unwrap();
    save_deck(dir.path(), &geography()).unwrap();
    let mut host = app(dir.path(), StudySettings::new(2, 5));

    // Leave the round at once, then pick Main Menu on the results screen
    script(&mut host, &[ENTER, ENTER, ESCAPE, ENTER]);
    host.run();

    assert_eq!(host.active_id(), Some(&SceneId::MainMenu));
    assert!(host.history().is_empty());
    assert!(host.surface().console().text().contains("[Begin Study]"));
}
