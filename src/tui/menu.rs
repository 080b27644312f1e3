//! # Linear Menu
//!
//! An ordered row or column of [`Widget`]s with one focused entry.
//!
//! Selection either wraps around the ends or stops at them, chosen per menu
//! with [`SelectionPolicy`]. Disabled widgets are never focused.

use std::io;

use log::debug;

use super::console::Console;
use super::event::Key;
use super::surface::Surface;
use super::widget::{Widget, WidgetAction};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Layout {
    Horizontal,
    Vertical,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SelectionPolicy {
    /// Moving past either end continues from the other end.
    Wrap,
    /// Moving past either end stays put.
    Clamp,
}

impl SelectionPolicy {
    pub fn from_wrap(wrap: bool) -> Self {
        if wrap { SelectionPolicy::Wrap } else { SelectionPolicy::Clamp }
    }
}

/// Result of feeding one key to a menu.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MenuInput<A> {
    /// The focus changed.
    Moved,
    Activated(A),
    /// The focused widget opens the named submenu.
    OpenSubmenu(String),
    /// Escape.
    Back,
    /// A grid item was removed; carries its label.
    Removed(String),
    /// Navigation that changed nothing, or activation with nothing focused.
    Idle,
    /// A key the menu has no use for. Scenes handle their own shortcuts here.
    Unhandled(Key),
}

impl<A> MenuInput<A> {
    /// Whether the menu's visible state may have changed.
    pub fn changed_view(&self) -> bool {
        matches!(self, MenuInput::Moved | MenuInput::Removed(_))
    }
}

#[derive(Debug, Clone)]
pub struct Menu<A> {
    widgets: Vec<Widget<A>>,
    selected: Option<usize>,
    layout: Layout,
    policy: SelectionPolicy,
}

impl<A> Menu<A> {
    pub fn new(layout: Layout, policy: SelectionPolicy) -> Self {
        Self {
            widgets: Vec::new(),
            selected: None,
            layout,
            policy,
        }
    }

    pub fn layout(&self) -> Layout {
        self.layout
    }

    pub fn policy(&self) -> SelectionPolicy {
        self.policy
    }

    pub fn add(&mut self, widget: Widget<A>) -> &mut Self {
        self.widgets.push(widget);
        if self.selected.is_none() {
            self.selected = self.first_enabled();
        }
        self
    }

    pub fn add_action(&mut self, label: impl Into<String>, action: A) -> &mut Self {
        self.add(Widget::action(label, action))
    }

    pub fn add_submenu(&mut self, label: impl Into<String>, menu_name: impl Into<String>) -> &mut Self {
        self.add(Widget::submenu(label, menu_name))
    }

    pub fn clear(&mut self) {
        self.widgets.clear();
        self.selected = None;
    }

    pub fn len(&self) -> usize {
        self.widgets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.widgets.is_empty()
    }

    pub fn widgets(&self) -> &[Widget<A>] {
        &self.widgets
    }

    pub fn selected(&self) -> Option<usize> {
        self.selected
    }

    pub fn selected_widget(&self) -> Option<&Widget<A>> {
        self.selected.and_then(|i| self.widgets.get(i))
    }

    /// Focus `index` if it names an enabled widget.
    pub fn select(&mut self, index: usize) -> bool {
        match self.widgets.get(index) {
            Some(widget) if widget.is_enabled() => {
                self.selected = Some(index);
                true
            }
            _ => false,
        }
    }

    pub fn set_enabled(&mut self, index: usize, enabled: bool) {
        let Some(widget) = self.widgets.get_mut(index) else {
            return;
        };
        widget.set_enabled(enabled);
        match self.selected {
            Some(current) if current == index && !enabled => {
                if !self.select_next() {
                    self.selected = self.first_enabled();
                }
            }
            None if enabled => self.selected = Some(index),
            _ => {}
        }
    }

    /// Returns whether the focus moved.
    pub fn select_next(&mut self) -> bool {
        self.step(true)
    }

    /// Returns whether the focus moved.
    pub fn select_previous(&mut self) -> bool {
        self.step(false)
    }

    fn step(&mut self, forward: bool) -> bool {
        let n = self.widgets.len();
        let Some(current) = self.selected else {
            return false;
        };

        let candidates: Vec<usize> = match (self.policy, forward) {
            (SelectionPolicy::Wrap, true) => (1..n).map(|k| (current + k) % n).collect(),
            (SelectionPolicy::Wrap, false) => (1..n).map(|k| (current + n - k) % n).collect(),
            (SelectionPolicy::Clamp, true) => (current + 1..n).collect(),
            (SelectionPolicy::Clamp, false) => (0..current).rev().collect(),
        };

        match candidates.into_iter().find(|&i| self.widgets[i].is_enabled()) {
            Some(next) if next != current => {
                self.selected = Some(next);
                true
            }
            _ => false,
        }
    }

    fn first_enabled(&self) -> Option<usize> {
        self.widgets.iter().position(Widget::is_enabled)
    }

    /// `(width, height)` the menu occupies when drawn.
    pub fn extent(&self) -> (u16, u16) {
        match self.layout {
            Layout::Horizontal => {
                let widths: u16 = self.widgets.iter().map(Widget::width).sum();
                let gutters = self.widgets.len().saturating_sub(1) as u16;
                (widths + gutters, u16::from(!self.widgets.is_empty()))
            }
            Layout::Vertical => (self.max_width(), self.widgets.len() as u16),
        }
    }

    pub fn max_width(&self) -> u16 {
        self.widgets.iter().map(Widget::width).max().unwrap_or(0)
    }

    pub fn draw<C: Console>(&self, surface: &mut Surface<C>, x: u16, y: u16) -> io::Result<()> {
        let mut cursor_x = x;
        for (index, widget) in self.widgets.iter().enumerate() {
            let selected = self.selected == Some(index);
            match self.layout {
                Layout::Horizontal => {
                    widget.draw(surface, cursor_x, y, selected)?;
                    cursor_x = cursor_x.saturating_add(widget.width() + 1);
                }
                Layout::Vertical => widget.draw(surface, x, y.saturating_add(index as u16), selected)?,
            }
        }
        Ok(())
    }
}

impl<A: Clone> Menu<A> {
    pub fn activate_selected(&self) -> Option<WidgetAction<A>> {
        self.selected_widget().and_then(Widget::activate)
    }

    /// Arrows move (Up/Left back, Down/Right forward), Enter activates,
    /// Escape backs out.
    pub fn handle_key(&mut self, key: Key) -> MenuInput<A> {
        let input = match key {
            Key::Arrow(direction) => {
                let moved = if direction.is_backward() { self.select_previous() } else { self.select_next() };
                if moved { MenuInput::Moved } else { MenuInput::Idle }
            }
            Key::Enter => match self.activate_selected() {
                Some(WidgetAction::Run(action)) => MenuInput::Activated(action),
                Some(WidgetAction::Open(name)) => MenuInput::OpenSubmenu(name),
                None => MenuInput::Idle,
            },
            Key::Escape => MenuInput::Back,
            other => MenuInput::Unhandled(other),
        };
        debug!("Menu key {:?} -> selection {:?}", key, self.selected);
        input
    }

    /// Block for one key and apply it.
    pub fn handle_input<C: Console>(&mut self, surface: &mut Surface<C>) -> io::Result<MenuInput<A>> {
        let key = surface.read_key()?;
        Ok(self.handle_key(key))
    }
}
