//! A single selectable, labeled menu entry.

use std::io;

use ratatui::style::{Color, Modifier, Style};
use unicode_width::UnicodeWidthStr;

use super::console::Console;
use super::surface::Surface;

/// What a widget does when activated: hand back an action value, or open
/// the named submenu. Never both.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WidgetAction<A> {
    Run(A),
    Open(String),
}

#[derive(Debug, Clone)]
pub struct Widget<A> {
    label: String,
    action: WidgetAction<A>,
    enabled: bool,
}

impl<A> Widget<A> {
    pub fn action(label: impl Into<String>, action: A) -> Self {
        Self {
            label: label.into(),
            action: WidgetAction::Run(action),
            enabled: true,
        }
    }

    pub fn submenu(label: impl Into<String>, menu_name: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            action: WidgetAction::Open(menu_name.into()),
            enabled: true,
        }
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    pub fn label(&self) -> &str {
        &self.label
    }

    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    pub fn set_enabled(&mut self, enabled: bool) {
        self.enabled = enabled;
    }

    pub fn is_submenu(&self) -> bool {
        matches!(self.action, WidgetAction::Open(_))
    }

    /// Rendered width including brackets.
    pub fn width(&self) -> u16 {
        (self.label.width() + 2) as u16
    }

    /// Draws `[label]`. Focused widgets are reversed and bold; unfocused ones
    /// show an underlined cyan label; disabled ones are grayed out.
    pub fn draw<C: Console>(&self, surface: &mut Surface<C>, x: u16, y: u16, selected: bool) -> io::Result<()> {
        if !self.enabled {
            let text = format!("[{}]", self.label);
            return surface.draw_styled_text(&text, x, y, Style::default().fg(Color::DarkGray));
        }

        if selected {
            let style = Style::default().add_modifier(Modifier::REVERSED | Modifier::BOLD);
            let text = format!("[{}]", self.label);
            return surface.draw_styled_text(&text, x, y, style);
        }

        let bracket = Style::default().fg(Color::DarkGray);
        let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::UNDERLINED);
        let label_width = self.label.width() as u16;
        surface.draw_styled_text("[", x, y, bracket)?;
        surface.draw_styled_text(&self.label, x + 1, y, label)?;
        surface.draw_styled_text("]", x + 1 + label_width, y, bracket)
    }
}

impl<A: Clone> Widget<A> {
    /// The widget's action, or `None` while disabled. Entering a submenu is
    /// up to the menu that owns this widget.
    pub fn activate(&self) -> Option<WidgetAction<A>> {
        self.enabled.then(|| self.action.clone())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::headless_surface;

    #[test]
    fn test_activate_action_and_submenu() {
        let run = Widget::action("Go", 7);
        assert_eq!(run.activate(), Some(WidgetAction::Run(7)));
        assert!(!run.is_submenu());

        let open: Widget<i32> = Widget::submenu("More", "tips");
        assert_eq!(open.activate(), Some(WidgetAction::Open("tips".to_string())));
        assert!(open.is_submenu());
    }

    #[test]
    fn test_disabled_does_not_activate() {
        let widget = Widget::action("Nope", ()).disabled();
        assert_eq!(widget.activate(), None);
    }

    #[test]
    fn test_width_counts_brackets() {
        assert_eq!(Widget::action("Quit", ()).width(), 6);
    }

    #[test]
    fn test_draw_selected_and_unselected_styles() {
        let mut surface = headless_surface(12, 2);
        let widget = Widget::action("Ok", ());
        widget.draw(&mut surface, 0, 0, true).unwrap();
        widget.draw(&mut surface, 0, 1, false).unwrap();

        let console = surface.console();
        assert_eq!(&console.row(0)[..4], "[Ok]");
        assert_eq!(&console.row(1)[..4], "[Ok]");
        let selected = console.cell_style(1, 0).unwrap();
        assert!(selected.add_modifier.contains(Modifier::REVERSED));
        let unselected = console.cell_style(1, 1).unwrap();
        assert_eq!(unselected.fg, Some(Color::Cyan));
        assert!(unselected.add_modifier.contains(Modifier::UNDERLINED));
    }
}
