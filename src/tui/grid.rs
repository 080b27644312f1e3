//! # Grid Menu
//!
//! A 2-D menu where each item covers a rectangle of grid cells.
//!
//! ```text
//!   col:   0      1      2
//!        ┌──────┬──────┬──────┐
//! row 0  │  A   │  B (2x1)    │
//!        ├──────┼──────┴──────┤
//! row 1  │  C   │   (empty)   │
//!        └──────┴─────────────┘
//! ```
//!
//! The cursor is a single cell and may sit anywhere inside an item's
//! footprint. Arrow keys search from the cursor in a straight line, wrapping
//! at the grid edges, for the nearest cell owned by a different item.

use std::io;

use log::debug;
use ratatui::style::{Color, Style};
use unicode_width::UnicodeWidthStr;

use super::console::Console;
use super::event::Key;
use super::menu::MenuInput;
use super::surface::{Surface, centered_x};
use super::widget::{Widget, WidgetAction};

/// Cells `[row, row + height) x [col, col + width)`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Footprint {
    pub row: usize,
    pub col: usize,
    pub width: usize,
    pub height: usize,
}

impl Footprint {
    pub fn new(row: usize, col: usize, width: usize, height: usize) -> Self {
        Self {
            row,
            col,
            width: width.max(1),
            height: height.max(1),
        }
    }

    pub fn cell(row: usize, col: usize) -> Self {
        Self::new(row, col, 1, 1)
    }

    pub fn contains(&self, row: usize, col: usize) -> bool {
        row >= self.row && row < self.row + self.height && col >= self.col && col < self.col + self.width
    }

    fn overlaps(&self, other: &Footprint) -> bool {
        self.row < other.row + other.height
            && other.row < self.row + self.height
            && self.col < other.col + other.width
            && other.col < self.col + self.width
    }
}

#[derive(Debug, Clone)]
pub struct GridItem<A> {
    pub widget: Widget<A>,
    pub footprint: Footprint,
}

#[derive(Debug, Clone)]
pub struct GridMenu<A> {
    title: String,
    rows: usize,
    cols: usize,
    items: Vec<GridItem<A>>,
    cursor: (usize, usize),
    removable: bool,
}

impl<A> GridMenu<A> {
    /// A `rows x cols` grid. Zero dimensions are bumped to 1.
    pub fn new(title: impl Into<String>, rows: usize, cols: usize) -> Self {
        Self {
            title: title.into(),
            rows: rows.max(1),
            cols: cols.max(1),
            items: Vec::new(),
            cursor: (0, 0),
            removable: false,
        }
    }

    /// Let the `D` key remove the item under the cursor.
    pub fn with_removal(mut self, removable: bool) -> Self {
        self.removable = removable;
        self
    }

    pub fn title(&self) -> &str {
        &self.title
    }

    pub fn dimensions(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    pub fn items(&self) -> &[GridItem<A>] {
        &self.items
    }

    pub fn len(&self) -> usize {
        self.items.len()
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    pub fn cursor(&self) -> (usize, usize) {
        self.cursor
    }

    /// Footprints must not overlap each other or leave the grid; that is on
    /// the caller. The first item added takes the cursor.
    pub fn add_item(&mut self, widget: Widget<A>, footprint: Footprint) -> &mut Self {
        debug_assert!(
            self.items.iter().all(|item| !item.footprint.overlaps(&footprint)),
            "grid item {:?} overlaps an existing item",
            footprint
        );
        debug_assert!(
            footprint.row + footprint.height <= self.rows && footprint.col + footprint.width <= self.cols,
            "grid item {:?} leaves the {}x{} grid",
            footprint,
            self.rows,
            self.cols
        );
        if !self.is_valid_cell(self.cursor.0, self.cursor.1) {
            self.cursor = (footprint.row, footprint.col);
        }
        self.items.push(GridItem { widget, footprint });
        self
    }

    pub fn clear(&mut self) {
        self.items.clear();
        self.cursor = (0, 0);
    }

    pub fn is_valid_cell(&self, row: usize, col: usize) -> bool {
        self.item_index_at(row, col).is_some()
    }

    pub fn item_at(&self, row: usize, col: usize) -> Option<&GridItem<A>> {
        self.item_index_at(row, col).map(|i| &self.items[i])
    }

    fn item_index_at(&self, row: usize, col: usize) -> Option<usize> {
        self.items.iter().position(|item| item.footprint.contains(row, col))
    }

    pub fn selected_item(&self) -> Option<&GridItem<A>> {
        self.item_at(self.cursor.0, self.cursor.1)
    }

    /// Walk from `(from_row, from_col)` by `(row_delta, col_delta)`, wrapping
    /// at the edges, to the first cell owned by a different item.
    ///
    /// When starting inside an item the walk begins at that item's far edge
    /// in the direction of travel. If nothing is found the start cell comes
    /// back unchanged; an invalid start with nothing in line falls back to the
    /// first item's anchor, so the result is a valid cell whenever the grid
    /// has items.
    pub fn find_next_valid_item(&self, from_row: usize, from_col: usize, row_delta: i32, col_delta: i32) -> (usize, usize) {
        let start_item = self.item_index_at(from_row, from_col);
        let (mut row, mut col) = (from_row as i64, from_col as i64);

        if let Some(index) = start_item {
            let fp = self.items[index].footprint;
            if col_delta > 0 {
                col = (fp.col + fp.width - 1) as i64;
            } else if col_delta < 0 {
                col = fp.col as i64;
            }
            if row_delta > 0 {
                row = (fp.row + fp.height - 1) as i64;
            } else if row_delta < 0 {
                row = fp.row as i64;
            }
        }

        if row_delta != 0 || col_delta != 0 {
            let (rows, cols) = (self.rows as i64, self.cols as i64);
            for _ in 0..self.rows * self.cols {
                row = (row + i64::from(row_delta)).rem_euclid(rows);
                col = (col + i64::from(col_delta)).rem_euclid(cols);
                let (r, c) = (row as usize, col as usize);
                match self.item_index_at(r, c) {
                    Some(found) if Some(found) != start_item => return (r, c),
                    _ => {}
                }
                if (r, c) == (from_row, from_col) {
                    break;
                }
            }
        }

        if start_item.is_none() {
            if let Some(first) = self.items.first() {
                return (first.footprint.row, first.footprint.col);
            }
        }
        (from_row, from_col)
    }

    /// Move the cursor. Returns whether it moved.
    pub fn navigate(&mut self, row_delta: i32, col_delta: i32) -> bool {
        let next = self.find_next_valid_item(self.cursor.0, self.cursor.1, row_delta, col_delta);
        let moved = next != self.cursor;
        self.cursor = next;
        moved
    }

    /// Remove the item under the cursor and put the cursor on a valid cell.
    pub fn remove_selected(&mut self) -> Option<GridItem<A>> {
        let index = self.item_index_at(self.cursor.0, self.cursor.1)?;
        let removed = self.items.remove(index);
        self.cursor = self
            .items
            .iter()
            .map(|item| (item.footprint.row, item.footprint.col))
            .min()
            .unwrap_or((0, 0));
        debug!("Removed grid item '{}', cursor now {:?}", removed.widget.label(), self.cursor);
        Some(removed)
    }

    /// `(cell width, cell height)` for a surface of the given size: the
    /// border takes two columns, the border and title band take four rows.
    pub fn cell_size(&self, surface_width: u16, surface_height: u16) -> (u16, u16) {
        let cell_width = usize::from(surface_width.saturating_sub(2)) / self.cols;
        let cell_height = usize::from(surface_height.saturating_sub(4)) / self.rows;
        (cell_width as u16, cell_height as u16)
    }

    /// Full repaint: screen border, title, every item.
    pub fn render<C: Console>(&self, surface: &mut Surface<C>) -> io::Result<()> {
        surface.clear()?;
        surface.draw_border()?;
        let style = surface.default_style();
        surface.draw_centered_text(&self.title, 1, style)?;
        self.render_items(surface)
    }

    /// Repaint only the items. Each item covers its whole footprint.
    pub fn render_items<C: Console>(&self, surface: &mut Surface<C>) -> io::Result<()> {
        let (cell_width, cell_height) = self.cell_size(surface.width(), surface.height());
        for item in &self.items {
            let fp = item.footprint;
            let x = 1 + fp.col as u16 * cell_width;
            let y = 3 + fp.row as u16 * cell_height;
            let width = fp.width as u16 * cell_width;
            let height = fp.height as u16 * cell_height;
            let selected = fp.contains(self.cursor.0, self.cursor.1);
            draw_item(surface, &item.widget, x, y, width, height, selected)?;
        }
        Ok(())
    }
}

fn item_style(selected: bool) -> Style {
    if selected {
        Style::default().fg(Color::Black).bg(Color::White)
    } else {
        Style::default().fg(Color::White).bg(Color::Black)
    }
}

/// Boxed, filled, label centered both ways. A label too long for the box
/// shows `Error!` instead.
fn draw_item<C: Console, A>(
    surface: &mut Surface<C>,
    widget: &Widget<A>,
    x: u16,
    y: u16,
    width: u16,
    height: u16,
    selected: bool,
) -> io::Result<()> {
    if width < 2 || height < 2 {
        return Ok(());
    }
    let style = item_style(selected);
    surface.draw_styled_box(x, y, width, height, style)?;

    let inner_width = width - 2;
    let inner_height = usize::from(height - 2);
    surface.fill_region(x + 1, y + 1, inner_width, height - 2, style)?;

    let chunk = usize::from(width.saturating_sub(4)).max(1);
    let label: Vec<char> = widget.label().chars().collect();
    let mut lines: Vec<String> = label.chunks(chunk).map(|c| c.iter().collect()).collect();
    if lines.len() > inner_height {
        lines = vec!["Error!".to_string()];
    }

    let first = y + 1 + ((inner_height.saturating_sub(lines.len())) / 2) as u16;
    for (offset, line) in lines.iter().enumerate() {
        let line_x = x + 1 + centered_x(inner_width, line.width());
        surface.draw_styled_text(line, line_x, first + offset as u16, style)?;
    }
    Ok(())
}

impl<A: Clone> GridMenu<A> {
    pub fn execute_selected(&self) -> Option<WidgetAction<A>> {
        self.selected_item().and_then(|item| item.widget.activate())
    }

    pub fn handle_key(&mut self, key: Key) -> MenuInput<A> {
        match key {
            Key::Arrow(direction) => {
                let (row_delta, col_delta) = direction.grid_delta();
                if self.navigate(row_delta, col_delta) { MenuInput::Moved } else { MenuInput::Idle }
            }
            Key::Enter => match self.execute_selected() {
                Some(WidgetAction::Run(action)) => MenuInput::Activated(action),
                Some(WidgetAction::Open(name)) => MenuInput::OpenSubmenu(name),
                None => MenuInput::Idle,
            },
            Key::Escape => MenuInput::Back,
            key if self.removable && key.letter() == Some('d') => match self.remove_selected() {
                Some(item) => MenuInput::Removed(item.widget.label().to_string()),
                None => MenuInput::Idle,
            },
            other => MenuInput::Unhandled(other),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_support::headless_surface;
    use crate::tui::event::Direction;

    const DELTAS: [(i32, i32); 4] = [(-1, 0), (1, 0), (0, -1), (0, 1)];

    fn grid(footprints: &[Footprint]) -> GridMenu<usize> {
        let mut grid = GridMenu::new("Test", 3, 3);
        for (i, fp) in footprints.iter().enumerate() {
            grid.add_item(Widget::action(format!("item{i}"), i), *fp);
        }
        grid
    }

    #[test]
    fn test_valid_cells_follow_footprints() {
        let grid = grid(&[Footprint::new(0, 1, 2, 1), Footprint::cell(2, 0)]);
        assert!(grid.is_valid_cell(0, 1));
        assert!(grid.is_valid_cell(0, 2));
        assert!(!grid.is_valid_cell(0, 0));
        assert!(grid.is_valid_cell(2, 0));
        assert!(!grid.is_valid_cell(1, 1));
    }

    #[test]
    fn test_find_next_always_valid_exhaustive() {
        let layouts: Vec<Vec<Footprint>> = vec![
            vec![Footprint::cell(0, 0), Footprint::cell(2, 2)],
            vec![Footprint::new(0, 0, 2, 1), Footprint::cell(1, 2), Footprint::cell(2, 0)],
            vec![
                Footprint::cell(0, 1),
                Footprint::cell(1, 0),
                Footprint::cell(1, 2),
                Footprint::cell(2, 1),
            ],
            vec![Footprint::new(0, 0, 1, 3), Footprint::new(0, 1, 2, 2)],
        ];
        for layout in layouts {
            let grid = grid(&layout);
            for row in 0..3 {
                for col in 0..3 {
                    for (dr, dc) in DELTAS {
                        let (r, c) = grid.find_next_valid_item(row, col, dr, dc);
                        assert!(
                            grid.is_valid_cell(r, c),
                            "from ({row},{col}) by ({dr},{dc}) landed on invalid ({r},{c}) in {layout:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn test_single_item_returns_same_cell() {
        let grid = grid(&[Footprint::new(1, 0, 2, 2)]);
        for (row, col) in [(1, 0), (1, 1), (2, 0), (2, 1)] {
            for (dr, dc) in DELTAS {
                assert_eq!(grid.find_next_valid_item(row, col, dr, dc), (row, col));
            }
        }
    }

    #[test]
    fn test_navigation_skips_own_footprint_and_wraps() {
        let mut grid = grid(&[Footprint::new(0, 0, 2, 1), Footprint::cell(0, 2)]);
        assert_eq!(grid.cursor(), (0, 0));
        assert!(grid.navigate(0, 1));
        assert_eq!(grid.cursor(), (0, 2));
        // Right from the last column wraps to the wide item
        assert!(grid.navigate(0, 1));
        assert_eq!(grid.cursor(), (0, 0));
        // Left from the wide item wraps to column 2
        assert!(grid.navigate(0, -1));
        assert_eq!(grid.cursor(), (0, 2));
    }

    #[test]
    fn test_cursor_can_rest_inside_footprint() {
        let mut grid = grid(&[Footprint::cell(1, 1), Footprint::new(0, 0, 1, 3)]);
        assert_eq!(grid.cursor(), (1, 1));
        assert!(grid.navigate(0, -1));
        // Lands on the tall item's middle cell, not its anchor
        assert_eq!(grid.cursor(), (1, 0));
        assert_eq!(grid.selected_item().unwrap().widget.label(), "item1");
    }

    #[test]
    fn test_no_movement_when_line_is_empty() {
        let mut grid = grid(&[Footprint::cell(0, 0), Footprint::cell(2, 2)]);
        assert!(!grid.navigate(0, 1));
        assert_eq!(grid.cursor(), (0, 0));
        assert!(!grid.navigate(-1, 0));
    }

    #[test]
    fn test_execute_selected_action_and_submenu() {
        let mut grid: GridMenu<&str> = GridMenu::new("T", 1, 2);
        grid.add_item(Widget::action("Back", "back"), Footprint::cell(0, 0));
        grid.add_item(Widget::submenu("Tips", "tips"), Footprint::cell(0, 1));
        assert_eq!(grid.handle_key(Key::Enter), MenuInput::Activated("back"));
        assert_eq!(grid.handle_key(Key::Arrow(Direction::Right)), MenuInput::Moved);
        assert_eq!(grid.handle_key(Key::Enter), MenuInput::OpenSubmenu("tips".to_string()));
        assert_eq!(grid.handle_key(Key::Escape), MenuInput::Back);
    }

    #[test]
    fn test_remove_selected_reselects_valid_cell() {
        let mut grid = grid(&[Footprint::cell(0, 0), Footprint::cell(1, 1), Footprint::cell(2, 2)]);
        let before = grid.cursor();
        let removed = grid.remove_selected().unwrap();
        assert!(removed.footprint.contains(before.0, before.1));
        let (r, c) = grid.cursor();
        assert!(grid.is_valid_cell(r, c));

        grid.remove_selected();
        grid.remove_selected();
        assert!(grid.is_empty());
        assert!(grid.remove_selected().is_none());
        assert_eq!(grid.execute_selected(), None);
    }

    #[test]
    fn test_removal_key_only_when_enabled() {
        let mut fixed = grid(&[Footprint::cell(0, 0)]);
        assert_eq!(fixed.handle_key(Key::Char('d')), MenuInput::Unhandled(Key::Char('d')));

        let mut removable = grid(&[Footprint::cell(0, 0)]).with_removal(true);
        assert_eq!(removable.handle_key(Key::Char('D')), MenuInput::Removed("item0".to_string()));
        assert_eq!(removable.handle_key(Key::Char('d')), MenuInput::Idle);
    }

    #[test]
    fn test_empty_grid_is_inert() {
        let mut grid: GridMenu<()> = GridMenu::new("Empty", 2, 2);
        assert!(!grid.navigate(0, 1));
        assert_eq!(grid.find_next_valid_item(1, 1, 1, 0), (1, 1));
        assert_eq!(grid.handle_key(Key::Enter), MenuInput::Idle);
    }

    #[test]
    fn test_cell_size() {
        let grid: GridMenu<()> = GridMenu::new("T", 2, 3);
        assert_eq!(grid.cell_size(80, 24), (26, 10));
    }

    #[test]
    fn test_render_centers_label_and_inverts_selection() {
        // 2 + 2*10 wide, 4 + 1*5 tall: two 10x5 cells
        let mut surface = headless_surface(22, 9);
        let mut grid: GridMenu<()> = GridMenu::new("Title", 1, 2);
        grid.add_item(Widget::action("Go", ()), Footprint::cell(0, 0));
        grid.add_item(Widget::action("Stop", ()), Footprint::cell(0, 1));
        grid.render(&mut surface).unwrap();

        let console = surface.console();
        assert!(console.row(1).contains("Title"));
        // Label row is y = 3 + 1 + (3 - 1) / 2 = 5
        let label_row = console.row(5);
        assert!(label_row.contains("Go"));
        assert!(label_row.contains("Stop"));

        let selected = console.cell_style(2, 4).unwrap();
        assert_eq!(selected.bg, Some(Color::White));
        let unselected = console.cell_style(12, 4).unwrap();
        assert_eq!(unselected.bg, Some(Color::Black));
    }

    #[test]
    fn test_render_overlong_label_shows_error() {
        let mut surface = headless_surface(12, 8);
        let mut grid: GridMenu<()> = GridMenu::new("T", 1, 1);
        grid.add_item(Widget::action("a label far too long for this", ()), Footprint::cell(0, 0));
        grid.render(&mut surface).unwrap();
        assert!(surface.console().text().contains("Error!"));
    }
}
