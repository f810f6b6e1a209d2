//! Selection grid rendering
//!
//! One column per category, separated by vertical rules. Each row reads
//! `> [x] Name`: `>` marks the cursor, `[x]` a selected tool.

use std::ops::Range;

use crate::catalog::Cell;
use crate::grid::SelectionGrid;
use crate::theme::Styles;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// Text for one grid cell
pub fn cell_label(is_cursor: bool, is_selected: bool, name: &str) -> String {
    format!(
        "{} {} {}",
        if is_cursor { ">" } else { " " },
        if is_selected { "[x]" } else { "[ ]" },
        name
    )
}

/// Rows of a column that fit in `height`, scrolled so `cursor_row` stays
/// visible
pub fn visible_rows(cursor_row: Option<usize>, rows: usize, height: usize) -> Range<usize> {
    if height == 0 {
        return 0..0;
    }
    let start = match cursor_row {
        Some(row) if row >= height => row + 1 - height,
        _ => 0,
    };
    start..rows.min(start + height)
}

pub fn render_grid(f: &mut Frame, area: Rect, grid: &SelectionGrid) {
    let categories = grid.catalog().categories();
    if categories.is_empty() || area.width == 0 || area.height == 0 {
        return;
    }

    let count = categories.len() as u32;
    let columns = Layout::default()
        .direction(Direction::Horizontal)
        .constraints((0..count).map(|_| Constraint::Ratio(1, count)))
        .split(area);

    let cursor = grid.cursor();
    for (column, (category, column_area)) in categories.iter().zip(columns.iter()).enumerate() {
        let is_last = column + 1 == categories.len();
        let block = Block::default()
            .borders(if is_last { Borders::NONE } else { Borders::RIGHT })
            .border_style(Styles::border())
            .title(Span::styled(category.name.clone(), Styles::category()));
        let inner = block.inner(*column_area);

        let cursor_row = (cursor.column == column).then_some(cursor.row);
        let lines: Vec<Line> = visible_rows(cursor_row, category.items.len(), inner.height as usize)
            .map(|row| {
                let cell = Cell::new(column, row);
                let is_cursor = cell == cursor;
                let is_selected = grid.is_selected(cell);
                let style = if is_cursor {
                    Styles::cursor()
                } else if is_selected {
                    Styles::selected()
                } else {
                    Styles::item()
                };
                Line::from(Span::styled(
                    cell_label(is_cursor, is_selected, &category.items[row]),
                    style,
                ))
            })
            .collect();

        f.render_widget(Paragraph::new(lines).block(block), *column_area);
    }
}
