//! Selection grid
//!
//! Cursor and multi-selection state over the catalog. Columns are categories,
//! rows are tools within a category. Pure state: no I/O, no rendering.
//!
//! # Invariants
//!
//! - `cursor.column < catalog.category_count()`
//! - `cursor.row < catalog.row_count(cursor.column)`
//! - every selected cell indexes an existing catalog cell
//!
//! Vertical movement saturates at the edges; horizontal movement wraps and
//! re-clamps the row, because categories have different lengths.

use std::sync::Arc;

use crate::catalog::{Catalog, Cell};

#[derive(Debug, Clone)]
pub struct SelectionGrid {
    catalog: Arc<Catalog>,
    cursor: Cell,
    /// Selected cells in insertion order
    selected: Vec<Cell>,
}

impl SelectionGrid {
    /// Create a grid with the cursor on the first tool of the first category
    pub fn new(catalog: Arc<Catalog>) -> Self {
        Self {
            catalog,
            cursor: Cell::new(0, 0),
            selected: Vec::new(),
        }
    }

    pub fn catalog(&self) -> &Catalog {
        &self.catalog
    }

    #[inline]
    pub fn cursor(&self) -> Cell {
        self.cursor
    }

    /// Tool name under the cursor
    pub fn current_item(&self) -> &str {
        self.catalog.item(self.cursor).unwrap_or_default()
    }

    pub fn move_up(&mut self) {
        self.cursor.row = self.cursor.row.saturating_sub(1);
    }

    pub fn move_down(&mut self) {
        let last_row = self.last_row(self.cursor.column);
        if self.cursor.row < last_row {
            self.cursor.row += 1;
        }
    }

    pub fn move_left(&mut self) {
        let columns = self.catalog.category_count();
        let column = (self.cursor.column + columns - 1) % columns;
        self.enter_column(column);
    }

    pub fn move_right(&mut self) {
        let column = (self.cursor.column + 1) % self.catalog.category_count();
        self.enter_column(column);
    }

    /// Select the cursor cell, or deselect it if already selected
    pub fn toggle_current(&mut self) {
        let cell = self.cursor;
        if let Some(pos) = self.selected.iter().position(|c| *c == cell) {
            self.selected.remove(pos);
            tracing::debug!(column = cell.column, row = cell.row, "Deselected {}", self.current_item());
        } else {
            self.selected.push(cell);
            tracing::debug!(column = cell.column, row = cell.row, "Selected {}", self.current_item());
        }
    }

    pub fn is_selected(&self, cell: Cell) -> bool {
        self.selected.contains(&cell)
    }

    pub fn selected_count(&self) -> usize {
        self.selected.len()
    }

    pub fn selected_cells(&self) -> &[Cell] {
        &self.selected
    }

    /// Resolve the selection to tool names, in selection order
    pub fn selected_item_names(&self) -> Vec<String> {
        self.selected
            .iter()
            .filter_map(|cell| self.catalog.item(*cell))
            .map(str::to_string)
            .collect()
    }

    pub fn clear_selection(&mut self) {
        self.selected.clear();
    }

    fn enter_column(&mut self, column: usize) {
        self.cursor.column = column;
        self.cursor.row = self.cursor.row.min(self.last_row(column));
    }

    fn last_row(&self, column: usize) -> usize {
        self.catalog.row_count(column).saturating_sub(1)
    }
}
