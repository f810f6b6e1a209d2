//! Tool catalog
//!
//! The catalog maps category names to ordered tool names (columns and rows of
//! the selection grid) and tool names to package-manager identifiers. It is
//! built once at startup and never mutated afterwards.

mod builtin;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::fs;
use std::path::Path;

use crate::error::X3Error;

/// A single column of the selection grid
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Category {
    pub name: String,
    pub items: Vec<String>,
}

impl Category {
    pub fn new(name: impl Into<String>, items: &[&str]) -> Self {
        Self {
            name: name.into(),
            items: items.iter().map(|item| item.to_string()).collect(),
        }
    }
}

/// A `(column, row)` coordinate in the selection grid
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Cell {
    pub column: usize,
    pub row: usize,
}

impl Cell {
    pub const fn new(column: usize, row: usize) -> Self {
        Self { column, row }
    }
}

/// On-disk catalog layout
#[derive(Debug, Clone, Serialize, Deserialize)]
struct CatalogFile {
    categories: Vec<Category>,
    #[serde(default)]
    identifiers: HashMap<String, String>,
}

/// Immutable tool catalog
#[derive(Debug, Clone)]
pub struct Catalog {
    categories: Vec<Category>,
    identifiers: HashMap<String, String>,
}

impl Catalog {
    /// Build a catalog, rejecting shapes the grid cannot navigate.
    ///
    /// # Errors
    ///
    /// - no categories at all
    /// - a category without items
    /// - two categories with the same name
    pub fn new(
        categories: Vec<Category>,
        identifiers: HashMap<String, String>,
    ) -> crate::error::Result<Self> {
        if categories.is_empty() {
            return Err(X3Error::catalog("catalog has no categories"));
        }

        let mut seen = HashSet::new();
        for category in &categories {
            if category.items.is_empty() {
                return Err(X3Error::catalog(format!(
                    "category '{}' has no items",
                    category.name
                )));
            }
            if !seen.insert(category.name.as_str()) {
                return Err(X3Error::catalog(format!(
                    "duplicate category '{}'",
                    category.name
                )));
            }
        }

        Ok(Self {
            categories,
            identifiers,
        })
    }

    /// The catalog compiled into the binary
    pub fn builtin() -> Self {
        Self {
            categories: builtin::categories(),
            identifiers: builtin::identifiers(),
        }
    }

    /// Load a catalog from a JSON file
    pub fn load_from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = fs::read_to_string(&path)
            .with_context(|| format!("Failed to read catalog from {:?}", path.as_ref()))?;

        let file: CatalogFile =
            serde_json::from_str(&content).context("Failed to parse catalog JSON")?;

        let catalog = Self::new(file.categories, file.identifiers)
            .with_context(|| format!("Invalid catalog in {:?}", path.as_ref()))?;

        tracing::info!(
            categories = catalog.category_count(),
            items = catalog.item_count(),
            "Loaded catalog from {:?}",
            path.as_ref()
        );
        Ok(catalog)
    }

    pub fn categories(&self) -> &[Category] {
        &self.categories
    }

    pub fn category_count(&self) -> usize {
        self.categories.len()
    }

    /// Total number of cells across all categories
    pub fn item_count(&self) -> usize {
        self.categories.iter().map(|c| c.items.len()).sum()
    }

    /// Number of rows in a column, 0 for an out-of-range column
    pub fn row_count(&self, column: usize) -> usize {
        self.categories.get(column).map_or(0, |c| c.items.len())
    }

    /// Tool name at a cell, if the cell exists
    pub fn item(&self, cell: Cell) -> Option<&str> {
        self.categories
            .get(cell.column)
            .and_then(|c| c.items.get(cell.row))
            .map(String::as_str)
    }

    /// Package-manager identifier for a tool.
    ///
    /// Tools without a mapping install under their own name.
    pub fn resolve_identifier<'a>(&'a self, item: &'a str) -> &'a str {
        self.identifiers
            .get(item)
            .map(String::as_str)
            .unwrap_or(item)
    }
}

impl Default for Catalog {
    fn default() -> Self {
        Self::builtin()
    }
}
