//! Reusable input components

pub mod keybindings;

pub use keybindings::{Keybinding, KeybindingContext, help_line};
