//! Colors and styles for the menu
//!
//! Every color the renderer uses is defined here. The palette is cyan on
//! the terminal's default background, with yellow for the cursor and green
//! or red for install results.

use ratatui::style::{Color, Modifier, Style};

pub struct Colors;

impl Colors {
    /// Borders, title art, status bar
    pub const PRIMARY: Color = Color::Cyan;

    /// Help line and secondary text
    pub const SECONDARY: Color = Color::Gray;

    pub const FG_MUTED: Color = Color::DarkGray;

    /// Category headers
    pub const CATEGORY: Color = Color::Yellow;

    /// Row under the cursor
    pub const CURSOR_BG: Color = Color::Cyan;
    pub const CURSOR_FG: Color = Color::Black;

    /// Tools marked for install
    pub const SELECTED: Color = Color::LightGreen;

    pub const SUCCESS: Color = Color::Green;
    pub const WARNING: Color = Color::Yellow;
    pub const ERROR: Color = Color::Red;

    /// Gauge fill
    pub const PROGRESS: Color = Color::Green;
}

pub struct Styles;

impl Styles {
    pub fn title() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn border() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn category() -> Style {
        Style::default()
            .fg(Colors::CATEGORY)
            .add_modifier(Modifier::BOLD)
    }

    pub fn cursor() -> Style {
        Style::default()
            .fg(Colors::CURSOR_FG)
            .bg(Colors::CURSOR_BG)
            .add_modifier(Modifier::BOLD)
    }

    pub fn selected() -> Style {
        Style::default().fg(Colors::SELECTED)
    }

    pub fn item() -> Style {
        Style::default().fg(Colors::SECONDARY)
    }

    /// Reverse-video status bar
    pub fn status_bar() -> Style {
        Style::default()
            .fg(Colors::PRIMARY)
            .add_modifier(Modifier::REVERSED)
    }

    pub fn help() -> Style {
        Style::default().fg(Colors::PRIMARY)
    }

    pub fn muted() -> Style {
        Style::default().fg(Colors::FG_MUTED)
    }

    pub fn success() -> Style {
        Style::default().fg(Colors::SUCCESS)
    }

    pub fn warning() -> Style {
        Style::default().fg(Colors::WARNING)
    }

    pub fn error() -> Style {
        Style::default().fg(Colors::ERROR)
    }
}
