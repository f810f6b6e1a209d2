//! Header and common widget rendering
//!
//! Title art, the about block under it, and the footer lines shared by every
//! screen.

use crate::theme::{Colors, Styles};
use ratatui::{
    Frame,
    layout::{Alignment, Rect},
    style::Style,
    text::{Line, Span},
    widgets::{Block, Borders, Gauge, Paragraph},
};

const TITLE_ART: [&str; 6] = [
    "██╗  ██╗██████╗       ████████╗ ██████╗  ██████╗ ██╗     ███████╗",
    "╚██╗██╔╝╚════██╗      ╚══██╔══╝██╔═══██╗██╔═══██╗██║     ██╔════╝",
    " ╚███╔╝  █████╔╝█████╗   ██║   ██║   ██║██║   ██║██║     ███████╗",
    " ██╔██╗  ╚═══██╗╚════╝   ██║   ██║   ██║██║   ██║██║     ╚════██║",
    "██╔╝ ██╗██████╔╝         ██║   ╚██████╔╝╚██████╔╝███████╗███████║",
    "╚═╝  ╚═╝╚═════╝          ╚═╝    ╚═════╝  ╚══════╝╚══════╝╚══════╝",
];

const ABOUT: [&str; 4] = [
    concat!("X3 Tools v", env!("CARGO_PKG_VERSION")),
    "Developed by X3NIDE",
    "Your Ultimate Tool Installation Assistant for Windows",
    "Licensed under MIT License",
];

/// Rows needed to draw the full header
pub const HEADER_HEIGHT: u16 = (TITLE_ART.len() + 1 + ABOUT.len()) as u16;

/// Below this many rows only the one-line title is drawn
pub const COMPACT_THRESHOLD: u16 = 30;

/// Header renderer containing the title art
pub struct HeaderRenderer {
    header_lines: Vec<Line<'static>>,
}

impl Default for HeaderRenderer {
    fn default() -> Self {
        Self::new()
    }
}

impl HeaderRenderer {
    pub fn new() -> Self {
        Self {
            header_lines: Self::create_header(),
        }
    }

    /// Height to reserve for the header in a terminal `rows` tall
    pub fn height_for(rows: u16) -> u16 {
        if rows < COMPACT_THRESHOLD { 1 } else { HEADER_HEIGHT }
    }

    pub fn render_header(&self, f: &mut Frame, area: Rect) {
        if area.width == 0 || area.height == 0 {
            return;
        }

        let lines = if area.height < HEADER_HEIGHT {
            vec![Line::from(Span::styled(
                concat!("X3 TOOLS v", env!("CARGO_PKG_VERSION")),
                Styles::title(),
            ))]
        } else {
            self.header_lines.clone()
        };

        let header = Paragraph::new(lines).alignment(Alignment::Center);
        f.render_widget(header, area);
    }

    fn create_header() -> Vec<Line<'static>> {
        let mut lines: Vec<Line<'static>> = TITLE_ART
            .iter()
            .map(|row| Line::from(Span::styled(*row, Style::default().fg(Colors::PRIMARY))))
            .collect();
        lines.push(Line::from(""));
        lines.extend(
            ABOUT
                .iter()
                .map(|row| Line::from(Span::styled(*row, Style::default().fg(Colors::PRIMARY)))),
        );
        lines
    }
}

/// Reverse-video status bar
pub fn render_status_line(f: &mut Frame, area: Rect, text: &str) {
    let status = Paragraph::new(text).style(Styles::status_bar());
    f.render_widget(status, area);
}

/// Render instructions text
pub fn render_instructions(f: &mut Frame, area: Rect, text: &str) {
    let instructions = Paragraph::new(text).style(Styles::help());
    f.render_widget(instructions, area);
}

/// One-line notice; errors are drawn in red
pub fn render_notice(f: &mut Frame, area: Rect, notice: &str) {
    let style = if notice.starts_with("Could not") {
        Styles::error()
    } else {
        Styles::warning()
    };
    f.render_widget(Paragraph::new(notice).style(style), area);
}

/// Render progress bar
pub fn render_progress_bar(f: &mut Frame, area: Rect, title: &str, percent: u16) {
    let gauge = Gauge::default()
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title(title.to_string()),
        )
        .gauge_style(Style::default().fg(Colors::PROGRESS))
        .percent(percent.min(100));
    f.render_widget(gauge, area);
}
