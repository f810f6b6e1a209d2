//! Install progress screen
//!
//! Shows an overall gauge, the download estimate of the tool that last
//! reported, a per-tool status list and the tail of installer output.

use std::time::Duration;

use super::header::{HeaderRenderer, render_instructions, render_progress_bar};
use crate::app::{InstallProgressState, ItemStatus};
use crate::components::keybindings::help_line;
use crate::installer::Progress;
use crate::session_state::SessionState;
use crate::theme::Styles;
use crate::types::InstallMode;
use ratatui::{
    Frame,
    layout::{Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};

/// `"45.0/100 MB (12.3 MB/s, ETA 4s)"`
pub fn progress_detail(progress: &Progress) -> String {
    let eta = progress
        .eta
        .map_or_else(|| "--".to_string(), format_eta);
    format!(
        "{:.1}/100 MB ({:.1} MB/s, ETA {})",
        progress.downloaded_mb, progress.speed_mb_s, eta
    )
}

fn format_eta(eta: Duration) -> String {
    let secs = eta.as_secs();
    if secs >= 60 {
        format!("{}m{:02}s", secs / 60, secs % 60)
    } else {
        format!("{}s", secs)
    }
}

fn status_line(name: &str, status: &ItemStatus) -> Line<'static> {
    let (marker, style) = match status {
        ItemStatus::Pending => ("[ ]", Styles::muted()),
        ItemStatus::Running => ("[~]", Styles::warning()),
        ItemStatus::Done(outcome) if outcome.is_success() => ("[✓]", Styles::success()),
        ItemStatus::Done(_) => ("[✗]", Styles::error()),
    };
    Line::from(Span::styled(format!("{} {}", marker, name), style))
}

pub fn render_install_screen(
    f: &mut Frame,
    area: Rect,
    progress: &InstallProgressState,
    header: &HeaderRenderer,
) {
    let list_height = (progress.items.len() as u16 + 2).min(area.height / 3).max(3);
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HeaderRenderer::height_for(area.height)),
            Constraint::Length(3), // Overall gauge
            Constraint::Length(1), // Current tool detail
            Constraint::Length(list_height),
            Constraint::Min(3), // Output
            Constraint::Length(1), // Help
        ])
        .split(area);

    header.render_header(f, chunks[0]);

    let title = match progress.mode {
        InstallMode::Sequential => format!(
            "Installing {}/{}",
            (progress.finished_count() + 1).min(progress.items.len()),
            progress.items.len()
        ),
        InstallMode::Concurrent => format!(
            "Installing {} tools concurrently ({} done)",
            progress.items.len(),
            progress.finished_count()
        ),
    };
    render_progress_bar(f, chunks[1], &title, progress.overall_percent());

    if let Some(item) = progress.current_item() {
        let detail = match &item.progress {
            Some(p) => format!("{}: {}", item.name, progress_detail(p)),
            None => format!("{}: starting", item.name),
        };
        f.render_widget(Paragraph::new(detail).style(Styles::item()), chunks[2]);
    }

    let items: Vec<Line> = progress
        .items
        .iter()
        .map(|item| status_line(&item.name, &item.status))
        .collect();
    f.render_widget(
        Paragraph::new(items).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title("Tools"),
        ),
        chunks[3],
    );

    // Tail that fits inside the borders
    let visible = chunks[4].height.saturating_sub(2) as usize;
    let skip = progress.output.len().saturating_sub(visible);
    let output: Vec<Line> = progress
        .output
        .iter()
        .skip(skip)
        .map(|line| Line::from(line.clone()))
        .collect();
    f.render_widget(
        Paragraph::new(output).block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title("Installer Output"),
        ),
        chunks[4],
    );

    render_instructions(f, chunks[5], help_line(SessionState::Installing));
}
