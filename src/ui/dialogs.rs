//! Confirmation and results dialog rendering

use crate::app::CONFIRM_PROMPT;
use crate::components::keybindings::help_line;
use crate::installer::{InstallOutcome, InstallReport};
use crate::session_state::SessionState;
use crate::theme::Styles;
use ratatui::{
    Frame,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Wrap},
};

/// Tool names listed before the rest are summarised
const MAX_LISTED: usize = 12;

/// Rectangle of `percent_x` by `height` rows centered in `area`
pub fn centered_rect(percent_x: u16, height: u16, area: Rect) -> Rect {
    let height = height.min(area.height);
    let vertical = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Fill(1),
            Constraint::Length(height),
            Constraint::Fill(1),
        ])
        .split(area);

    Layout::default()
        .direction(Direction::Horizontal)
        .constraints([
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
            Constraint::Percentage(percent_x.min(100)),
            Constraint::Percentage((100 - percent_x.min(100)) / 2),
        ])
        .split(vertical[1])[1]
}

/// Body lines of the dialog
pub fn confirm_lines(selected: &[String]) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(CONFIRM_PROMPT, Styles::title())),
        Line::from(""),
    ];

    lines.extend(
        selected
            .iter()
            .take(MAX_LISTED)
            .map(|name| Line::from(Span::styled(format!("  - {}", name), Styles::selected()))),
    );
    if selected.len() > MAX_LISTED {
        lines.push(Line::from(Span::styled(
            format!("  ... and {} more", selected.len() - MAX_LISTED),
            Styles::muted(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        help_line(SessionState::ConfirmingInstall),
        Styles::help(),
    )));
    lines
}

fn outcome_line(outcome: &InstallOutcome) -> Line<'static> {
    match outcome {
        InstallOutcome::Success(item) => {
            Line::from(Span::styled(format!("[✓] {}", item), Styles::success()))
        }
        InstallOutcome::Failure { item, reason } => {
            Line::from(Span::styled(format!("[✗] {}: {}", item, reason), Styles::error()))
        }
    }
}

/// Body lines of the results dialog: one line per tool, failures with
/// their reason, then the run notice
pub fn results_lines(report: &InstallReport) -> Vec<Line<'static>> {
    let mut lines = vec![
        Line::from(Span::styled(report.summary.to_string(), Styles::title())),
        Line::from(""),
    ];

    lines.extend(report.outcomes.iter().take(MAX_LISTED).map(outcome_line));
    if report.outcomes.len() > MAX_LISTED {
        let hidden = &report.outcomes[MAX_LISTED..];
        let failed = hidden.iter().filter(|o| !o.is_success()).count();
        lines.push(Line::from(Span::styled(
            format!("... and {} more ({} failed)", hidden.len(), failed),
            Styles::muted(),
        )));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(report.notice(), Styles::warning())));
    lines.push(Line::from(Span::styled(
        help_line(SessionState::ReviewingResults),
        Styles::help(),
    )));
    lines
}

fn render_dialog(
    f: &mut Frame,
    area: Rect,
    title: &str,
    lines: Vec<Line<'static>>,
    alignment: Alignment,
) {
    // Two border rows
    let height = lines.len() as u16 + 2;
    let dialog_area = centered_rect(70, height, area);

    let dialog = Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .border_style(Styles::border())
                .title(title),
        )
        .alignment(alignment)
        .wrap(Wrap { trim: false });

    f.render_widget(Clear, dialog_area);
    f.render_widget(dialog, dialog_area);
}

pub fn render_confirm_dialog(f: &mut Frame, area: Rect, selected: &[String]) {
    render_dialog(
        f,
        area,
        " Confirm Installation ",
        confirm_lines(selected),
        Alignment::Center,
    );
}

pub fn render_results_dialog(f: &mut Frame, area: Rect, report: &InstallReport) {
    render_dialog(
        f,
        area,
        " Installation Results ",
        results_lines(report),
        Alignment::Left,
    );
}
