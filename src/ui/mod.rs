//! User interface rendering module
//!
//! - `header` - title art, footer lines, progress bar
//! - `menus` - the selection grid
//! - `dialogs` - the confirmation and results dialogs
//! - `installer` - the install progress screen
//!
//! `TerminalRenderer` implements the session's `Renderer` over any ratatui
//! backend, so tests draw into a `TestBackend`.

mod dialogs;
mod header;
mod installer;
mod menus;

pub use dialogs::{centered_rect, confirm_lines, results_lines};
pub use header::HeaderRenderer;
pub use installer::progress_detail;
pub use menus::{cell_label, visible_rows};

use anyhow::{Context, Result};
use ratatui::{
    Frame, Terminal,
    backend::Backend,
    layout::{Constraint, Direction, Layout},
};

use crate::app::{InstallProgressState, Renderer, SessionView};
use crate::session_state::SessionState;

/// Draws sessions into a ratatui terminal
pub struct TerminalRenderer<B: Backend> {
    terminal: Terminal<B>,
    header: HeaderRenderer,
}

impl<B: Backend> TerminalRenderer<B> {
    pub fn new(terminal: Terminal<B>) -> Self {
        Self {
            terminal,
            header: HeaderRenderer::new(),
        }
    }

    pub fn terminal(&self) -> &Terminal<B> {
        &self.terminal
    }

    pub fn terminal_mut(&mut self) -> &mut Terminal<B> {
        &mut self.terminal
    }
}

impl<B: Backend> Renderer for TerminalRenderer<B> {
    fn render(&mut self, view: &SessionView<'_>) -> Result<()> {
        let header = &self.header;
        self.terminal
            .draw(|f| render_session(f, view, header))
            .context("Failed to draw menu")?;
        Ok(())
    }

    fn render_install(&mut self, progress: &InstallProgressState) -> Result<()> {
        let header = &self.header;
        self.terminal
            .draw(|f| installer::render_install_screen(f, f.area(), progress, header))
            .context("Failed to draw install progress")?;
        Ok(())
    }
}

/// Grid screen, with the confirmation or results dialog on top
fn render_session(f: &mut Frame, view: &SessionView<'_>, header: &HeaderRenderer) {
    let area = f.area();
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(HeaderRenderer::height_for(area.height)),
            Constraint::Min(3),    // Grid
            Constraint::Length(1), // Notice
            Constraint::Length(1), // Status
            Constraint::Length(1), // Help
        ])
        .split(area);

    header.render_header(f, chunks[0]);
    menus::render_grid(f, chunks[1], view.grid);

    if let Some(notice) = view.notice {
        header::render_notice(f, chunks[2], notice);
    }
    header::render_status_line(f, chunks[3], &view.status_line());
    header::render_instructions(f, chunks[4], view.help_line());

    match (view.state, view.report) {
        (SessionState::ConfirmingInstall, _) => {
            dialogs::render_confirm_dialog(f, area, &view.grid.selected_item_names())
        }
        (SessionState::ReviewingResults, Some(report)) => {
            dialogs::render_results_dialog(f, area, report)
        }
        _ => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::grid::SelectionGrid;
    use crate::installer::{InstallEvent, InstallOutcome, InstallReport, SessionSummary};
    use crate::types::InstallMode;
    use ratatui::backend::TestBackend;
    use std::collections::HashMap;
    use std::sync::Arc;

    fn grid() -> SelectionGrid {
        let catalog = Catalog::new(
            vec![
                Category::new("Dev", &["Git", "Vim"]),
                Category::new("Media", &["VLC"]),
            ],
            HashMap::new(),
        )
        .expect("Valid catalog");
        SelectionGrid::new(Arc::new(catalog))
    }

    fn screen_text(renderer: &TerminalRenderer<TestBackend>) -> String {
        let buffer = renderer.terminal().backend().buffer();
        let width = buffer.area.width as usize;
        buffer
            .content()
            .chunks(width)
            .map(|row| row.iter().map(|cell| cell.symbol()).collect::<String>())
            .collect::<Vec<_>>()
            .join("\n")
    }

    fn renderer(width: u16, height: u16) -> TerminalRenderer<TestBackend> {
        TerminalRenderer::new(Terminal::new(TestBackend::new(width, height)).unwrap())
    }

    #[test]
    fn test_grid_screen_shows_markers_and_footer() {
        let mut grid = grid();
        grid.toggle_current();
        grid.move_down();

        let mut renderer = renderer(80, 24);
        let view = SessionView {
            state: SessionState::Browsing,
            grid: &grid,
            last_action: Some("Installed: Git"),
            notice: None,
            mode: InstallMode::Sequential,
            report: None,
        };
        renderer.render(&view).unwrap();

        let text = screen_text(&renderer);
        assert!(text.contains("Dev"));
        assert!(text.contains("Media"));
        assert!(text.contains("  [x] Git"));
        assert!(text.contains("> [ ] Vim"));
        assert!(text.contains("Selected tools: 1 | Last action: Installed: Git"));
        assert!(text.contains("Use arrow keys to navigate"));
    }

    #[test]
    fn test_confirm_dialog_is_drawn_while_confirming() {
        let mut grid = grid();
        grid.toggle_current();

        let mut renderer = renderer(80, 24);
        let view = SessionView {
            state: SessionState::ConfirmingInstall,
            grid: &grid,
            last_action: None,
            notice: None,
            mode: InstallMode::Sequential,
            report: None,
        };
        renderer.render(&view).unwrap();

        let text = screen_text(&renderer);
        assert!(text.contains("Are you sure you want to install the selected tools?"));
        assert!(text.contains("Press 'y' to confirm, 'n' to cancel"));
    }

    #[test]
    fn test_results_dialog_lists_every_tool() {
        let grid = grid();
        let outcomes = vec![
            InstallOutcome::Success("Git".into()),
            InstallOutcome::Failure {
                item: "VLC".into(),
                reason: "exited with status 100".into(),
            },
        ];
        let report = InstallReport {
            mode: InstallMode::Sequential,
            summary: SessionSummary::from_outcomes(&outcomes),
            outcomes,
            persistence: Ok(()),
        };

        let mut renderer = renderer(80, 24);
        let view = SessionView {
            state: SessionState::ReviewingResults,
            grid: &grid,
            last_action: Some("Failed to install: VLC"),
            notice: None,
            mode: InstallMode::Sequential,
            report: Some(&report),
        };
        renderer.render(&view).unwrap();

        let text = screen_text(&renderer);
        assert!(text.contains("Installation Results"));
        assert!(text.contains("[✓] Git"));
        assert!(text.contains("[✗] VLC: exited with status 100"));
        assert!(text.contains("Press any key to continue"));
    }

    #[test]
    fn test_tall_terminal_shows_about_block() {
        let grid = grid();
        let mut renderer = renderer(100, 40);
        let view = SessionView {
            state: SessionState::Browsing,
            grid: &grid,
            last_action: None,
            notice: Some("No tools selected"),
            mode: InstallMode::Sequential,
            report: None,
        };
        renderer.render(&view).unwrap();

        let text = screen_text(&renderer);
        assert!(text.contains("Developed by X3NIDE"));
        assert!(text.contains("No tools selected"));
    }

    #[test]
    fn test_install_screen_shows_output() {
        let items = vec!["Git".to_string()];
        let mut progress = InstallProgressState::new(&items, InstallMode::Sequential);
        progress.apply(&InstallEvent::Started {
            index: 0,
            item: "Git".into(),
        });

        let mut renderer = renderer(80, 24);
        renderer.render_install(&progress).unwrap();

        let text = screen_text(&renderer);
        assert!(text.contains("Installing 1/1"));
        assert!(text.contains("Installing Git..."));
        assert!(text.contains("Installer Output"));
    }
}
