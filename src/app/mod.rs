//! Session controller
//!
//! Owns the selection grid and the install orchestrator, turns input events
//! into session state transitions and asks the renderer to redraw after each
//! one. Drawing and key reading sit behind the `Renderer` and `EventSource`
//! traits so the whole loop runs headless in tests.

mod state;

pub use state::{InstallProgressState, ItemProgress, ItemStatus, MAX_OUTPUT_LINES};

use std::collections::VecDeque;

use anyhow::Result;

use crate::components::keybindings;
use crate::grid::SelectionGrid;
use crate::installer::{InstallOrchestrator, InstallReport};
use crate::session_state::{SessionMachine, SessionState};
use crate::types::InstallMode;

/// Prompt shown while waiting for confirmation
pub const CONFIRM_PROMPT: &str = "Are you sure you want to install the selected tools?";

/// Notice shown when an install is requested with nothing selected
pub const EMPTY_SELECTION_NOTICE: &str = "No tools selected";

/// Everything the session reacts to
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputEvent {
    Up,
    Down,
    Left,
    Right,
    Toggle,
    InstallTrigger,
    Confirm,
    Cancel,
    Quit,
    /// Redraw without changing anything, e.g. after a terminal resize
    Redraw,
}

/// Read-only snapshot handed to the renderer
#[derive(Debug, Clone, Copy)]
pub struct SessionView<'a> {
    pub state: SessionState,
    pub grid: &'a SelectionGrid,
    pub last_action: Option<&'a str>,
    pub notice: Option<&'a str>,
    pub mode: InstallMode,
    /// Results of the most recent run
    pub report: Option<&'a InstallReport>,
}

impl SessionView<'_> {
    pub fn status_line(&self) -> String {
        format!(
            "Selected tools: {} | Last action: {}",
            self.grid.selected_count(),
            self.last_action.unwrap_or("None")
        )
    }

    pub fn help_line(&self) -> &'static str {
        keybindings::help_line(self.state)
    }
}

/// Drawing capability
pub trait Renderer {
    /// Redraw the grid or the confirmation prompt
    fn render(&mut self, view: &SessionView<'_>) -> Result<()>;

    /// Redraw the install screen while a run is in progress
    fn render_install(&mut self, progress: &InstallProgressState) -> Result<()>;
}

/// Source of input events
pub trait EventSource {
    /// Next event for a session in `state`. `Ok(None)` means the source is
    /// exhausted and the session should end.
    fn next_event(&mut self, state: SessionState) -> Result<Option<InputEvent>>;
}

/// Fixed sequence of events, for tests and scripted runs
#[derive(Debug, Clone, Default)]
pub struct ScriptedEvents(VecDeque<InputEvent>);

impl ScriptedEvents {
    pub fn new(events: impl IntoIterator<Item = InputEvent>) -> Self {
        Self(events.into_iter().collect())
    }
}

impl EventSource for ScriptedEvents {
    fn next_event(&mut self, _state: SessionState) -> Result<Option<InputEvent>> {
        Ok(self.0.pop_front())
    }
}

pub struct SessionController<R: Renderer> {
    grid: SelectionGrid,
    orchestrator: InstallOrchestrator,
    renderer: R,
    machine: SessionMachine,
    mode: InstallMode,
    last_action: Option<String>,
    notice: Option<String>,
    last_report: Option<InstallReport>,
}

impl<R: Renderer> SessionController<R> {
    /// Build a controller; the stored `last_action` is read once here. A
    /// read failure is shown as a notice and the session starts without one.
    pub fn new(
        grid: SelectionGrid,
        orchestrator: InstallOrchestrator,
        renderer: R,
        mode: InstallMode,
    ) -> Self {
        let (last_action, notice) = match orchestrator.load_last_action() {
            Ok(last_action) => (last_action, None),
            Err(e) => {
                tracing::warn!("Could not read last action: {:#}", e);
                (None, Some(format!("Could not read last action: {:#}", e)))
            }
        };

        Self {
            grid,
            orchestrator,
            renderer,
            machine: SessionMachine::new(),
            mode,
            last_action,
            notice,
            last_report: None,
        }
    }

    pub fn state(&self) -> SessionState {
        self.machine.current()
    }

    pub fn grid(&self) -> &SelectionGrid {
        &self.grid
    }

    pub fn last_action(&self) -> Option<&str> {
        self.last_action.as_deref()
    }

    pub fn notice(&self) -> Option<&str> {
        self.notice.as_deref()
    }

    pub fn last_report(&self) -> Option<&InstallReport> {
        self.last_report.as_ref()
    }

    pub fn runs_completed(&self) -> usize {
        self.machine.runs_completed()
    }

    pub fn renderer(&self) -> &R {
        &self.renderer
    }

    pub fn view(&self) -> SessionView<'_> {
        SessionView {
            state: self.machine.current(),
            grid: &self.grid,
            last_action: self.last_action.as_deref(),
            notice: self.notice.as_deref(),
            mode: self.mode,
            report: self.last_report.as_ref(),
        }
    }

    pub fn render(&mut self) -> Result<()> {
        let view = SessionView {
            state: self.machine.current(),
            grid: &self.grid,
            last_action: self.last_action.as_deref(),
            notice: self.notice.as_deref(),
            mode: self.mode,
            report: self.last_report.as_ref(),
        };
        self.renderer.render(&view)
    }

    /// Draw once, then handle events until the session terminates or the
    /// source runs dry
    pub fn run<E: EventSource>(&mut self, events: &mut E) -> Result<()> {
        self.render()?;

        while !self.machine.is_terminated() {
            let event = events
                .next_event(self.machine.current())?
                .unwrap_or(InputEvent::Quit);
            self.handle_event(event)?;
        }

        tracing::info!(runs = self.machine.runs_completed(), "Session ended");
        Ok(())
    }

    /// Apply one event and redraw. Returns the state after the event.
    pub fn handle_event(&mut self, event: InputEvent) -> Result<SessionState> {
        match event {
            InputEvent::Quit => {
                self.transition(SessionState::Terminated);
                self.render()?;
                return Ok(self.state());
            }
            InputEvent::Redraw => {
                self.render()?;
                return Ok(self.state());
            }
            _ => {}
        }

        self.notice = None;

        match self.machine.current() {
            SessionState::Browsing => self.handle_browsing(event),
            SessionState::ConfirmingInstall => self.handle_confirming(event),
            SessionState::ReviewingResults => self.transition(SessionState::Browsing),
            // Runs are synchronous; nothing arrives mid-run
            SessionState::Installing | SessionState::Terminated => {}
        }

        self.render()?;
        Ok(self.state())
    }

    fn handle_browsing(&mut self, event: InputEvent) {
        match event {
            InputEvent::Up => self.grid.move_up(),
            InputEvent::Down => self.grid.move_down(),
            InputEvent::Left => self.grid.move_left(),
            InputEvent::Right => self.grid.move_right(),
            InputEvent::Toggle => self.grid.toggle_current(),
            InputEvent::InstallTrigger => {
                if self.grid.selected_count() == 0 {
                    self.notice = Some(EMPTY_SELECTION_NOTICE.to_string());
                } else {
                    self.transition(SessionState::ConfirmingInstall);
                }
            }
            InputEvent::Confirm | InputEvent::Cancel | InputEvent::Quit | InputEvent::Redraw => {}
        }
    }

    fn handle_confirming(&mut self, event: InputEvent) {
        if event == InputEvent::Confirm {
            self.run_install();
        } else {
            tracing::debug!("Installation cancelled");
            self.transition(SessionState::Browsing);
        }
    }

    /// Run the selection to completion. Drawing failures are logged and never
    /// interrupt the run.
    fn run_install(&mut self) {
        self.transition(SessionState::Installing);

        let items = self
            .orchestrator
            .unique_items(&self.grid.selected_item_names());
        let mut progress = InstallProgressState::new(&items, self.mode);
        if let Err(e) = self.renderer.render_install(&progress) {
            tracing::warn!("Failed to draw install progress: {:#}", e);
        }

        let renderer = &mut self.renderer;
        let report = self
            .orchestrator
            .run_install(&items, self.mode, &mut |event| {
                progress.apply(event);
                if let Err(e) = renderer.render_install(&progress) {
                    tracing::warn!("Failed to draw install progress: {:#}", e);
                }
            });

        if report.persistence.is_ok() {
            self.last_action = Some(report.summary.to_string());
        }
        self.notice = Some(report.notice());
        self.last_report = Some(report);
        self.grid.clear_selection();

        self.transition(SessionState::ReviewingResults);
    }

    fn transition(&mut self, target: SessionState) {
        if let Err(e) = self.machine.transition_to(target) {
            tracing::warn!("Ignoring session transition: {}", e);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::catalog::{Catalog, Category};
    use crate::config_file::MemoryConfigStore;
    use crate::package_manager::DryRunInstaller;
    use std::collections::HashMap;
    use std::sync::Arc;

    #[derive(Default)]
    struct RecordingRenderer {
        views: Vec<(SessionState, String, Option<String>)>,
        install_frames: usize,
    }

    impl Renderer for RecordingRenderer {
        fn render(&mut self, view: &SessionView<'_>) -> Result<()> {
            self.views.push((
                view.state,
                view.status_line(),
                view.notice.map(str::to_string),
            ));
            Ok(())
        }

        fn render_install(&mut self, _progress: &InstallProgressState) -> Result<()> {
            self.install_frames += 1;
            Ok(())
        }
    }

    fn controller(store: MemoryConfigStore) -> SessionController<RecordingRenderer> {
        let catalog = Arc::new(
            Catalog::new(
                vec![
                    Category::new("Dev", &["Git", "Vim"]),
                    Category::new("Media", &["VLC"]),
                ],
                HashMap::new(),
            )
            .expect("Valid catalog"),
        );
        let orchestrator = InstallOrchestrator::new(
            Arc::clone(&catalog),
            Box::new(DryRunInstaller::default()),
            Box::new(store),
        );
        SessionController::new(
            SelectionGrid::new(catalog),
            orchestrator,
            RecordingRenderer::default(),
            InstallMode::Sequential,
        )
    }

    #[test]
    fn test_status_line_without_last_action() {
        let ctl = controller(MemoryConfigStore::new());
        assert_eq!(ctl.view().status_line(), "Selected tools: 0 | Last action: None");
    }

    #[test]
    fn test_status_line_shows_stored_last_action() {
        let ctl = controller(MemoryConfigStore::with_last_action("Installed: Git"));
        assert_eq!(
            ctl.view().status_line(),
            "Selected tools: 0 | Last action: Installed: Git"
        );
    }

    #[test]
    fn test_every_event_redraws() {
        let mut ctl = controller(MemoryConfigStore::new());
        ctl.handle_event(InputEvent::Down).unwrap();
        ctl.handle_event(InputEvent::Toggle).unwrap();
        assert_eq!(ctl.renderer().views.len(), 2);
        assert_eq!(ctl.renderer().views[1].1, "Selected tools: 1 | Last action: None");
    }

    #[test]
    fn test_install_with_empty_selection_stays_browsing() {
        let store = MemoryConfigStore::new();
        let mut ctl = controller(store.clone());
        let state = ctl.handle_event(InputEvent::InstallTrigger).unwrap();
        assert_eq!(state, SessionState::Browsing);
        assert_eq!(ctl.notice(), Some(EMPTY_SELECTION_NOTICE));
        assert_eq!(store.writes(), 0);

        // The notice goes away on the next event
        ctl.handle_event(InputEvent::Down).unwrap();
        assert_eq!(ctl.notice(), None);
    }

    #[test]
    fn test_cancel_keeps_selection_and_writes_nothing() {
        let store = MemoryConfigStore::new();
        let mut ctl = controller(store.clone());
        ctl.handle_event(InputEvent::Toggle).unwrap();
        assert_eq!(
            ctl.handle_event(InputEvent::InstallTrigger).unwrap(),
            SessionState::ConfirmingInstall
        );
        assert_eq!(ctl.handle_event(InputEvent::Cancel).unwrap(), SessionState::Browsing);

        assert_eq!(ctl.grid().selected_count(), 1);
        assert_eq!(store.writes(), 0);
        assert!(ctl.last_report().is_none());
    }

    #[test]
    fn test_navigation_while_confirming_cancels() {
        let mut ctl = controller(MemoryConfigStore::new());
        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();
        let cursor = ctl.grid().cursor();

        assert_eq!(ctl.handle_event(InputEvent::Down).unwrap(), SessionState::Browsing);
        assert_eq!(ctl.grid().cursor(), cursor, "Cancelling input must not move the cursor");
    }

    #[test]
    fn test_confirm_runs_install_and_clears_selection() {
        let store = MemoryConfigStore::new();
        let mut ctl = controller(store.clone());
        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::Right).unwrap();
        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();

        let state = ctl.handle_event(InputEvent::Confirm).unwrap();
        assert_eq!(state, SessionState::ReviewingResults);
        assert_eq!(ctl.grid().selected_count(), 0);
        assert_eq!(ctl.last_action(), Some("Installed: Git, VLC"));
        assert_eq!(ctl.notice(), Some("Installation process completed."));
        assert_eq!(store.writes(), 1);
        assert_eq!(ctl.runs_completed(), 1);
        assert!(ctl.renderer().install_frames > 0);

        // Results stay up until the next key
        let cursor = ctl.grid().cursor();
        assert_eq!(ctl.handle_event(InputEvent::Down).unwrap(), SessionState::Browsing);
        assert_eq!(ctl.notice(), None);
        assert_eq!(ctl.grid().cursor(), cursor, "Dismissing must not move the cursor");
    }

    #[test]
    fn test_persistence_failure_keeps_stale_last_action() {
        let store = MemoryConfigStore::with_last_action("Installed: Old");
        store.fail_writes(true);
        let mut ctl = controller(store);
        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();
        ctl.handle_event(InputEvent::Confirm).unwrap();

        assert_eq!(ctl.last_action(), Some("Installed: Old"));
        assert!(ctl.notice().unwrap().starts_with("Could not save last action"));
        assert_eq!(ctl.state(), SessionState::ReviewingResults);
    }

    #[test]
    fn test_quit_from_any_state() {
        let mut ctl = controller(MemoryConfigStore::new());
        assert_eq!(ctl.handle_event(InputEvent::Quit).unwrap(), SessionState::Terminated);

        let mut ctl = controller(MemoryConfigStore::new());
        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();
        assert_eq!(ctl.handle_event(InputEvent::Quit).unwrap(), SessionState::Terminated);
    }

    #[test]
    fn test_run_stops_at_quit_and_ignores_the_rest() {
        let store = MemoryConfigStore::new();
        let mut ctl = controller(store.clone());
        let mut events = ScriptedEvents::new([
            InputEvent::Quit,
            InputEvent::Toggle,
            InputEvent::InstallTrigger,
            InputEvent::Confirm,
        ]);
        ctl.run(&mut events).unwrap();
        assert_eq!(ctl.state(), SessionState::Terminated);
        assert_eq!(ctl.grid().selected_count(), 0);
        assert_eq!(store.writes(), 0);
    }

    #[test]
    fn test_run_ends_when_events_run_out() {
        let mut ctl = controller(MemoryConfigStore::new());
        ctl.run(&mut ScriptedEvents::new([InputEvent::Down])).unwrap();
        assert_eq!(ctl.state(), SessionState::Terminated);
        // Initial draw, one redraw and the final frame on quit
        assert_eq!(ctl.renderer().views.len(), 3);
    }

    #[test]
    fn test_quit_draws_the_final_frame() {
        let mut ctl = controller(MemoryConfigStore::new());
        ctl.handle_event(InputEvent::Quit).unwrap();
        let views = &ctl.renderer().views;
        assert_eq!(views.len(), 1);
        assert_eq!(views[0].0, SessionState::Terminated);
    }

    #[test]
    fn test_redraw_keeps_state_and_notice() {
        let mut ctl = controller(MemoryConfigStore::new());
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();

        assert_eq!(ctl.handle_event(InputEvent::Redraw).unwrap(), SessionState::Browsing);
        assert_eq!(ctl.notice(), Some(EMPTY_SELECTION_NOTICE));
        assert_eq!(ctl.grid().selected_count(), 0);
        assert_eq!(ctl.renderer().views.len(), 2);
    }

    /// Draws the grid but fails every install frame
    #[derive(Default)]
    struct FailingInstallRenderer {
        install_attempts: usize,
    }

    impl Renderer for FailingInstallRenderer {
        fn render(&mut self, _view: &SessionView<'_>) -> Result<()> {
            Ok(())
        }

        fn render_install(&mut self, _progress: &InstallProgressState) -> Result<()> {
            self.install_attempts += 1;
            anyhow::bail!("terminal went away")
        }
    }

    #[test]
    fn test_failing_install_screen_does_not_strand_the_run() {
        let store = MemoryConfigStore::new();
        let catalog = Arc::new(
            Catalog::new(vec![Category::new("Dev", &["Git"])], HashMap::new())
                .expect("Valid catalog"),
        );
        let orchestrator = InstallOrchestrator::new(
            Arc::clone(&catalog),
            Box::new(DryRunInstaller::default()),
            Box::new(store.clone()),
        );
        let mut ctl = SessionController::new(
            SelectionGrid::new(catalog),
            orchestrator,
            FailingInstallRenderer::default(),
            InstallMode::Sequential,
        );

        ctl.handle_event(InputEvent::Toggle).unwrap();
        ctl.handle_event(InputEvent::InstallTrigger).unwrap();
        let state = ctl.handle_event(InputEvent::Confirm).unwrap();

        assert_eq!(state, SessionState::ReviewingResults);
        assert_eq!(store.writes(), 1);
        assert_eq!(ctl.grid().selected_count(), 0);
        assert_eq!(ctl.last_action(), Some("Installed: Git"));
        assert!(ctl.renderer().install_attempts > 1);
    }
}
