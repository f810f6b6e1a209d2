//! X3 Tools Library
//!
//! Core of the X3 Tools menu: the tool catalog, the selection grid, the
//! install orchestrator and the session state machine. The binary wires
//! these to a crossterm terminal; tests drive them headlessly.

pub mod app;
pub mod catalog;
pub mod cli;
pub mod components;
pub mod config_file;
pub mod error;
pub mod grid;
pub mod input;
pub mod installer;
pub mod package_manager;
#[cfg(unix)]
pub mod process_guard;
pub mod session_state;
pub mod theme;
pub mod types;
pub mod ui;

// Re-export main types for convenience
pub use app::{EventSource, InputEvent, Renderer, ScriptedEvents, SessionController, SessionView};
pub use catalog::{Catalog, Category, Cell};
pub use config_file::{ConfigStore, JsonConfigStore, MemoryConfigStore};
pub use error::X3Error;
pub use grid::SelectionGrid;
pub use installer::{
    InstallEvent, InstallOrchestrator, InstallOutcome, InstallReport, SessionSummary,
};
pub use package_manager::{CommandInstaller, DryRunInstaller, Installer, InstallerOutput};
#[cfg(unix)]
pub use process_guard::{ChildRegistry, CommandProcessGroup, ProcessGuard};
pub use session_state::{SessionMachine, SessionState, SessionTransitionError};
pub use types::InstallMode;
