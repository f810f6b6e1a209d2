//! X3 Tools - Main entry point
//!
//! Parses the command line, sets up file logging and either runs a
//! one-shot subcommand or the interactive menu.

use std::fs::OpenOptions;
use std::io::{Stdout, stdout};
use std::path::Path;
use std::process::ExitCode;
use std::sync::{Arc, Mutex};

use anyhow::{Context, Result};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::{Terminal, backend::CrosstermBackend};
use tracing::{debug, error, info};
use tracing_subscriber::EnvFilter;

use x3tools::app::SessionController;
use x3tools::catalog::Catalog;
use x3tools::cli::{Cli, Commands};
use x3tools::config_file::{ConfigStore, JsonConfigStore};
use x3tools::error::X3Error;
use x3tools::grid::SelectionGrid;
use x3tools::input::KeyboardEvents;
use x3tools::installer::InstallOrchestrator;
use x3tools::package_manager::{DryRunInstaller, Installer};
use x3tools::ui::TerminalRenderer;

/// Environment variable checked before `RUST_LOG`
const LOG_ENV: &str = "X3_TOOLS_LOG";

/// Route tracing output to `path`; the TUI owns stdout
fn init_logging(path: &Path, verbose: bool) -> Result<()> {
    let default_level = if verbose { "debug" } else { "info" };
    let filter = std::env::var(LOG_ENV)
        .ok()
        .and_then(|spec| EnvFilter::try_new(spec).ok())
        .or_else(|| EnvFilter::try_from_default_env().ok())
        .unwrap_or_else(|| EnvFilter::new(default_level));

    let file = OpenOptions::new()
        .create(true)
        .append(true)
        .open(path)
        .with_context(|| format!("Failed to open log file {:?}", path))?;

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .map_err(|e| anyhow::anyhow!("Failed to initialize logging: {}", e))?;
    Ok(())
}

fn restore_terminal() {
    let _ = disable_raw_mode();
    let _ = execute!(stdout(), LeaveAlternateScreen);
}

fn load_catalog(cli: &Cli) -> Result<Catalog> {
    match &cli.catalog {
        Some(path) => Catalog::load_from_file(path),
        None => Ok(Catalog::builtin()),
    }
}

fn build_installer(cli: &Cli) -> Box<dyn Installer> {
    let command = cli.command_installer();
    if cli.dry_run {
        info!("Dry-run mode: installer commands are logged, not executed");
        Box::new(DryRunInstaller::new(command))
    } else {
        Box::new(command)
    }
}

fn main() -> ExitCode {
    let cli = Cli::parse_args();

    if let Err(e) = init_logging(&cli.log_file, cli.verbose) {
        eprintln!("Warning: {:#}", e);
    }
    info!("X3 Tools {} starting up", env!("CARGO_PKG_VERSION"));
    debug!(?cli, "CLI arguments parsed");

    let result = match &cli.command {
        Some(Commands::Validate { catalog }) => validate_catalog(catalog),
        Some(Commands::LastAction) => print_last_action(&cli),
        None => run_menu(&cli),
    };

    match result {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            error!("{:#}", e);
            eprintln!("✗ {:#}", e);
            ExitCode::FAILURE
        }
    }
}

fn validate_catalog(path: &Path) -> Result<()> {
    info!("Validating catalog file: {:?}", path);
    let catalog = Catalog::load_from_file(path)?;
    println!(
        "✓ Catalog is valid: {} categories, {} tools",
        catalog.category_count(),
        catalog.item_count()
    );
    Ok(())
}

fn print_last_action(cli: &Cli) -> Result<()> {
    let store = JsonConfigStore::new(&cli.config);
    match store.load_last_action()? {
        Some(summary) => println!("{}", summary),
        None => println!("None"),
    }
    Ok(())
}

/// Run the interactive menu
fn run_menu(cli: &Cli) -> Result<()> {
    let catalog = Arc::new(load_catalog(cli)?);
    let orchestrator = InstallOrchestrator::new(
        Arc::clone(&catalog),
        build_installer(cli),
        Box::new(JsonConfigStore::new(&cli.config)),
    );

    // Dropped last, after the terminal is restored
    #[cfg(unix)]
    let _guard = {
        if let Err(e) = x3tools::process_guard::init_signal_handlers(restore_terminal) {
            tracing::warn!("Failed to initialize signal handlers: {}", e);
        }
        x3tools::process_guard::ProcessGuard::new()
    };

    debug!("Initializing terminal");
    let terminal = setup_terminal()?;
    let renderer = TerminalRenderer::new(terminal);
    let mut controller =
        SessionController::new(SelectionGrid::new(catalog), orchestrator, renderer, cli.mode);

    let result = controller.run(&mut KeyboardEvents::default());

    // Always restore, even if the session failed
    restore_terminal();

    if let Some(report) = controller.last_report() {
        info!(
            failures = report.failures().count(),
            "Last run: {}",
            report.summary
        );
    }
    result
}

fn setup_terminal() -> Result<Terminal<CrosstermBackend<Stdout>>, X3Error> {
    enable_raw_mode()
        .map_err(|e| X3Error::terminal(format!("Failed to enable raw mode: {}", e)))?;
    if let Err(e) = execute!(stdout(), EnterAlternateScreen) {
        restore_terminal();
        return Err(X3Error::terminal(format!(
            "Failed to enter alternate screen: {}",
            e
        )));
    }
    Terminal::new(CrosstermBackend::new(stdout())).map_err(|e| {
        restore_terminal();
        X3Error::terminal(format!("Failed to create terminal: {}", e))
    })
}
