use clap::{Parser, Subcommand};
use std::path::PathBuf;

use crate::config_file::DEFAULT_CONFIG_FILE;
use crate::package_manager::{CommandInstaller, DEFAULT_ARGS, DEFAULT_PROGRAM};
use crate::types::InstallMode;

/// Log file used while the TUI owns the terminal
pub const DEFAULT_LOG_FILE: &str = "installation_log.txt";

/// X3 Tools - pick tools from a grid and install them in one go
#[derive(Parser, Debug)]
#[command(name = "x3-tools")]
#[command(about = "Terminal menu for batch-installing tools through a package manager")]
#[command(version)]
pub struct Cli {
    /// How selected tools are installed
    #[arg(short, long, default_value_t = InstallMode::Sequential, global = true)]
    pub mode: InstallMode,

    /// File that stores the last action summary
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE, global = true)]
    pub config: PathBuf,

    /// Catalog JSON file to use instead of the built-in tool list
    #[arg(long)]
    pub catalog: Option<PathBuf>,

    /// Package manager executable
    #[arg(long, default_value = DEFAULT_PROGRAM)]
    pub program: String,

    /// Installer argument; repeat to replace the default template.
    /// `{id}` is replaced by the package identifier.
    #[arg(long = "arg", value_name = "ARG", allow_hyphen_values = true)]
    pub args: Vec<String>,

    /// Where logs are written
    #[arg(long, default_value = DEFAULT_LOG_FILE, global = true)]
    pub log_file: PathBuf,

    /// Log at debug level unless a filter is set in the environment
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Log installer commands and report success without running them
    #[arg(long, global = true)]
    pub dry_run: bool,

    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Validate a catalog file
    Validate {
        /// Path to the catalog JSON file
        catalog: PathBuf,
    },
    /// Print the stored last action summary
    LastAction,
}

impl Cli {
    pub fn parse_args() -> Self {
        <Self as clap::Parser>::parse()
    }

    /// Installer for the configured program and argument template
    pub fn command_installer(&self) -> CommandInstaller {
        let args = if self.args.is_empty() {
            DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect()
        } else {
            self.args.clone()
        };
        CommandInstaller::new(self.program.clone(), args)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[test]
    fn test_cli_defaults() {
        let cli = Cli::try_parse_from(["x3-tools"]).unwrap();
        assert_eq!(cli.mode, InstallMode::Sequential);
        assert_eq!(cli.config, PathBuf::from(DEFAULT_CONFIG_FILE));
        assert_eq!(cli.log_file, PathBuf::from(DEFAULT_LOG_FILE));
        assert_eq!(cli.program, DEFAULT_PROGRAM);
        assert!(cli.catalog.is_none());
        assert!(!cli.dry_run);
        assert!(cli.command.is_none());
    }

    #[test]
    fn test_cli_concurrent_mode() {
        let cli = Cli::try_parse_from(["x3-tools", "--mode", "concurrent"]).unwrap();
        assert_eq!(cli.mode, InstallMode::Concurrent);
    }

    #[test]
    fn test_cli_rejects_unknown_mode() {
        assert!(Cli::try_parse_from(["x3-tools", "--mode", "parallel"]).is_err());
    }

    #[test]
    fn test_cli_custom_installer() {
        let cli = Cli::try_parse_from([
            "x3-tools",
            "--program",
            "choco",
            "--arg",
            "install",
            "--arg",
            "{id}",
            "--arg",
            "-y",
        ])
        .unwrap();
        let installer = cli.command_installer();
        assert_eq!(installer.program(), "choco");
        assert_eq!(installer.args_for("git"), vec!["install", "git", "-y"]);
    }

    #[test]
    fn test_cli_program_keeps_default_template() {
        let cli = Cli::try_parse_from(["x3-tools", "--program", "/opt/winget"]).unwrap();
        let installer = cli.command_installer();
        assert_eq!(installer.program(), "/opt/winget");
        assert_eq!(installer.args_for("Git.Git")[..2], ["install", "Git.Git"]);
    }

    #[test]
    fn test_cli_validate_command() {
        let cli = Cli::try_parse_from(["x3-tools", "validate", "tools.json"]).unwrap();
        assert_eq!(
            cli.command,
            Some(Commands::Validate {
                catalog: PathBuf::from("tools.json")
            })
        );
    }

    #[test]
    fn test_cli_last_action_with_config() {
        let cli =
            Cli::try_parse_from(["x3-tools", "last-action", "--config", "other.json"]).unwrap();
        assert_eq!(cli.command, Some(Commands::LastAction));
        assert_eq!(cli.config, PathBuf::from("other.json"));
    }
}
