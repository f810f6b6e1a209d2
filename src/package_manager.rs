//! Package-manager invocation
//!
//! The `Installer` trait is the only way the orchestrator reaches the outside
//! world. `CommandInstaller` runs a real package manager (winget by default);
//! `DryRunInstaller` logs the command it would run and reports success.
//!
//! # Contract
//!
//! `install` returns `Ok` whenever the process ran to completion, whatever
//! its exit code. `Err` means it could not be started or waited for at all
//! (binary missing, pipe failure). Classification into success or failure is
//! the orchestrator's job.

use anyhow::{Context, Result};
use std::io::{BufRead, BufReader, Read};
use std::process::{Child, Command, Stdio};
use std::thread;

/// Placeholder in argument templates replaced by the package identifier
pub const ID_PLACEHOLDER: &str = "{id}";

pub const DEFAULT_PROGRAM: &str = "winget";

pub const DEFAULT_ARGS: [&str; 4] = [
    "install",
    ID_PLACEHOLDER,
    "--accept-source-agreements",
    "--accept-package-agreements",
];

/// What a finished installer process left behind
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct InstallerOutput {
    /// `None` when the process was terminated by a signal
    pub exit_code: Option<i32>,
    pub stderr: String,
}

impl InstallerOutput {
    pub fn success() -> Self {
        Self {
            exit_code: Some(0),
            stderr: String::new(),
        }
    }

    pub fn failed(exit_code: i32, stderr: impl Into<String>) -> Self {
        Self {
            exit_code: Some(exit_code),
            stderr: stderr.into(),
        }
    }
}

/// Capability to install one package by identifier.
///
/// Implementations must be shareable across worker threads: concurrent runs
/// call `install` from several threads at once.
pub trait Installer: Send + Sync {
    /// Install `identifier`, forwarding each stdout line to `on_line` as it
    /// arrives.
    fn install(&self, identifier: &str, on_line: &mut dyn FnMut(&str)) -> Result<InstallerOutput>;
}

/// Runs an external package-manager command per identifier
#[derive(Debug, Clone)]
pub struct CommandInstaller {
    program: String,
    args: Vec<String>,
}

impl CommandInstaller {
    /// `args` is a template; every occurrence of `{id}` inside an argument is
    /// replaced by the identifier.
    pub fn new(program: impl Into<String>, args: Vec<String>) -> Self {
        Self {
            program: program.into(),
            args,
        }
    }

    pub fn program(&self) -> &str {
        &self.program
    }

    /// Arguments for one identifier
    pub fn args_for(&self, identifier: &str) -> Vec<String> {
        self.args
            .iter()
            .map(|arg| arg.replace(ID_PLACEHOLDER, identifier))
            .collect()
    }

    fn command_for(&self, identifier: &str) -> Command {
        let mut cmd = Command::new(&self.program);
        cmd.args(self.args_for(identifier))
            .stdin(Stdio::null())
            .stdout(Stdio::piped())
            .stderr(Stdio::piped());

        #[cfg(unix)]
        {
            use crate::process_guard::CommandProcessGroup;
            cmd.in_new_process_group();
        }

        cmd
    }
}

impl Default for CommandInstaller {
    fn default() -> Self {
        Self::new(
            DEFAULT_PROGRAM,
            DEFAULT_ARGS.iter().map(|arg| arg.to_string()).collect(),
        )
    }
}

impl Installer for CommandInstaller {
    fn install(&self, identifier: &str, on_line: &mut dyn FnMut(&str)) -> Result<InstallerOutput> {
        let args = self.args_for(identifier);
        tracing::info!("Running {} {:?}", self.program, args);

        let mut child = self
            .command_for(identifier)
            .spawn()
            .with_context(|| format!("Failed to start {}", self.program))?;

        #[cfg(unix)]
        let _registration = crate::process_guard::RegisteredChild::register(child.id());

        let stdout = child
            .stdout
            .take()
            .context("Installer stdout was not captured")?;
        let mut stderr = child
            .stderr
            .take()
            .context("Installer stderr was not captured")?;

        // Drain stderr on its own thread so a chatty stderr cannot block
        // the stdout reader
        let stderr_reader = thread::spawn(move || {
            let mut buf = Vec::new();
            let _ = stderr.read_to_end(&mut buf);
            String::from_utf8_lossy(&buf).into_owned()
        });

        stream_lines(BufReader::new(stdout), &mut child, on_line)
            .with_context(|| format!("Failed reading output of {}", self.program))?;

        let status = child
            .wait()
            .with_context(|| format!("Failed waiting for {}", self.program))?;
        let stderr = stderr_reader.join().unwrap_or_default();

        tracing::debug!(identifier, exit_code = ?status.code(), "Installer exited");
        Ok(InstallerOutput {
            exit_code: status.code(),
            stderr,
        })
    }
}

/// Forward each non-blank line of `reader` to `on_line`. On a read error
/// the child is killed and reaped before the error is returned.
fn stream_lines<R: BufRead>(
    mut reader: R,
    child: &mut Child,
    on_line: &mut dyn FnMut(&str),
) -> std::io::Result<()> {
    let mut buf = Vec::new();
    loop {
        buf.clear();
        let read = match reader.read_until(b'\n', &mut buf) {
            Ok(read) => read,
            Err(e) => {
                let _ = child.kill();
                let _ = child.wait();
                return Err(e);
            }
        };
        if read == 0 {
            return Ok(());
        }
        let line = String::from_utf8_lossy(&buf);
        let line = line.trim_end_matches(['\r', '\n']);
        if !line.trim().is_empty() {
            on_line(line);
        }
    }
}

/// Logs the command each install would run and reports success
#[derive(Debug, Clone, Default)]
pub struct DryRunInstaller {
    inner: CommandInstaller,
}

impl DryRunInstaller {
    pub fn new(inner: CommandInstaller) -> Self {
        Self { inner }
    }
}

impl Installer for DryRunInstaller {
    fn install(&self, identifier: &str, on_line: &mut dyn FnMut(&str)) -> Result<InstallerOutput> {
        let line = format!(
            "[dry-run] {} {}",
            self.inner.program(),
            self.inner.args_for(identifier).join(" ")
        );
        tracing::info!("{}", line);
        on_line(&line);
        Ok(InstallerOutput::success())
    }
}
