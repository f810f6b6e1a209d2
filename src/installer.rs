//! Install orchestration
//!
//! Drives one install attempt per selected tool through an [`Installer`],
//! either one after another or all at once, and turns the outcomes into the
//! session summary that is persisted as `last_action`.
//!
//! # Concurrency
//!
//! Concurrent runs spawn one scoped worker per tool. Workers share nothing
//! mutable: they send [`WorkerMessage`]s over an mpsc channel and the calling
//! thread is the only collector. The observer is therefore only ever called
//! from the calling thread, in both modes.

use std::collections::HashSet;
use std::fmt;
use std::panic::{self, AssertUnwindSafe};
use std::sync::Arc;
use std::sync::mpsc;
use std::thread;
use std::time::{Duration, Instant};

use crate::catalog::Catalog;
use crate::config_file::ConfigStore;
use crate::package_manager::{Installer, InstallerOutput};
use crate::types::InstallMode;

/// Result of installing a single tool
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InstallOutcome {
    Success(String),
    Failure { item: String, reason: String },
}

impl InstallOutcome {
    pub fn item(&self) -> &str {
        match self {
            Self::Success(item) | Self::Failure { item, .. } => item,
        }
    }

    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }

    pub fn reason(&self) -> Option<&str> {
        match self {
            Self::Success(_) => None,
            Self::Failure { reason, .. } => Some(reason),
        }
    }

    /// Classify what the installer returned for `item`
    pub fn classify(item: &str, result: anyhow::Result<InstallerOutput>) -> Self {
        let output = match result {
            Ok(output) => output,
            Err(e) => {
                return Self::Failure {
                    item: item.to_string(),
                    reason: format!("{:#}", e),
                };
            }
        };

        if output.exit_code == Some(0) {
            return Self::Success(item.to_string());
        }

        let stderr = output.stderr.trim();
        let reason = if !stderr.is_empty() {
            stderr.to_string()
        } else {
            match output.exit_code {
                Some(code) => format!("exited with status {}", code),
                None => "terminated by signal".to_string(),
            }
        };

        Self::Failure {
            item: item.to_string(),
            reason,
        }
    }
}

/// One-line description of a finished run, stored as `last_action`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SessionSummary(String);

impl SessionSummary {
    /// `"Failed to install: ..."` naming only the failures when any
    /// occurred, else `"Installed: ..."` naming every tool. Names keep the
    /// order of `outcomes`.
    pub fn from_outcomes(outcomes: &[InstallOutcome]) -> Self {
        let failed: Vec<&str> = outcomes
            .iter()
            .filter(|o| !o.is_success())
            .map(InstallOutcome::item)
            .collect();

        if failed.is_empty() {
            let all: Vec<&str> = outcomes.iter().map(InstallOutcome::item).collect();
            Self(format!("Installed: {}", all.join(", ")))
        } else {
            Self(format!("Failed to install: {}", failed.join(", ")))
        }
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionSummary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Snapshot of the synthetic download estimate for one tool
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Progress {
    pub percent: u16,
    pub downloaded_mb: f64,
    /// MB per second since the tool started
    pub speed_mb_s: f64,
    /// `None` until a speed can be computed
    pub eta: Option<Duration>,
}

/// Synthetic download estimate.
///
/// Package managers do not report a machine-readable size, so every line of
/// output is counted as a fixed chunk of a nominal total. Display only.
#[derive(Debug, Clone, Default)]
pub struct ProgressEstimate {
    lines: u64,
}

impl ProgressEstimate {
    pub const TOTAL_MB: f64 = 100.0;
    pub const MB_PER_LINE: f64 = 5.0;

    pub fn record_line(&mut self) {
        self.lines = self.lines.saturating_add(1);
    }

    pub fn downloaded_mb(&self) -> f64 {
        (self.lines as f64 * Self::MB_PER_LINE).min(Self::TOTAL_MB)
    }

    pub fn percent(&self) -> u16 {
        (self.downloaded_mb() / Self::TOTAL_MB * 100.0).round() as u16
    }

    pub fn snapshot(&self, elapsed: Duration) -> Progress {
        let downloaded_mb = self.downloaded_mb();
        let secs = elapsed.as_secs_f64();
        let speed_mb_s = if secs > 0.0 { downloaded_mb / secs } else { 0.0 };
        let eta = (speed_mb_s > 0.0)
            .then(|| Duration::from_secs_f64((Self::TOTAL_MB - downloaded_mb) / speed_mb_s));

        Progress {
            percent: self.percent(),
            downloaded_mb,
            speed_mb_s,
            eta,
        }
    }
}

/// What the observer sees while a run is in progress
#[derive(Debug, Clone, PartialEq)]
pub enum InstallEvent {
    Started {
        index: usize,
        item: String,
    },
    Line {
        index: usize,
        item: String,
        line: String,
        progress: Progress,
    },
    Finished {
        index: usize,
        outcome: InstallOutcome,
    },
}

/// Message from a concurrent worker to the collector
#[derive(Debug)]
enum WorkerMessage {
    Line { index: usize, line: String },
    Finished { index: usize, outcome: InstallOutcome },
}

/// Everything a single `run_install` call produced
#[derive(Debug, Clone, PartialEq)]
pub struct InstallReport {
    pub mode: InstallMode,
    /// One outcome per requested tool, in request order
    pub outcomes: Vec<InstallOutcome>,
    pub summary: SessionSummary,
    /// Error text when the summary could not be stored
    pub persistence: Result<(), String>,
}

impl InstallReport {
    pub fn failures(&self) -> impl Iterator<Item = &InstallOutcome> {
        self.outcomes.iter().filter(|o| !o.is_success())
    }

    pub fn all_succeeded(&self) -> bool {
        self.outcomes.iter().all(InstallOutcome::is_success)
    }

    /// Notice shown after the run: the completion message, or the
    /// persistence error when saving failed
    pub fn notice(&self) -> String {
        match &self.persistence {
            Ok(()) => self.mode.completion_notice().to_string(),
            Err(e) => format!("Could not save last action: {}", e),
        }
    }
}

/// Runs installs and records their summary
pub struct InstallOrchestrator {
    catalog: Arc<Catalog>,
    installer: Box<dyn Installer>,
    store: Box<dyn ConfigStore>,
}

impl InstallOrchestrator {
    pub fn new(
        catalog: Arc<Catalog>,
        installer: Box<dyn Installer>,
        store: Box<dyn ConfigStore>,
    ) -> Self {
        Self {
            catalog,
            installer,
            store,
        }
    }

    /// Summary stored by a previous run, if any
    pub fn load_last_action(&self) -> anyhow::Result<Option<String>> {
        self.store.load_last_action()
    }

    /// `items` with every tool whose identifier already appeared removed.
    ///
    /// The same tool can be listed under several categories; it is
    /// installed once, under the first name selected.
    pub fn unique_items(&self, items: &[String]) -> Vec<String> {
        let mut seen = HashSet::new();
        items
            .iter()
            .filter(|item| {
                let identifier = self.catalog.resolve_identifier(item);
                let first = seen.insert(identifier.to_string());
                if !first {
                    tracing::warn!(identifier, "Skipping duplicate selection {}", item);
                }
                first
            })
            .cloned()
            .collect()
    }

    /// Install `items` and persist the resulting summary exactly once.
    /// Tools sharing an identifier are installed once (see `unique_items`).
    ///
    /// Never fails: per-tool problems become `Failure` outcomes and a
    /// persistence problem is carried in the report.
    pub fn run_install(
        &mut self,
        items: &[String],
        mode: InstallMode,
        observer: &mut dyn FnMut(&InstallEvent),
    ) -> InstallReport {
        let unique = self.unique_items(items);
        let items = unique.as_slice();
        tracing::info!(%mode, count = items.len(), "Starting installation of {}", items.join(", "));

        let outcomes = match mode {
            InstallMode::Sequential => self.run_sequential(items, observer),
            InstallMode::Concurrent => self.run_concurrent(items, observer),
        };

        for outcome in &outcomes {
            match outcome {
                InstallOutcome::Success(item) => tracing::info!("Successfully installed {}", item),
                InstallOutcome::Failure { item, reason } => {
                    tracing::warn!("Failed to install {}: {}", item, reason)
                }
            }
        }

        let summary = SessionSummary::from_outcomes(&outcomes);
        tracing::info!("{}", summary);

        let persistence = self
            .store
            .save_last_action(summary.as_str())
            .map_err(|e| format!("{:#}", e));
        if let Err(e) = &persistence {
            tracing::error!("Failed to save last action: {}", e);
        }

        InstallReport {
            mode,
            outcomes,
            summary,
            persistence,
        }
    }

    fn run_sequential(
        &self,
        items: &[String],
        observer: &mut dyn FnMut(&InstallEvent),
    ) -> Vec<InstallOutcome> {
        let mut outcomes = Vec::with_capacity(items.len());

        for (index, item) in items.iter().enumerate() {
            observer(&InstallEvent::Started {
                index,
                item: item.clone(),
            });

            let started = Instant::now();
            let mut estimate = ProgressEstimate::default();
            let outcome = install_item(&self.catalog, &*self.installer, item, &mut |line| {
                estimate.record_line();
                observer(&InstallEvent::Line {
                    index,
                    item: item.clone(),
                    line: line.to_string(),
                    progress: estimate.snapshot(started.elapsed()),
                });
            });

            observer(&InstallEvent::Finished {
                index,
                outcome: outcome.clone(),
            });
            outcomes.push(outcome);
        }

        outcomes
    }

    fn run_concurrent(
        &self,
        items: &[String],
        observer: &mut dyn FnMut(&InstallEvent),
    ) -> Vec<InstallOutcome> {
        let catalog: &Catalog = &self.catalog;
        let installer: &dyn Installer = &*self.installer;
        let mut slots: Vec<Option<InstallOutcome>> = vec![None; items.len()];

        for (index, item) in items.iter().enumerate() {
            observer(&InstallEvent::Started {
                index,
                item: item.clone(),
            });
        }

        thread::scope(|scope| {
            let (tx, rx) = mpsc::channel::<WorkerMessage>();

            let handles: Vec<_> = items
                .iter()
                .enumerate()
                .map(|(index, item)| {
                    let tx = tx.clone();
                    scope.spawn(move || {
                        let outcome = install_item(catalog, installer, item, &mut |line| {
                            let _ = tx.send(WorkerMessage::Line {
                                index,
                                line: line.to_string(),
                            });
                        });
                        let _ = tx.send(WorkerMessage::Finished { index, outcome });
                    })
                })
                .collect();

            // Only workers hold senders now; the loop ends when all are done
            drop(tx);

            let started = Instant::now();
            let mut estimates = vec![ProgressEstimate::default(); items.len()];
            for message in rx {
                match message {
                    WorkerMessage::Line { index, line } => {
                        estimates[index].record_line();
                        observer(&InstallEvent::Line {
                            index,
                            item: items[index].clone(),
                            line,
                            progress: estimates[index].snapshot(started.elapsed()),
                        });
                    }
                    WorkerMessage::Finished { index, outcome } => {
                        observer(&InstallEvent::Finished {
                            index,
                            outcome: outcome.clone(),
                        });
                        slots[index] = Some(outcome);
                    }
                }
            }

            for handle in handles {
                if handle.join().is_err() {
                    tracing::error!("Install worker panicked");
                }
            }
        });

        slots
            .into_iter()
            .zip(items)
            .map(|(slot, item)| {
                slot.unwrap_or_else(|| InstallOutcome::Failure {
                    item: item.clone(),
                    reason: "install worker stopped without reporting".to_string(),
                })
            })
            .collect()
    }
}

/// Resolve, install and classify one tool. A panicking installer counts as
/// a failure of that tool only.
fn install_item(
    catalog: &Catalog,
    installer: &dyn Installer,
    item: &str,
    on_line: &mut dyn FnMut(&str),
) -> InstallOutcome {
    let identifier = catalog.resolve_identifier(item);
    tracing::debug!(item, identifier, "Installing");

    let result = panic::catch_unwind(AssertUnwindSafe(|| installer.install(identifier, on_line)));
    match result {
        Ok(result) => InstallOutcome::classify(item, result),
        Err(_) => InstallOutcome::Failure {
            item: item.to_string(),
            reason: "installer panicked".to_string(),
        },
    }
}
