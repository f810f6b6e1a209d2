//! Install screen state
//!
//! Folds the orchestrator's `InstallEvent` stream into what the install
//! screen draws: per-tool status, the latest progress estimate and a bounded
//! tail of installer output.

use std::collections::VecDeque;

use crate::installer::{InstallEvent, InstallOutcome, Progress};
use crate::types::InstallMode;

/// Installer output lines kept for display
pub const MAX_OUTPUT_LINES: usize = 500;

#[derive(Debug, Clone, PartialEq)]
pub enum ItemStatus {
    Pending,
    Running,
    Done(InstallOutcome),
}

#[derive(Debug, Clone, PartialEq)]
pub struct ItemProgress {
    pub name: String,
    pub status: ItemStatus,
    pub progress: Option<Progress>,
}

impl ItemProgress {
    /// Percentage for the overall gauge; finished tools count as complete
    pub fn percent(&self) -> u16 {
        match self.status {
            ItemStatus::Done(_) => 100,
            _ => self.progress.map_or(0, |p| p.percent),
        }
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct InstallProgressState {
    pub mode: InstallMode,
    pub items: Vec<ItemProgress>,
    pub output: VecDeque<String>,
    /// Tool that produced the latest event
    pub current: Option<usize>,
}

impl InstallProgressState {
    pub fn new(items: &[String], mode: InstallMode) -> Self {
        Self {
            mode,
            items: items
                .iter()
                .map(|name| ItemProgress {
                    name: name.clone(),
                    status: ItemStatus::Pending,
                    progress: None,
                })
                .collect(),
            output: VecDeque::new(),
            current: None,
        }
    }

    pub fn apply(&mut self, event: &InstallEvent) {
        match event {
            InstallEvent::Started { index, item } => {
                if let Some(entry) = self.items.get_mut(*index) {
                    entry.status = ItemStatus::Running;
                }
                self.current = Some(*index);
                self.push_output(format!("Installing {}...", item));
            }
            InstallEvent::Line {
                index,
                item,
                line,
                progress,
            } => {
                if let Some(entry) = self.items.get_mut(*index) {
                    entry.progress = Some(*progress);
                }
                self.current = Some(*index);
                let line = match self.mode {
                    InstallMode::Sequential => line.clone(),
                    InstallMode::Concurrent => format!("[{}] {}", item, line),
                };
                self.push_output(line);
            }
            InstallEvent::Finished { index, outcome } => {
                let message = match outcome {
                    InstallOutcome::Success(item) => format!("Successfully installed {}", item),
                    InstallOutcome::Failure { item, reason } => {
                        format!("Failed to install {}: {}", item, reason)
                    }
                };
                if let Some(entry) = self.items.get_mut(*index) {
                    entry.status = ItemStatus::Done(outcome.clone());
                }
                self.push_output(message);
            }
        }
    }

    pub fn finished_count(&self) -> usize {
        self.items
            .iter()
            .filter(|i| matches!(i.status, ItemStatus::Done(_)))
            .count()
    }

    /// Mean of per-tool percentages
    pub fn overall_percent(&self) -> u16 {
        if self.items.is_empty() {
            return 0;
        }
        let total: u32 = self.items.iter().map(|i| u32::from(i.percent())).sum();
        (total / self.items.len() as u32) as u16
    }

    /// Progress estimate of the tool shown in the detail line
    pub fn current_item(&self) -> Option<&ItemProgress> {
        self.current.and_then(|index| self.items.get(index))
    }

    fn push_output(&mut self, line: String) {
        if self.output.len() == MAX_OUTPUT_LINES {
            self.output.pop_front();
        }
        self.output.push_back(line);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn progress(percent: u16) -> Progress {
        Progress {
            percent,
            downloaded_mb: f64::from(percent),
            speed_mb_s: 1.0,
            eta: None,
        }
    }

    fn items() -> Vec<String> {
        vec!["Git".to_string(), "Vim".to_string()]
    }

    #[test]
    fn test_new_state_is_pending() {
        let state = InstallProgressState::new(&items(), InstallMode::Sequential);
        assert_eq!(state.items.len(), 2);
        assert!(state.items.iter().all(|i| i.status == ItemStatus::Pending));
        assert_eq!(state.overall_percent(), 0);
        assert!(state.current_item().is_none());
    }

    #[test]
    fn test_events_update_status_and_output() {
        let mut state = InstallProgressState::new(&items(), InstallMode::Sequential);
        state.apply(&InstallEvent::Started {
            index: 0,
            item: "Git".into(),
        });
        state.apply(&InstallEvent::Line {
            index: 0,
            item: "Git".into(),
            line: "Downloading".into(),
            progress: progress(40),
        });

        assert_eq!(state.items[0].status, ItemStatus::Running);
        assert_eq!(state.current_item().map(|i| i.name.as_str()), Some("Git"));
        assert_eq!(state.overall_percent(), 20);

        state.apply(&InstallEvent::Finished {
            index: 0,
            outcome: InstallOutcome::Success("Git".into()),
        });
        assert_eq!(state.finished_count(), 1);
        assert_eq!(state.overall_percent(), 50);
        assert_eq!(
            state.output.iter().collect::<Vec<_>>(),
            vec!["Installing Git...", "Downloading", "Successfully installed Git"]
        );
    }

    #[test]
    fn test_concurrent_output_is_tagged() {
        let mut state = InstallProgressState::new(&items(), InstallMode::Concurrent);
        state.apply(&InstallEvent::Line {
            index: 1,
            item: "Vim".into(),
            line: "Found Vim".into(),
            progress: progress(5),
        });
        state.apply(&InstallEvent::Finished {
            index: 1,
            outcome: InstallOutcome::Failure {
                item: "Vim".into(),
                reason: "exited with status 1".into(),
            },
        });
        assert_eq!(
            state.output.iter().collect::<Vec<_>>(),
            vec!["[Vim] Found Vim", "Failed to install Vim: exited with status 1"]
        );
    }

    #[test]
    fn test_output_is_bounded() {
        let mut state = InstallProgressState::new(&items(), InstallMode::Sequential);
        for n in 0..MAX_OUTPUT_LINES + 10 {
            state.apply(&InstallEvent::Line {
                index: 0,
                item: "Git".into(),
                line: format!("line {}", n),
                progress: progress(1),
            });
        }
        assert_eq!(state.output.len(), MAX_OUTPUT_LINES);
        assert_eq!(state.output.front().map(String::as_str), Some("line 10"));
    }

    #[test]
    fn test_out_of_range_index_is_ignored() {
        let mut state = InstallProgressState::new(&items(), InstallMode::Sequential);
        state.apply(&InstallEvent::Finished {
            index: 9,
            outcome: InstallOutcome::Success("Ghost".into()),
        });
        assert_eq!(state.finished_count(), 0);
    }
}
