//! Shared enums for X3 Tools
//!
//! String forms are derived with strum so the CLI, the log file and the UI
//! all agree on spelling.

use serde::{Deserialize, Serialize};
use strum::{Display, EnumIter, EnumString};

/// How a batch of selected tools is installed
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[derive(Display, EnumString, EnumIter)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase", ascii_case_insensitive)]
pub enum InstallMode {
    /// One tool after another, with live progress for each
    #[default]
    Sequential,
    /// Every tool at once, each in its own worker
    Concurrent,
}

impl InstallMode {
    /// Notice shown once a run in this mode has finished
    pub const fn completion_notice(self) -> &'static str {
        match self {
            Self::Sequential => "Installation process completed.",
            Self::Concurrent => "All installations completed.",
        }
    }
}
