//! Session state machine
//!
//! Authoritative record of which screen the session is on. Transitions are
//! validated so the controller cannot, for example, start an install without
//! passing through the confirmation prompt.
//!
//! # State Flow
//!
//! ```text
//! Browsing ──InstallTrigger──▶ ConfirmingInstall ──Confirm──▶ Installing
//!    ▲  ▲                            │                            │
//!    │  └────────────Cancel──────────┘                      run finished
//!    │                                                            ▼
//!    └──────────────────any key──────────────────────── ReviewingResults
//!
//! (Any state can transition to Terminated)
//! ```

use std::fmt;
use thiserror::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum SessionState {
    /// Navigating the grid and toggling tools
    #[default]
    Browsing,

    /// Waiting for the user to confirm the selection
    ConfirmingInstall,

    /// An install run is in progress
    Installing,

    /// Per-tool results of the finished run stay up until a key is pressed
    ReviewingResults,

    /// The session has ended (terminal state)
    Terminated,
}

impl SessionState {
    #[inline]
    pub const fn is_terminal(self) -> bool {
        matches!(self, Self::Terminated)
    }

    pub const fn description(self) -> &'static str {
        match self {
            Self::Browsing => "Browsing",
            Self::ConfirmingInstall => "Confirming installation",
            Self::Installing => "Installing",
            Self::ReviewingResults => "Reviewing results",
            Self::Terminated => "Terminated",
        }
    }

    /// Whether moving from `self` to `target` is a legal transition
    pub const fn can_transition_to(self, target: Self) -> bool {
        match (self, target) {
            (Self::Terminated, _) => false,
            (_, Self::Terminated) => true,
            (Self::Browsing, Self::ConfirmingInstall) => true,
            (Self::ConfirmingInstall, Self::Installing | Self::Browsing) => true,
            (Self::Installing, Self::ReviewingResults) => true,
            (Self::ReviewingResults, Self::Browsing) => true,
            _ => false,
        }
    }
}

impl fmt::Display for SessionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum SessionTransitionError {
    #[error("Cannot transition from terminal state {from}")]
    FromTerminalState { from: SessionState },

    #[error("Already in state {state}")]
    AlreadyInState { state: SessionState },

    #[error("Invalid transition from {from} to {to}")]
    InvalidTransition { from: SessionState, to: SessionState },
}

/// Owns the current state and counts completed install runs
#[derive(Debug, Clone, Default)]
pub struct SessionMachine {
    current: SessionState,
    runs_completed: usize,
}

impl SessionMachine {
    pub fn new() -> Self {
        Self::default()
    }

    #[inline]
    pub fn current(&self) -> SessionState {
        self.current
    }

    #[inline]
    pub fn is_terminated(&self) -> bool {
        self.current.is_terminal()
    }

    /// Number of install runs that finished and reported results
    pub fn runs_completed(&self) -> usize {
        self.runs_completed
    }

    /// Move to `target`.
    ///
    /// # Errors
    ///
    /// - `FromTerminalState` once the session has terminated
    /// - `AlreadyInState` if `target` is the current state
    /// - `InvalidTransition` for any other edge missing from the flow above
    pub fn transition_to(
        &mut self,
        target: SessionState,
    ) -> Result<SessionState, SessionTransitionError> {
        let from = self.current;

        if from.is_terminal() {
            return Err(SessionTransitionError::FromTerminalState { from });
        }
        if from == target {
            return Err(SessionTransitionError::AlreadyInState { state: from });
        }
        if !from.can_transition_to(target) {
            return Err(SessionTransitionError::InvalidTransition { from, to: target });
        }

        if from == SessionState::Installing && target == SessionState::ReviewingResults {
            self.runs_completed += 1;
        }

        tracing::debug!("Session state: {} -> {}", from, target);
        self.current = target;
        Ok(target)
    }
}
