//! Error handling module for X3 Tools
//!
//! Provides the crate-wide error type. Per-item install failures are not
//! errors at this level: they are recorded as `InstallOutcome::Failure` by the
//! orchestrator and never propagate to the session controller.

use thiserror::Error;

/// Main error type for X3 Tools
#[derive(Error, Debug)]
pub enum X3Error {
    /// IO errors (file operations, terminal, etc.)
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// Catalog construction or loading errors
    #[error("Catalog error: {0}")]
    Catalog(String),

    /// Config store read/write errors
    #[error("Persistence error: {0}")]
    Persistence(String),

    /// Terminal/UI errors
    #[error("Terminal error: {0}")]
    Terminal(String),

    /// JSON serialization/deserialization errors
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

/// Result type alias for X3 Tools operations
pub type Result<T> = std::result::Result<T, X3Error>;

impl X3Error {
    /// Create a catalog error
    pub fn catalog(msg: impl Into<String>) -> Self {
        Self::Catalog(msg.into())
    }

    /// Create a persistence error
    pub fn persistence(msg: impl Into<String>) -> Self {
        Self::Persistence(msg.into())
    }

    /// Create a terminal error
    pub fn terminal(msg: impl Into<String>) -> Self {
        Self::Terminal(msg.into())
    }
}
