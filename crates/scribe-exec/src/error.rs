//! Domain errors raised by external-tool execution.
//!
//! All errors use `thiserror`-derived enums with structured context so
//! callers can inspect the failure programmatically. I/O errors are wrapped
//! in `Arc` to satisfy the `result_large_err` Clippy lint.

use std::sync::Arc;

use thiserror::Error;

/// Errors arising from running an external tool.
#[derive(Debug, Error, Clone)]
pub enum ExecError {
    /// The executable could not be located before the process was spawned.
    ///
    /// Distinct from [`ExecError::NonZeroExit`]: the tool never ran.
    #[error("executable '{command}' not found on the search path")]
    ToolNotFound {
        /// Program name that was looked up.
        command: String,
    },

    /// The tool ran but reported failure through its exit status.
    ///
    /// Callers treat this as a recoverable condition ("requirement not
    /// met"), not a program fault.
    #[error("'{command}' exited with status {status}: {stderr}")]
    NonZeroExit {
        /// Program name that was executed.
        command: String,
        /// Process exit status, `-1` when terminated by a signal.
        status: i32,
        /// Captured standard-error text for diagnostics.
        stderr: String,
    },

    /// The process could not be spawned for a reason other than a missing
    /// executable.
    #[error("failed to spawn '{command}': {source}")]
    Spawn {
        /// Program name that was executed.
        command: String,
        /// Underlying I/O error.
        #[source]
        source: Arc<std::io::Error>,
    },
}

impl ExecError {
    /// Returns the program name the failing invocation referred to.
    #[must_use]
    pub fn command(&self) -> &str {
        match self {
            Self::ToolNotFound { command }
            | Self::NonZeroExit { command, .. }
            | Self::Spawn { command, .. } => command.as_str(),
        }
    }

    /// Whether the failure means the executable itself is absent.
    #[must_use]
    pub const fn is_tool_not_found(&self) -> bool {
        matches!(self, Self::ToolNotFound { .. })
    }
}
