//! Error types for crobrew-exec

use std::time::Duration;

use thiserror::Error;

/// Errors that can occur while running an external command
#[derive(Error, Debug, Clone)]
pub enum ExecError {
    /// Command ran but exited with a non-zero status
    #[error("exit status {status}{}", stderr_suffix(.stderr))]
    CommandFailed {
        /// Exit status code
        status: i32,
        /// Stderr output
        stderr: String,
    },

    /// Command timed out
    #[error("command timed out after {timeout:?}")]
    Timeout {
        /// Timeout duration that was exceeded
        timeout: Duration,
    },

    /// Process spawn error (binary missing, not executable, ...)
    #[error("failed to spawn {program}: {message}")]
    SpawnError {
        /// Program that could not be started
        program: String,
        /// OS error text
        message: String,
    },

    /// I/O error while collecting process output
    #[error("I/O error: {0}")]
    IoError(String),

    /// Nothing to run
    #[error("empty command")]
    EmptyCommand,
}

fn stderr_suffix(stderr: &str) -> String {
    let trimmed = stderr.trim();
    if trimmed.is_empty() {
        String::new()
    } else {
        format!(": {trimmed}")
    }
}

impl ExecError {
    /// Check if the program could not be started at all
    #[must_use]
    pub fn is_not_found(&self) -> bool {
        matches!(self, ExecError::SpawnError { .. })
    }

    /// Exit status of the child, if it ran to completion
    #[must_use]
    pub fn status(&self) -> Option<i32> {
        match self {
            ExecError::CommandFailed { status, .. } => Some(*status),
            _ => None,
        }
    }
}
