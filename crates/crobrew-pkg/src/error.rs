//! Error types for crobrew-pkg

use crobrew_exec::ExecError;
use thiserror::Error;

use crate::types::Action;

/// Errors that can occur during package operations
#[derive(Error, Debug, Clone)]
pub enum PackageError {
    /// The package manager command could not be run or exited non-zero
    #[error("error {action}: {source}\n{}", .action.hint())]
    CommandFailed {
        /// Operation that failed
        action: Action,
        /// Underlying process error
        source: ExecError,
    },

    /// Install or remove was asked for without a package name
    #[error("error {action}: no package name given")]
    MissingPackageName {
        /// Operation that was attempted
        action: Action,
    },

    /// Profile has no command configured for the action
    #[error("profile {profile} has an empty {action:?} template")]
    EmptyTemplate {
        /// Profile name
        profile: String,
        /// Operation that was attempted
        action: Action,
    },
}

impl PackageError {
    /// Exit status of the failed package manager process, if it ran
    #[must_use]
    pub fn exit_status(&self) -> Option<i32> {
        match self {
            PackageError::CommandFailed { source, .. } => source.status(),
            _ => None,
        }
    }

    /// Check if the package manager binary itself was missing
    #[must_use]
    pub fn manager_missing(&self) -> bool {
        matches!(self, PackageError::CommandFailed { source, .. } if source.is_not_found())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_command_failed_display() {
        let err = PackageError::CommandFailed {
            action: Action::Search,
            source: ExecError::CommandFailed {
                status: 1,
                stderr: "E: regex error".to_string(),
            },
        };

        let message = err.to_string();
        assert!(message.starts_with("error searching packages: exit status 1: E: regex error"));
        assert!(message.contains("This might be because:"));
        assert!(message.contains("3. You don't have the required permissions"));
        assert_eq!(err.exit_status(), Some(1));
        assert!(!err.manager_missing());
    }

    #[test]
    fn test_manager_missing() {
        let err = PackageError::CommandFailed {
            action: Action::Update,
            source: ExecError::SpawnError {
                program: "sudo".to_string(),
                message: "No such file or directory (os error 2)".to_string(),
            },
        };

        assert!(err.manager_missing());
        assert!(err.to_string().contains("No such file or directory"));
        assert!(err.to_string().contains("sudo permissions"));
    }
}
