//! Translates user actions into package manager invocations

use std::sync::Arc;

use crobrew_exec::CommandExecutor;
use tracing::{debug, info, instrument};

use crate::error::PackageError;
use crate::types::{Action, Profile};

/// Split a command template and append the user argument, if any
///
/// The argument is appended verbatim as one token, even when empty, so
/// `apt-cache search ""` still lists every package.
#[must_use]
pub fn build_command(template: &str, arg: Option<&str>) -> Vec<String> {
    template
        .split_whitespace()
        .map(str::to_string)
        .chain(arg.map(str::to_string))
        .collect()
}

/// Runs actions against the profile selected at startup
pub struct Dispatcher {
    profile: Profile,
    executor: Arc<dyn CommandExecutor>,
}

impl Dispatcher {
    /// Create a dispatcher for a detected profile
    pub fn new(profile: Profile, executor: Arc<dyn CommandExecutor>) -> Self {
        Self { profile, executor }
    }

    /// Profile this dispatcher runs commands for
    #[must_use]
    pub fn profile(&self) -> &Profile {
        &self.profile
    }

    /// Refresh the package index
    ///
    /// # Errors
    /// Returns `PackageError::CommandFailed` if the command fails to run or
    /// exits non-zero
    pub async fn update(&self) -> Result<String, PackageError> {
        self.execute(Action::Update, None).await
    }

    /// Search the package index; an empty query lists everything
    ///
    /// # Errors
    /// Returns `PackageError::CommandFailed` if the command fails to run or
    /// exits non-zero
    pub async fn search(&self, query: &str) -> Result<String, PackageError> {
        self.execute(Action::Search, Some(query)).await
    }

    /// Install a package
    ///
    /// The package manager's output goes straight to the terminal so its
    /// confirmation prompt is visible.
    ///
    /// # Errors
    /// Returns `PackageError::MissingPackageName` for an empty name, or
    /// `PackageError::CommandFailed` if the command fails
    pub async fn install(&self, name: &str) -> Result<String, PackageError> {
        self.execute(Action::Install, Some(name)).await
    }

    /// Remove a package
    ///
    /// # Errors
    /// Returns `PackageError::MissingPackageName` for an empty name, or
    /// `PackageError::CommandFailed` if the command fails
    pub async fn remove(&self, name: &str) -> Result<String, PackageError> {
        self.execute(Action::Remove, Some(name)).await
    }

    /// Argument vector that `action` would run, program first
    ///
    /// # Errors
    /// Returns an error if a package name is required but empty, or the
    /// profile's template for `action` is blank
    pub fn command_for(
        &self,
        action: Action,
        arg: Option<&str>,
    ) -> Result<Vec<String>, PackageError> {
        let arg = if action.takes_argument() {
            arg.map(str::trim)
        } else {
            None
        };
        if matches!(action, Action::Install | Action::Remove) && arg.is_none_or(str::is_empty) {
            return Err(PackageError::MissingPackageName { action });
        }

        let argv = build_command(self.profile.template(action), arg);
        if argv.is_empty() {
            return Err(PackageError::EmptyTemplate {
                profile: self.profile.name.to_string(),
                action,
            });
        }

        Ok(argv)
    }

    #[instrument(skip(self), fields(manager = %self.profile.name))]
    async fn execute(&self, action: Action, arg: Option<&str>) -> Result<String, PackageError> {
        let argv = self.command_for(action, arg)?;
        let (program, args) = argv
            .split_first()
            .ok_or_else(|| PackageError::EmptyTemplate {
                profile: self.profile.name.to_string(),
                action,
            })?;

        info!(%action, command = %argv.join(" "), "running package manager");

        let run = if action.may_prompt() {
            self.executor.run_attached(program, args).await
        } else {
            self.executor.run(program, args).await
        };
        let result = run
            .and_then(crobrew_exec::CommandResult::into_success)
            .map_err(|source| PackageError::CommandFailed { action, source })?;

        debug!(duration = ?result.duration, "package manager finished");

        Ok(result.combined_output())
    }
}
