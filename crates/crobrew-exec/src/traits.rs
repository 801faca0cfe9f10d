//! Command executor trait

use std::time::Duration;

use async_trait::async_trait;

use crate::error::ExecError;
use crate::result::CommandResult;

/// Runs a program with an argument vector and collects its output
///
/// Implementations must not go through a shell: `program` is the binary and
/// `args` are passed to it verbatim.
#[async_trait]
pub trait CommandExecutor: Send + Sync {
    /// Run a command to completion
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ExecError>;

    /// Run a command, giving up after `timeout`
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout: Duration,
    ) -> Result<CommandResult, ExecError>;

    /// Run a command with stdout and stderr attached to the terminal
    ///
    /// Used for commands that may ask the user for confirmation. The
    /// returned result carries the exit status; output fields stay empty
    /// when the streams were not captured.
    async fn run_attached(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecError> {
        self.run(program, args).await
    }

    /// Short name of the executor, for logging
    fn executor_type(&self) -> &'static str;
}
