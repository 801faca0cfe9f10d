//! Local command execution using `tokio::process`

use std::process::Stdio;
use std::time::{Duration, Instant};

use async_trait::async_trait;
use tokio::process::Command;
use tokio::time::timeout;
use tracing::{debug, instrument};

use crate::error::ExecError;
use crate::result::CommandResult;
use crate::traits::CommandExecutor;

/// Local command executor
///
/// Spawns the program directly with `tokio::process::Command`. Stdin is
/// inherited so tools such as `sudo` can still prompt on the terminal;
/// stdout and stderr are captured unless the command runs attached.
///
/// Failures are logged at debug only. Callers decide whether a non-zero
/// exit is worth reporting.
#[derive(Debug, Clone)]
pub struct LocalExecutor;

impl LocalExecutor {
    /// Create a new local executor
    #[must_use]
    pub fn new() -> Self {
        Self
    }

    /// Internal method to execute command
    #[instrument(skip(self), level = "debug")]
    async fn execute(
        &self,
        program: &str,
        args: &[String],
        attached: bool,
    ) -> Result<CommandResult, ExecError> {
        if program.is_empty() {
            return Err(ExecError::EmptyCommand);
        }

        let start = Instant::now();

        debug!(program = %program, ?args, attached, "executing local command");

        let output_mode = || {
            if attached {
                Stdio::inherit()
            } else {
                Stdio::piped()
            }
        };

        let child = Command::new(program)
            .args(args)
            .stdin(Stdio::inherit())
            .stdout(output_mode())
            .stderr(output_mode())
            .kill_on_drop(true)
            .spawn()
            .map_err(|e| ExecError::SpawnError {
                program: program.to_string(),
                message: e.to_string(),
            })?;

        let output = child
            .wait_with_output()
            .await
            .map_err(|e| ExecError::IoError(e.to_string()))?;

        let duration = start.elapsed();

        let status = output.status.code().unwrap_or(-1);
        let stdout = String::from_utf8_lossy(&output.stdout).to_string();
        let stderr = String::from_utf8_lossy(&output.stderr).to_string();

        debug!(
            program = %program,
            status = status,
            duration = ?duration,
            "command completed"
        );

        if !output.status.success() {
            debug!(
                program = %program,
                status = status,
                stderr = %stderr,
                "command failed"
            );
        }

        Ok(CommandResult {
            status,
            stdout,
            stderr,
            duration,
        })
    }
}

impl Default for LocalExecutor {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl CommandExecutor for LocalExecutor {
    #[instrument(skip(self), level = "debug")]
    async fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ExecError> {
        self.execute(program, args, false).await
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_with_timeout(
        &self,
        program: &str,
        args: &[String],
        timeout_duration: Duration,
    ) -> Result<CommandResult, ExecError> {
        let start = Instant::now();

        debug!(program = %program, timeout = ?timeout_duration, "executing with timeout");

        match timeout(timeout_duration, self.execute(program, args, false)).await {
            Ok(result) => result,
            Err(_) => {
                debug!(
                    program = %program,
                    timeout = ?timeout_duration,
                    elapsed = ?start.elapsed(),
                    "command timed out"
                );
                Err(ExecError::Timeout {
                    timeout: timeout_duration,
                })
            }
        }
    }

    #[instrument(skip(self), level = "debug")]
    async fn run_attached(
        &self,
        program: &str,
        args: &[String],
    ) -> Result<CommandResult, ExecError> {
        self.execute(program, args, true).await
    }

    fn executor_type(&self) -> &'static str {
        "local"
    }
}

#[cfg(all(test, unix))]
mod tests {
    use std::io;
    use std::sync::{Arc, Mutex};

    use super::*;

    /// Log sink shared between the subscriber and the test
    #[derive(Clone, Default)]
    struct LogBuffer(Arc<Mutex<Vec<u8>>>);

    impl LogBuffer {
        fn contents(&self) -> String {
            String::from_utf8(self.0.lock().unwrap().clone()).unwrap()
        }
    }

    impl io::Write for LogBuffer {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn sh(script: &str) -> Vec<String> {
        vec!["-c".to_string(), script.to_string()]
    }

    #[tokio::test]
    async fn test_run_success() {
        let executor = LocalExecutor::new();
        let result = executor.run("echo", &["hello".to_string()]).await.unwrap();

        assert!(result.success());
        assert_eq!(result.stdout.trim(), "hello");
    }

    #[tokio::test]
    async fn test_args_are_not_shell_expanded() {
        let executor = LocalExecutor::new();
        let result = executor
            .run("echo", &["$HOME".to_string(), String::new()])
            .await
            .unwrap();

        assert_eq!(result.stdout, "$HOME \n");
    }

    #[tokio::test]
    async fn test_run_failure() {
        let executor = LocalExecutor::new();
        let result = executor.run("sh", &sh("exit 42")).await.unwrap();

        assert!(!result.success());
        assert_eq!(result.status, 42);
    }

    #[tokio::test]
    async fn test_run_missing_binary() {
        let executor = LocalExecutor::new();
        let result = executor.run("crobrew-definitely-not-installed", &[]).await;

        assert!(matches!(result, Err(ExecError::SpawnError { .. })));
    }

    #[tokio::test]
    async fn test_run_empty_program() {
        let executor = LocalExecutor::new();
        let result = executor.run("", &[]).await;

        assert!(matches!(result, Err(ExecError::EmptyCommand)));
    }

    #[tokio::test]
    async fn test_run_timeout() {
        let executor = LocalExecutor::new();
        let result = executor
            .run_with_timeout("sleep", &["5".to_string()], Duration::from_millis(100))
            .await;

        assert!(matches!(result, Err(ExecError::Timeout { .. })));
    }

    #[tokio::test]
    async fn test_run_with_stderr() {
        let executor = LocalExecutor::new();
        let result = executor.run("sh", &sh("echo error >&2")).await.unwrap();

        assert!(result.success());
        assert_eq!(result.stderr.trim(), "error");
    }

    #[tokio::test]
    async fn test_run_attached_keeps_status() {
        let executor = LocalExecutor::new();
        let result = executor
            .run_attached("sh", &sh("echo shown; exit 3"))
            .await
            .unwrap();

        assert_eq!(result.status, 3);
        assert!(result.stdout.is_empty());
        assert!(result.stderr.is_empty());
    }

    #[tokio::test]
    async fn test_failures_stay_below_warn() {
        let logs = LogBuffer::default();
        let writer = logs.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::WARN)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();
        let _guard = tracing::subscriber::set_default(subscriber);

        let executor = LocalExecutor::new();
        let failed = executor.run("sh", &sh("exit 1")).await.unwrap();
        let timed_out = executor
            .run_with_timeout("sleep", &["5".to_string()], Duration::from_millis(100))
            .await;

        assert_eq!(failed.status, 1);
        assert!(matches!(timed_out, Err(ExecError::Timeout { .. })));
        assert!(logs.contents().is_empty(), "{}", logs.contents());
    }
}
