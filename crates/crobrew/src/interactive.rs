//! Numbered menu loop for running several actions in one session

use crobrew_pkg::Dispatcher;
use tokio::io::{self, AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, Lines};
use tracing::debug;

const MENU: &str = "
Options:
1. Update package list
2. Search packages
3. Install a package
4. Remove a package
5. Exit
";

/// Menu session over an input and output stream
struct Session<R, W> {
    lines: Lines<R>,
    output: W,
}

impl<R, W> Session<R, W>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    async fn say(&mut self, text: &str) -> io::Result<()> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.write_all(b"\n").await?;
        self.output.flush().await
    }

    /// Print `text` without a newline and read one trimmed line; `None` on EOF
    async fn ask(&mut self, text: &str) -> io::Result<Option<String>> {
        self.output.write_all(text.as_bytes()).await?;
        self.output.flush().await?;
        Ok(self
            .lines
            .next_line()
            .await?
            .map(|line| line.trim().to_string()))
    }
}

/// Run the menu until the user exits or input ends
///
/// Operation failures are printed and the menu is shown again.
///
/// # Errors
/// Returns error only if reading input or writing output fails
pub async fn run<R, W>(dispatcher: &Dispatcher, input: R, output: W) -> io::Result<()>
where
    R: AsyncBufRead + Unpin,
    W: AsyncWrite + Unpin,
{
    let mut session = Session {
        lines: input.lines(),
        output,
    };

    session.say("Welcome to Crobrew").await?;
    session
        .say(&format!("Using package manager: {}", dispatcher.profile().name))
        .await?;

    loop {
        session.say(MENU).await?;
        let Some(choice) = session.ask("Choose an option (1-5): ").await? else {
            debug!("input closed, leaving menu");
            return session.say("").await;
        };

        match choice.as_str() {
            "1" => {
                session.say("Updating package list...").await?;
                match dispatcher.update().await {
                    Ok(output) => {
                        session.say(output.trim_end()).await?;
                        session.say("Package list updated successfully!").await?;
                    }
                    Err(e) => session.say(&format!("Error: {e}")).await?,
                }
            }
            "2" => {
                let query = session
                    .ask("Enter search term (or press Enter to list all): ")
                    .await?
                    .unwrap_or_default();
                session.say("Searching packages...").await?;
                match dispatcher.search(&query).await {
                    Ok(output) => {
                        session.say("\nAvailable packages:").await?;
                        session.say(output.trim_end()).await?;
                    }
                    Err(e) => session.say(&format!("Error: {e}")).await?,
                }
            }
            "3" => {
                let name = session
                    .ask("Enter package name to install: ")
                    .await?
                    .unwrap_or_default();
                session.say(&format!("Installing {name}...")).await?;
                match dispatcher.install(&name).await {
                    Ok(output) => {
                        session.say(output.trim_end()).await?;
                        session.say(&format!("{name} installed successfully!")).await?;
                    }
                    Err(e) => session.say(&format!("Error: {e}")).await?,
                }
            }
            "4" => {
                let name = session
                    .ask("Enter package name to remove: ")
                    .await?
                    .unwrap_or_default();
                session.say(&format!("Removing {name}...")).await?;
                match dispatcher.remove(&name).await {
                    Ok(output) => {
                        session.say(output.trim_end()).await?;
                        session.say(&format!("{name} removed successfully!")).await?;
                    }
                    Err(e) => session.say(&format!("Error: {e}")).await?,
                }
            }
            "5" | "q" | "quit" | "exit" => {
                return session.say("Thank you for using Crobrew!").await;
            }
            _ => session.say("Invalid option. Please try again.").await?,
        }
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::time::Duration;

    use async_trait::async_trait;
    use crobrew_exec::{CommandExecutor, CommandResult, ExecError};
    use crobrew_pkg::{Platform, Registry};

    use super::*;

    struct RecordingExecutor {
        status: i32,
        calls: Mutex<Vec<Vec<String>>>,
    }

    #[async_trait]
    impl CommandExecutor for RecordingExecutor {
        async fn run(&self, program: &str, args: &[String]) -> Result<CommandResult, ExecError> {
            let mut argv = vec![program.to_string()];
            argv.extend_from_slice(args);
            self.calls.lock().unwrap().push(argv);
            Ok(CommandResult {
                status: self.status,
                stdout: "pkg-a\npkg-b\n".to_string(),
                stderr: if self.status == 0 {
                    String::new()
                } else {
                    "E: Could not open lock file".to_string()
                },
                duration: Duration::from_millis(1),
            })
        }

        async fn run_with_timeout(
            &self,
            program: &str,
            args: &[String],
            _timeout: Duration,
        ) -> Result<CommandResult, ExecError> {
            self.run(program, args).await
        }

        fn executor_type(&self) -> &'static str {
            "recording"
        }
    }

    async fn session(status: i32, input: &str) -> (String, Vec<Vec<String>>) {
        let executor = Arc::new(RecordingExecutor {
            status,
            calls: Mutex::new(Vec::new()),
        });
        let profile = Registry::builtin()
            .profiles(&Platform::Linux)
            .first()
            .cloned()
            .unwrap();
        let dispatcher = Dispatcher::new(profile, executor.clone());

        let mut output = Vec::new();
        run(&dispatcher, input.as_bytes(), &mut output).await.unwrap();

        let calls = executor.calls.lock().unwrap().clone();
        (String::from_utf8(output).unwrap(), calls)
    }

    #[tokio::test]
    async fn test_search_then_exit() {
        let (output, calls) = session(0, "2\nvim\n5\n").await;

        assert!(output.contains("Using package manager: apt"));
        assert!(output.contains("Available packages:"));
        assert!(output.contains("pkg-a"));
        assert!(output.contains("Thank you for using Crobrew!"));
        assert_eq!(calls, [vec!["apt-cache", "search", "vim"]]);
    }

    #[tokio::test]
    async fn test_empty_search_lists_all() {
        let (_, calls) = session(0, "2\n\n5\n").await;

        assert_eq!(calls, [vec!["apt-cache", "search", ""]]);
    }

    #[tokio::test]
    async fn test_error_loops_back_to_menu() {
        let (output, calls) = session(100, "1\n3\nhtop\n5\n").await;

        assert!(output.contains("Error: error updating package list"));
        assert!(output.contains("Could not open lock file"));
        assert!(output.contains("Error: error installing package"));
        assert_eq!(
            calls,
            [
                vec!["sudo", "apt-get", "update"],
                vec!["sudo", "apt-get", "install", "htop"]
            ]
        );
        assert!(output.contains("Thank you for using Crobrew!"));
    }

    #[tokio::test]
    async fn test_invalid_option_and_eof() {
        let (output, calls) = session(0, "9\n").await;

        assert!(output.contains("Invalid option. Please try again."));
        assert!(!output.contains("Thank you"));
        assert!(calls.is_empty());
    }

    #[tokio::test]
    async fn test_remove_without_name_runs_nothing() {
        let (output, calls) = session(0, "4\n\nexit\n").await;

        assert!(output.contains("no package name given"));
        assert!(calls.is_empty());
    }
}
