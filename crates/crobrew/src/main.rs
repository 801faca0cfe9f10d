//! crobrew CLI
//!
//! Detects the host's native package manager and forwards update, search,
//! install and remove to it

use std::path::PathBuf;
use std::sync::Arc;

use clap::{Parser, Subcommand};
use color_eyre::Result;
use crobrew_exec::{CommandExecutor, LocalExecutor};
use crobrew_pkg::{Detector, Dispatcher, PackageError, Platform};
use tokio::io::BufReader;
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

mod config;
mod interactive;

use config::Config;

#[derive(Parser, Debug)]
#[command(name = "crobrew", version)]
#[command(about = "Cross-platform front-end for the native package manager", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Option<Commands>,

    /// Path to a crobrew.toml configuration file
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Use this package manager profile instead of probing (apt, dnf, brew, ...)
    #[arg(long, global = true)]
    manager: Option<String>,

    /// Enable debug logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Refresh the package list
    Update,
    /// Search packages; without a query, list all
    Search {
        /// Search term
        #[arg(default_value = "")]
        query: String,
    },
    /// Install a package
    Install {
        /// Package name
        package: String,
    },
    /// Remove a package
    Remove {
        /// Package name
        package: String,
    },
    /// Pick actions from a menu (default)
    Interactive,
}

fn init_tracing(config: &Config, verbose: bool) -> Result<()> {
    let level = if verbose { "debug" } else { config.log_level.as_str() };
    let filter = match EnvFilter::try_from_default_env() {
        Ok(filter) => filter,
        Err(_) => EnvFilter::try_new(level)?,
    };

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();

    Ok(())
}

/// Exit code for a command line clap rejected; help and version are not errors
fn usage_exit_code(err: &clap::Error) -> i32 {
    i32::from(err.use_stderr())
}

/// Exit code for a finished operation
fn exit_code(result: &Result<(), PackageError>) -> i32 {
    i32::from(result.is_err())
}

fn print_output(output: &str) {
    let output = output.trim_end();
    if !output.is_empty() {
        println!("{output}");
    }
}

#[tokio::main(flavor = "current_thread")]
async fn main() -> Result<()> {
    // Initialize error handling
    color_eyre::install()?;

    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(err) => {
            let code = usage_exit_code(&err);
            err.print()?;
            std::process::exit(code);
        }
    };

    let config = Config::load_default(cli.config.as_deref())?;
    init_tracing(&config, cli.verbose)?;
    match &config.source {
        Some(path) => debug!(path = %path.display(), "loaded configuration"),
        None => debug!("no config file found, using defaults"),
    }

    let executor: Arc<dyn CommandExecutor> = Arc::new(LocalExecutor::new());
    let platform = Platform::current();
    let detector = Detector::new(executor.clone(), config.registry())
        .with_probe_timeout(config.probe_timeout())
        .with_forced_manager(cli.manager.or(config.manager));
    let profile = detector.detect(&platform).await;
    info!(%platform, manager = %profile.name, "package manager selected");

    let dispatcher = Dispatcher::new(profile, executor);

    let result = match cli.command.unwrap_or(Commands::Interactive) {
        Commands::Interactive => {
            let stdin = BufReader::new(tokio::io::stdin());
            interactive::run(&dispatcher, stdin, tokio::io::stdout()).await?;
            return Ok(());
        }
        Commands::Update => {
            println!("Updating package list...");
            dispatcher.update().await.map(|output| {
                print_output(&output);
                println!("Package list updated successfully!");
            })
        }
        Commands::Search { query } => dispatcher.search(&query).await.map(|o| print_output(&o)),
        Commands::Install { package } => {
            dispatcher.install(&package).await.map(|o| print_output(&o))
        }
        Commands::Remove { package } => dispatcher.remove(&package).await.map(|o| print_output(&o)),
    };

    if let Err(err) = &result {
        debug!(status = ?err.exit_status(), "package manager failed");
        eprintln!("Error: {err}");
        std::process::exit(exit_code(&result));
    }

    Ok(())
}
