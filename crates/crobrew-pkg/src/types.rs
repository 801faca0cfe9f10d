//! Type definitions for package management

use std::borrow::Cow;

use serde::{Deserialize, Serialize};

/// Operating system family used as the registry key
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Platform {
    /// Linux, including ChromeOS (Crostini) and WSL guests
    Linux,
    /// Windows
    Windows,
    /// macOS
    Darwin,
    /// Anything else, keyed by its raw OS string
    Other(String),
}

impl Platform {
    /// Platform of the running binary
    #[must_use]
    pub fn current() -> Self {
        Self::from_os(std::env::consts::OS)
    }

    /// Map an OS identifier to a platform
    ///
    /// Accepts both Rust's `std::env::consts::OS` values and the `darwin`
    /// spelling used by most other toolchains.
    #[must_use]
    pub fn from_os(os: &str) -> Self {
        match os.trim().to_ascii_lowercase().as_str() {
            "linux" => Platform::Linux,
            "windows" => Platform::Windows,
            "macos" | "darwin" => Platform::Darwin,
            other => Platform::Other(other.to_string()),
        }
    }

    /// Registry key for this platform
    #[must_use]
    pub fn key(&self) -> &str {
        match self {
            Platform::Linux => "linux",
            Platform::Windows => "windows",
            Platform::Darwin => "darwin",
            Platform::Other(os) => os,
        }
    }
}

impl std::fmt::Display for Platform {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.key())
    }
}

/// A user-facing package operation
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Refresh the package index
    Update,
    /// Search the package index
    Search,
    /// Install a package
    Install,
    /// Remove a package
    Remove,
}

impl Action {
    /// Whether the action takes a user-supplied argument
    #[must_use]
    pub fn takes_argument(self) -> bool {
        !matches!(self, Action::Update)
    }

    /// Whether the package manager may ask for confirmation
    ///
    /// These commands run with the terminal attached so the prompt is seen.
    #[must_use]
    pub fn may_prompt(self) -> bool {
        matches!(self, Action::Install | Action::Remove)
    }

    /// Troubleshooting hint shown when the command fails
    #[must_use]
    pub fn hint(self) -> &'static str {
        match self {
            Action::Search => {
                "This might be because:\n\
                 1. You're not in a supported environment\n\
                 2. The package manager is not available\n\
                 3. You don't have the required permissions"
            }
            Action::Update | Action::Install | Action::Remove => {
                "This might be because:\n\
                 1. You're not in a supported environment\n\
                 2. You don't have sudo permissions\n\
                 3. The package manager is not available"
            }
        }
    }
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Action::Update => write!(f, "updating package list"),
            Action::Search => write!(f, "searching packages"),
            Action::Install => write!(f, "installing package"),
            Action::Remove => write!(f, "removing package"),
        }
    }
}

/// Command templates for one package manager
///
/// Each template is a whitespace-separated command line; the user argument
/// (query or package name) is appended as a final token.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Profile {
    /// Short identifier (`apt`, `dnf`, `brew`, ...)
    pub name: Cow<'static, str>,
    /// Search command template
    pub search: Cow<'static, str>,
    /// Index refresh command template
    pub update: Cow<'static, str>,
    /// Install command template
    pub install: Cow<'static, str>,
    /// Remove command template
    pub remove: Cow<'static, str>,
}

impl Profile {
    /// Build a profile from static templates
    #[must_use]
    pub const fn from_static(
        name: &'static str,
        search: &'static str,
        update: &'static str,
        install: &'static str,
        remove: &'static str,
    ) -> Self {
        Self {
            name: Cow::Borrowed(name),
            search: Cow::Borrowed(search),
            update: Cow::Borrowed(update),
            install: Cow::Borrowed(install),
            remove: Cow::Borrowed(remove),
        }
    }

    /// Template for the given action
    #[must_use]
    pub fn template(&self, action: Action) -> &str {
        match action {
            Action::Update => &self.update,
            Action::Search => &self.search,
            Action::Install => &self.install,
            Action::Remove => &self.remove,
        }
    }

    /// Binary probed during detection: the first token of the search template
    #[must_use]
    pub fn search_tool(&self) -> Option<&str> {
        self.search.split_whitespace().next()
    }
}
