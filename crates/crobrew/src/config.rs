//! Configuration loading and types

use std::path::{Path, PathBuf};
use std::time::Duration;

use crobrew_pkg::{DEFAULT_PROBE_TIMEOUT, Platform, Profile, Registry};
use serde::{Deserialize, Serialize};

/// Environment variable naming an explicit config file
pub const CONFIG_ENV: &str = "CROBREW_CONFIG";

/// Top-level configuration, read from `crobrew.toml`
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Config {
    /// Log filter used when `RUST_LOG` is unset (trace, debug, info, warn, error)
    #[serde(default = "default_log_level")]
    pub log_level: String,
    /// Force a package manager by profile name instead of probing
    #[serde(default)]
    pub manager: Option<String>,
    /// Seconds a single `--version` probe may take during detection
    #[serde(default = "default_probe_timeout_secs")]
    pub probe_timeout_secs: u64,
    /// Extra profiles, tried before the built-in ones of their platform
    #[serde(default, rename = "profile")]
    pub profiles: Vec<UserProfile>,
    /// File this configuration was read from
    #[serde(skip)]
    pub source: Option<PathBuf>,
}

/// A profile declared in the config file
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct UserProfile {
    /// Platform key the profile belongs to (`linux`, `windows`, `darwin`, ...)
    #[serde(default = "default_platform")]
    pub platform: String,
    /// Command templates
    #[serde(flatten)]
    pub profile: Profile,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            log_level: default_log_level(),
            manager: None,
            probe_timeout_secs: default_probe_timeout_secs(),
            profiles: Vec::new(),
            source: None,
        }
    }
}

fn default_log_level() -> String {
    "warn".to_string()
}

fn default_probe_timeout_secs() -> u64 {
    DEFAULT_PROBE_TIMEOUT.as_secs()
}

fn default_platform() -> String {
    "linux".to_string()
}

impl Config {
    /// Parse configuration from TOML text
    ///
    /// # Errors
    /// Returns error if the text is not valid configuration
    pub fn from_toml(content: &str) -> eyre::Result<Self> {
        let config: Config = toml::from_str(content)?;
        Ok(config)
    }

    /// Load configuration from file
    ///
    /// # Errors
    /// Returns error if file cannot be read or parsed
    pub fn load(path: &Path) -> eyre::Result<Self> {
        let content = std::fs::read_to_string(path)
            .map_err(|e| eyre::eyre!("failed to read {}: {e}", path.display()))?;
        let mut config = Self::from_toml(&content)
            .map_err(|e| eyre::eyre!("failed to parse {}: {e}", path.display()))?;
        config.source = Some(path.to_path_buf());
        Ok(config)
    }

    /// Load from an explicit path, the environment, default paths, or use defaults
    ///
    /// # Errors
    /// Returns error if a config file exists but cannot be read or parsed
    pub fn load_default(explicit: Option<&Path>) -> eyre::Result<Self> {
        if let Some(path) = explicit {
            return Self::load(path);
        }

        // Check environment variable
        if let Ok(path) = std::env::var(CONFIG_ENV) {
            return Self::load(&PathBuf::from(path));
        }

        // Try common paths
        let mut paths = vec![PathBuf::from("crobrew.toml")];
        if let Some(dir) = dirs::config_dir() {
            paths.push(dir.join("crobrew/crobrew.toml"));
        }

        for path in paths {
            if path.exists() {
                return Self::load(&path);
            }
        }

        Ok(Config::default())
    }

    /// Per-probe timeout for detection
    #[must_use]
    pub fn probe_timeout(&self) -> Duration {
        Duration::from_secs(self.probe_timeout_secs)
    }

    /// Built-in registry extended with the configured profiles
    ///
    /// Profiles keep their file order within a platform.
    #[must_use]
    pub fn registry(&self) -> Registry {
        let mut grouped: Vec<(Platform, Vec<Profile>)> = Vec::new();
        for entry in &self.profiles {
            let platform = Platform::from_os(&entry.platform);
            match grouped.iter_mut().find(|(p, _)| *p == platform) {
                Some((_, list)) => list.push(entry.profile.clone()),
                None => grouped.push((platform, vec![entry.profile.clone()])),
            }
        }

        grouped
            .into_iter()
            .fold(Registry::builtin(), |registry, (platform, profiles)| {
                registry.with_profiles(platform, profiles)
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_file_uses_defaults() {
        let config = Config::from_toml("").unwrap();

        assert_eq!(config.log_level, "warn");
        assert_eq!(config.manager, None);
        assert_eq!(config.probe_timeout(), Duration::from_secs(10));
        assert!(config.profiles.is_empty());
    }

    #[test]
    fn test_full_file() {
        let config = Config::from_toml(
            r#"
log_level = "debug"
manager = "pacman"
probe_timeout_secs = 3

[[profile]]
name = "pacman"
search = "pacman -Ss"
update = "sudo pacman -Sy"
install = "sudo pacman -S"
remove = "sudo pacman -R"

[[profile]]
platform = "macos"
name = "port"
search = "port search"
update = "sudo port selfupdate"
install = "sudo port install"
remove = "sudo port uninstall"
"#,
        )
        .unwrap();

        assert_eq!(config.log_level, "debug");
        assert_eq!(config.manager.as_deref(), Some("pacman"));
        assert_eq!(config.probe_timeout(), Duration::from_secs(3));
        assert_eq!(config.profiles.len(), 2);
        assert_eq!(config.profiles[0].platform, "linux");

        let registry = config.registry();
        let linux: Vec<&str> = registry
            .profiles(&Platform::Linux)
            .iter()
            .map(|p| p.name.as_ref())
            .collect();
        assert_eq!(linux, ["pacman", "apt", "dnf"]);
        assert_eq!(registry.profiles(&Platform::Darwin)[0].name, "port");
    }

    #[test]
    fn test_profile_missing_template_is_rejected() {
        let result = Config::from_toml(
            r#"
[[profile]]
name = "half"
search = "half search"
"#,
        );

        assert!(result.is_err());
    }

    #[test]
    fn test_load_missing_file() {
        let err = Config::load(Path::new("/nonexistent/crobrew.toml")).unwrap_err();

        assert!(err.to_string().contains("/nonexistent/crobrew.toml"));
    }
}
