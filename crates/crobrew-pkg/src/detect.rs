//! Package manager detection by probing candidate binaries

use std::sync::Arc;
use std::time::Duration;

use crobrew_exec::CommandExecutor;
use tracing::{debug, info, instrument, warn};

use crate::registry::Registry;
use crate::types::{Platform, Profile};

/// Default time a single `--version` probe may take
pub const DEFAULT_PROBE_TIMEOUT: Duration = Duration::from_secs(10);

const VERSION_FLAG: &str = "--version";

/// Selects the package manager profile to use on this machine
pub struct Detector {
    executor: Arc<dyn CommandExecutor>,
    registry: Registry,
    probe_timeout: Duration,
    forced: Option<String>,
}

impl Detector {
    /// Create a detector over a registry
    ///
    /// # Arguments
    /// * `executor` - Executor used to run the `--version` probes
    /// * `registry` - Candidate profiles per platform
    pub fn new(executor: Arc<dyn CommandExecutor>, registry: Registry) -> Self {
        Self {
            executor,
            registry,
            probe_timeout: DEFAULT_PROBE_TIMEOUT,
            forced: None,
        }
    }

    /// Set the per-probe timeout
    #[must_use]
    pub fn with_probe_timeout(mut self, timeout: Duration) -> Self {
        self.probe_timeout = timeout;
        self
    }

    /// Skip probing and use the named profile, if the registry knows it
    #[must_use]
    pub fn with_forced_manager(mut self, name: Option<String>) -> Self {
        self.forced = name;
        self
    }

    /// Pick a profile for `platform`
    ///
    /// Candidates are probed in registry order and the first one whose
    /// search tool answers `--version` successfully wins. When none answers,
    /// the first Linux profile is returned. Never fails.
    #[instrument(skip_all, fields(platform = %platform))]
    pub async fn detect(&self, platform: &Platform) -> Profile {
        if let Some(name) = &self.forced {
            if let Some(profile) = self.registry.find(platform, name) {
                info!(manager = %profile.name, "using configured package manager");
                return profile.clone();
            }
            warn!(manager = %name, "configured package manager is unknown, probing instead");
        }

        for profile in self.registry.profiles(platform) {
            if self.probe(profile).await {
                info!(manager = %profile.name, "detected package manager");
                return profile.clone();
            }
        }

        let fallback = Registry::fallback();
        info!(manager = %fallback.name, "no package manager responded, using fallback");
        fallback.clone()
    }

    /// Check whether a profile's search tool is installed and runnable
    pub async fn probe(&self, profile: &Profile) -> bool {
        let Some(tool) = profile.search_tool() else {
            debug!(manager = %profile.name, "empty search template, skipping");
            return false;
        };

        let args = [VERSION_FLAG.to_string()];
        match self
            .executor
            .run_with_timeout(tool, &args, self.probe_timeout)
            .await
        {
            Ok(result) => {
                debug!(manager = %profile.name, tool, status = result.status, "probe finished");
                result.success()
            }
            Err(e) => {
                debug!(manager = %profile.name, tool, error = %e, "probe failed");
                false
            }
        }
    }
}
