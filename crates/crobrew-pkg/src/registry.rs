//! Built-in package manager profiles, keyed by platform

use std::collections::HashMap;

use crate::types::{Platform, Profile};

const LINUX: &[Profile] = &[
    Profile::from_static(
        "apt",
        "apt-cache search",
        "sudo apt-get update",
        "sudo apt-get install",
        "sudo apt-get remove",
    ),
    Profile::from_static(
        "dnf",
        "dnf search",
        "sudo dnf check-update",
        "sudo dnf install",
        "sudo dnf remove",
    ),
];

const WINDOWS: &[Profile] = &[
    Profile::from_static(
        "wsl-apt",
        "wsl apt-cache search",
        "wsl sudo apt-get update",
        "wsl sudo apt-get install",
        "wsl sudo apt-get remove",
    ),
    Profile::from_static(
        "choco",
        "choco search",
        "choco upgrade all -y",
        "choco install",
        "choco uninstall",
    ),
];

const DARWIN: &[Profile] = &[Profile::from_static(
    "brew",
    "brew search",
    "brew update",
    "brew install",
    "brew uninstall",
)];

/// Ordered candidate profiles per platform
///
/// Every platform key maps to a non-empty list. Unknown platforms resolve to
/// the Linux list, which also covers ChromeOS.
#[derive(Debug, Clone)]
pub struct Registry {
    entries: HashMap<Platform, Vec<Profile>>,
}

impl Registry {
    /// Registry populated with the built-in profiles
    #[must_use]
    pub fn builtin() -> Self {
        let entries = HashMap::from([
            (Platform::Linux, LINUX.to_vec()),
            (Platform::Windows, WINDOWS.to_vec()),
            (Platform::Darwin, DARWIN.to_vec()),
        ]);
        Self { entries }
    }

    /// Add profiles ahead of the existing candidates for `platform`
    #[must_use]
    pub fn with_profiles(mut self, platform: Platform, profiles: Vec<Profile>) -> Self {
        if profiles.is_empty() {
            return self;
        }
        let existing = self.entries.remove(&platform).unwrap_or_default();
        let mut merged = profiles;
        merged.extend(existing);
        self.entries.insert(platform, merged);
        self
    }

    /// Candidate profiles for a platform, in probe order
    #[must_use]
    pub fn profiles(&self, platform: &Platform) -> &[Profile] {
        match self.entries.get(platform) {
            Some(profiles) if !profiles.is_empty() => profiles,
            _ => self.baseline(),
        }
    }

    /// Profile used when nothing responds to the probe: the first Linux entry
    #[must_use]
    pub fn fallback() -> &'static Profile {
        &LINUX[0]
    }

    /// Look a profile up by name
    ///
    /// The candidates for `platform` are searched first, then every other
    /// platform's list.
    #[must_use]
    pub fn find(&self, platform: &Platform, name: &str) -> Option<&Profile> {
        self.profiles(platform)
            .iter()
            .chain(self.entries.values().flatten())
            .find(|profile| profile.name == name)
    }

    fn baseline(&self) -> &[Profile] {
        self.entries
            .get(&Platform::Linux)
            .filter(|profiles| !profiles.is_empty())
            .map_or(LINUX, Vec::as_slice)
    }
}

impl Default for Registry {
    fn default() -> Self {
        Self::builtin()
    }
}
