//! crobrew-pkg: Package manager detection and dispatch
//!
//! Holds the per-platform registry of package manager profiles, the
//! detector that picks one at startup, and the dispatcher that turns
//! update/search/install/remove into child processes.

pub mod detect;
pub mod dispatch;
pub mod error;
pub mod registry;
pub mod types;

pub use detect::{DEFAULT_PROBE_TIMEOUT, Detector};
pub use dispatch::{Dispatcher, build_command};
pub use error::PackageError;
pub use registry::Registry;
pub use types::{Action, Platform, Profile};
