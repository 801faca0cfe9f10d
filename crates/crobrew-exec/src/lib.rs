//! crobrew-exec: Process execution abstraction
//!
//! Provides the executor trait and a local implementation that spawns
//! package-manager binaries directly, without a shell in between.

pub mod error;
pub mod local;
pub mod result;
pub mod traits;

pub use error::ExecError;
pub use local::LocalExecutor;
pub use result::CommandResult;
pub use traits::CommandExecutor;
