//! # nginx-config-dispatch
//!
//! Gets a managed node ready for the `nginx_config` module and runs it.
//!
//! ## Architecture
//!
//! [ConfigDispatcher] orchestrates one dispatch per call over injected collaborators
//! ([Connection], [FileStager], [ModuleExecutor], [DependencyBootstrapper]):
//!
//! - direct staging (default): copy `<install_root>/files/utils` into the target's working
//!   directory, stop if that fails, then run the module with the caller's original arguments;
//! - bootstrap: hand the declared sources and the effective payload to a bootstrapper.
//!
//! Check mode returns a skipped result without touching the target. The `local` module
//! provides collaborators for a target directory on this host.

pub mod collaborators;
pub mod config;
pub mod dispatcher;
pub mod error;
pub mod local;
pub mod report_io;
#[cfg(test)]
mod report_io_test;
pub mod types;

pub use collaborators::{Connection, DependencyBootstrapper, FileStager, ModuleExecutor};
pub use config::{DispatchStrategy, DispatcherConfig};
pub use dispatcher::{Collaborators, ConfigDispatcher};
pub use error::DispatchError;
pub use types::{
  ConfigurationPayload, DispatchContext, ExecutionResult, ModuleArgs, SourceSpec, StagingResult,
};
