//! Collaborators for a target that lives on this host.

mod bootstrapper;
mod command_executor;
#[cfg(test)]
mod command_executor_test;
mod connection;
#[cfg(test)]
mod connection_test;
mod file_stager;

pub use bootstrapper::StagingBootstrapper;
pub use command_executor::{CommandModuleExecutor, ENV_WORK_DIR};
pub use connection::{LocalConnection, WORK_DIR_PREFIX};
pub use file_stager::LocalFileStager;
