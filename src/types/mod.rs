//! Values that flow through a dispatch.

mod bootstrap_request;
mod configuration_payload;
#[cfg(test)]
mod configuration_payload_test;
mod dispatch_context;
mod dispatch_report;
mod execution_result;
mod module_args;
mod outcome_status;
mod source_spec;
mod staging_result;

pub use bootstrap_request::BootstrapRequest;
pub use configuration_payload::ConfigurationPayload;
pub use dispatch_context::DispatchContext;
pub use dispatch_report::DispatchReport;
pub use execution_result::ExecutionResult;
pub use module_args::{ModuleArgs, ModuleInvocation, StructuredArgs};
pub use outcome_status::OutcomeStatus;
pub use source_spec::SourceSpec;
pub use staging_result::{StagingRequest, StagingResult};
