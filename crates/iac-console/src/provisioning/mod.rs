//! Form validation, payload building, workflow dispatch and result presentation.

pub mod catalog;
pub mod dispatch;
pub mod params;
pub mod payload;
pub mod presenter;
pub mod request;
pub mod router;
pub mod service;
pub mod validation;

pub use catalog::{catalog, ServiceCategory, ServiceDescriptor, ServiceKind, WorkflowRegistry};
pub use dispatch::{
    ConfigurationError, DispatchError, DispatchOutcome, GitHubDispatchClient, WorkflowDispatcher,
};
pub use params::{ServiceForm, ServiceParams, ValidationResult};
pub use payload::{DispatchPayload, WorkflowInputs, DISPATCH_REF};
pub use presenter::{
    DispatchReceipt, FailureReport, ResponsePresenter, SubmissionOutcome, SummaryDetails,
};
pub use request::{RequestDefaults, ServiceRequest};
pub use router::provisioning_router;
pub use service::ProvisioningService;
pub use validation::ValidationError;

#[cfg(test)]
mod tests;
