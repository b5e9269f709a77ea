use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{json_list, starts_with, ValidationError};

/// Parameter Store namespace plus optional Session Manager settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SsmParams {
    pub environment: String,
    pub region: String,
    pub namespace: String,
    pub parameters: String,
    pub parameter_count: usize,
    pub use_kms: bool,
    pub kms_key_id: String,
    pub session_manager: bool,
    pub session_logging: String,
    pub s3_bucket_logs: String,
}

impl ServiceForm for SsmParams {
    const KIND: ServiceKind = ServiceKind::Ssm;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let namespace = request.text("namespace");
        starts_with("namespace", namespace, "/")?;

        let parameters = request.text_or("parameters", "[]");
        let parameter_count = json_list("parameters", &parameters)?;

        Ok(Self {
            environment: request.text("environment").to_string(),
            region: request.text_or("region", &defaults.region),
            namespace: namespace.to_string(),
            parameters,
            parameter_count,
            use_kms: request.flag("use_kms"),
            kms_key_id: request.text("kms_key_id").to_string(),
            session_manager: request.flag("enable_session_manager"),
            session_logging: request.text_or("session_logging", "disabled"),
            s3_bucket_logs: request.text("s3_bucket_logs").to_string(),
        })
    }

    // `use_kms` only drives the summary; the workflow keys off `kms_key_id`.
    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("environment", &self.environment)
            .text("region", &self.region)
            .text("namespace", &self.namespace)
            .text("parameters", &self.parameters)
            .text("kms_key_id", &self.kms_key_id)
            .flag("enable_session_manager", self.session_manager)
            .text("session_logging", &self.session_logging)
            .text("s3_bucket_logs", &self.s3_bucket_logs)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Namespace", &self.namespace)
            .with("Environment", &self.environment)
            .with("Parameters", format!("{} created", self.parameter_count))
            .with_if(self.session_manager, "Session Manager", "Enabled")
            .with_if(self.use_kms, "Encryption", "KMS")
    }
}
