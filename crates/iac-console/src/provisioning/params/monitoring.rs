use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::ValidationError;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CloudWatchParams {
    pub alarm_name: String,
    pub metric_name: String,
    pub threshold: String,
}

impl ServiceForm for CloudWatchParams {
    const KIND: ServiceKind = ServiceKind::CloudWatch;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;
        Ok(Self {
            alarm_name: request.text("alarm_name").to_string(),
            metric_name: request.text("metric_name").to_string(),
            threshold: request.text("threshold").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("alarm_name", &self.alarm_name)
            .text("metric_name", &self.metric_name)
            .text("threshold", &self.threshold)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.alarm_name)
            .with("Metric", &self.metric_name)
            .with("Threshold", &self.threshold)
    }
}
