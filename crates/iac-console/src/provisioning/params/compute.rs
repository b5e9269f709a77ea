use super::ServiceForm;
use crate::provisioning::catalog::ServiceKind;
use crate::provisioning::payload::WorkflowInputs;
use crate::provisioning::presenter::SummaryDetails;
use crate::provisioning::request::{RequestDefaults, ServiceRequest};
use crate::provisioning::validation::{
    identifier_pattern, matches_pattern, one_of, starts_with, ValidationError,
    DEPLOYMENT_ENVIRONMENTS,
};

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Ec2Params {
    pub instance_name: String,
    pub ami: String,
    pub instance_size: String,
    pub environment: String,
}

impl ServiceForm for Ec2Params {
    const KIND: ServiceKind = ServiceKind::Ec2;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        let instance_name = request.text("instance_name");
        matches_pattern(
            "instance_name",
            instance_name,
            identifier_pattern(),
            "letters, digits, '-' and '_' only",
        )?;

        let ami = request.text("instance_os");
        starts_with("instance_os", ami, "ami-")?;

        let environment = request.text("instance_env");
        one_of("instance_env", environment, DEPLOYMENT_ENVIRONMENTS)?;

        Ok(Self {
            instance_name: instance_name.to_string(),
            ami: ami.to_string(),
            instance_size: request.text("instance_size").to_string(),
            environment: environment.to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("instance_name", &self.instance_name)
            .text("instance_os", &self.ami)
            .text("instance_size", &self.instance_size)
            .text("instance_env", &self.environment)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.instance_name)
            .with("AMI", &self.ami)
            .with("Type", &self.instance_size)
            .with("Environment", &self.environment)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LambdaParams {
    pub function_name: String,
    pub runtime: String,
    pub handler: String,
    pub memory_size: String,
    pub timeout: String,
    pub environment: String,
}

impl ServiceForm for LambdaParams {
    const KIND: ServiceKind = ServiceKind::Lambda;

    fn parse(request: &ServiceRequest, _: &RequestDefaults) -> Result<Self, ValidationError> {
        Self::require_base(request)?;

        Ok(Self {
            function_name: request.text("function_name").to_string(),
            runtime: request.text("runtime").to_string(),
            handler: request.text("handler").to_string(),
            memory_size: request.text_or("memory_size", "128"),
            timeout: request.text_or("timeout", "3"),
            environment: request.text("environment").to_string(),
        })
    }

    fn inputs(&self) -> WorkflowInputs {
        WorkflowInputs::new()
            .text("function_name", &self.function_name)
            .text("runtime", &self.runtime)
            .text("handler", &self.handler)
            .text("memory_size", &self.memory_size)
            .text("timeout", &self.timeout)
            .text("environment", &self.environment)
    }

    fn details(&self) -> SummaryDetails {
        SummaryDetails::new()
            .with("Name", &self.function_name)
            .with("Runtime", &self.runtime)
            .with("Memory", format!("{} MB", self.memory_size))
            .with("Timeout", format!("{}s", self.timeout))
            .with("Environment", &self.environment)
    }
}
