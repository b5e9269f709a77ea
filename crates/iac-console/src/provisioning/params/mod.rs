//! Typed field sets, one per service kind.
//!
//! Every form follows the same three steps: `parse` validates the raw request
//! (fail-fast), `inputs` encodes the workflow inputs, `details` echoes the
//! normalized values for the success summary.

mod compute;
mod cost;
mod database;
mod devops;
mod management;
mod monitoring;
mod network;
mod security;
mod storage;

pub use compute::{Ec2Params, LambdaParams};
pub use cost::{BudgetsParams, CostExplorerParams, TrustedAdvisorParams};
pub use database::RdsParams;
pub use devops::{CodeBuildParams, CodeDeployParams, CodePipelineParams};
pub use management::SsmParams;
pub use monitoring::CloudWatchParams;
pub use network::{CloudFrontParams, ElbParams, Route53Params, VpcParams};
pub use security::{IamParams, SecretsManagerParams};
pub use storage::S3Params;

use super::catalog::ServiceKind;
use super::payload::WorkflowInputs;
use super::presenter::SummaryDetails;
use super::request::{RequestDefaults, ServiceRequest};
use super::validation::{self, ValidationError};

/// Contract implemented by each service's typed form.
pub trait ServiceForm: Sized {
    const KIND: ServiceKind;

    fn parse(request: &ServiceRequest, defaults: &RequestDefaults) -> Result<Self, ValidationError>;

    fn inputs(&self) -> WorkflowInputs;

    fn details(&self) -> SummaryDetails;

    /// Presence check for the catalog's base required fields.
    fn require_base(request: &ServiceRequest) -> Result<(), ValidationError> {
        validation::require(request, Self::KIND.descriptor().required_fields)
    }
}

/// Validated parameters, tagged by service kind.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceParams {
    Ec2(Ec2Params),
    Lambda(LambdaParams),
    S3(S3Params),
    Rds(RdsParams),
    Iam(IamParams),
    SecretsManager(SecretsManagerParams),
    Vpc(VpcParams),
    Elb(ElbParams),
    CloudFront(CloudFrontParams),
    Route53(Route53Params),
    CloudWatch(CloudWatchParams),
    CodePipeline(CodePipelineParams),
    CodeBuild(CodeBuildParams),
    CodeDeploy(CodeDeployParams),
    Ssm(SsmParams),
    Budgets(BudgetsParams),
    CostExplorer(CostExplorerParams),
    TrustedAdvisor(TrustedAdvisorParams),
}

/// Either validated params or the first failing rule.
pub type ValidationResult = Result<ServiceParams, ValidationError>;

macro_rules! with_form {
    ($params:expr, $form:ident => $body:expr) => {
        match $params {
            ServiceParams::Ec2($form) => $body,
            ServiceParams::Lambda($form) => $body,
            ServiceParams::S3($form) => $body,
            ServiceParams::Rds($form) => $body,
            ServiceParams::Iam($form) => $body,
            ServiceParams::SecretsManager($form) => $body,
            ServiceParams::Vpc($form) => $body,
            ServiceParams::Elb($form) => $body,
            ServiceParams::CloudFront($form) => $body,
            ServiceParams::Route53($form) => $body,
            ServiceParams::CloudWatch($form) => $body,
            ServiceParams::CodePipeline($form) => $body,
            ServiceParams::CodeBuild($form) => $body,
            ServiceParams::CodeDeploy($form) => $body,
            ServiceParams::Ssm($form) => $body,
            ServiceParams::Budgets($form) => $body,
            ServiceParams::CostExplorer($form) => $body,
            ServiceParams::TrustedAdvisor($form) => $body,
        }
    };
}

impl ServiceParams {
    /// Runs the rules of the request's service kind.
    pub fn validate(request: &ServiceRequest, defaults: &RequestDefaults) -> ValidationResult {
        match request.kind() {
            ServiceKind::Ec2 => Ec2Params::parse(request, defaults).map(Self::Ec2),
            ServiceKind::Lambda => LambdaParams::parse(request, defaults).map(Self::Lambda),
            ServiceKind::S3 => S3Params::parse(request, defaults).map(Self::S3),
            ServiceKind::Rds => RdsParams::parse(request, defaults).map(Self::Rds),
            ServiceKind::Iam => IamParams::parse(request, defaults).map(Self::Iam),
            ServiceKind::SecretsManager => {
                SecretsManagerParams::parse(request, defaults).map(Self::SecretsManager)
            }
            ServiceKind::Vpc => VpcParams::parse(request, defaults).map(Self::Vpc),
            ServiceKind::Elb => ElbParams::parse(request, defaults).map(Self::Elb),
            ServiceKind::CloudFront => {
                CloudFrontParams::parse(request, defaults).map(Self::CloudFront)
            }
            ServiceKind::Route53 => Route53Params::parse(request, defaults).map(Self::Route53),
            ServiceKind::CloudWatch => {
                CloudWatchParams::parse(request, defaults).map(Self::CloudWatch)
            }
            ServiceKind::CodePipeline => {
                CodePipelineParams::parse(request, defaults).map(Self::CodePipeline)
            }
            ServiceKind::CodeBuild => CodeBuildParams::parse(request, defaults).map(Self::CodeBuild),
            ServiceKind::CodeDeploy => {
                CodeDeployParams::parse(request, defaults).map(Self::CodeDeploy)
            }
            ServiceKind::Ssm => SsmParams::parse(request, defaults).map(Self::Ssm),
            ServiceKind::Budgets => BudgetsParams::parse(request, defaults).map(Self::Budgets),
            ServiceKind::CostExplorer => {
                CostExplorerParams::parse(request, defaults).map(Self::CostExplorer)
            }
            ServiceKind::TrustedAdvisor => {
                TrustedAdvisorParams::parse(request, defaults).map(Self::TrustedAdvisor)
            }
        }
    }

    pub fn kind(&self) -> ServiceKind {
        fn kind_of<F: ServiceForm>(_: &F) -> ServiceKind {
            F::KIND
        }
        with_form!(self, form => kind_of(form))
    }

    pub fn inputs(&self) -> WorkflowInputs {
        with_form!(self, form => form.inputs())
    }

    pub fn details(&self) -> SummaryDetails {
        with_form!(self, form => form.details())
    }
}
