use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::response::Response;
use axum::Router;
use serde_json::Value;

use crate::config::{GitHubConfig, DEFAULT_API_VERSION, DEFAULT_WEB_BASE};
use crate::provisioning::{
    provisioning_router, DispatchError, DispatchOutcome, DispatchPayload, GitHubDispatchClient,
    ProvisioningService, RequestDefaults, ResponsePresenter, ServiceKind, ServiceRequest,
    WorkflowDispatcher, WorkflowRegistry,
};

pub(super) fn github_config() -> GitHubConfig {
    GitHubConfig {
        token: "ghp_test_token".to_string(),
        owner: "acme".to_string(),
        repository: "platform-iac".to_string(),
        // Nothing listens on the discard port; tests using the real client must
        // fail before reaching the network.
        api_base: "http://127.0.0.1:9".to_string(),
        web_base: DEFAULT_WEB_BASE.to_string(),
        api_version: DEFAULT_API_VERSION.to_string(),
    }
}

pub(super) fn build_service<D>(dispatcher: Arc<D>) -> Arc<ProvisioningService<D>>
where
    D: WorkflowDispatcher + 'static,
{
    Arc::new(ProvisioningService::new(
        dispatcher,
        RequestDefaults::new("eu-west-3"),
        ResponsePresenter::new(&github_config()),
    ))
}

pub(super) fn router_with<D>(dispatcher: Arc<D>) -> Router
where
    D: WorkflowDispatcher + 'static,
{
    provisioning_router(build_service(dispatcher))
}

/// Real GitHub client whose registry lacks `missing`.
pub(super) fn client_without(missing: ServiceKind) -> Arc<GitHubDispatchClient> {
    let registry = WorkflowRegistry::from_catalog().without(missing);
    Arc::new(GitHubDispatchClient::new(&github_config(), registry).expect("client builds"))
}

#[derive(Debug, Clone)]
pub(super) enum Reply {
    Status(u16, &'static str),
    Transport(&'static str),
}

/// Dispatcher double that records every call and answers from a script.
pub(super) struct RecordingDispatcher {
    script: Mutex<VecDeque<Reply>>,
    fallback: Reply,
    calls: Mutex<Vec<(ServiceKind, DispatchPayload)>>,
}

impl RecordingDispatcher {
    pub(super) fn answering(fallback: Reply) -> Self {
        Self {
            script: Mutex::new(VecDeque::new()),
            fallback,
            calls: Mutex::new(Vec::new()),
        }
    }

    pub(super) fn accepting() -> Self {
        Self::answering(Reply::Status(204, ""))
    }

    /// Replies used in order before falling back.
    pub(super) fn then(self, reply: Reply) -> Self {
        self.script
            .lock()
            .expect("script mutex poisoned")
            .push_back(reply);
        self
    }

    pub(super) fn calls(&self) -> Vec<(ServiceKind, DispatchPayload)> {
        self.calls.lock().expect("calls mutex poisoned").clone()
    }

    pub(super) fn call_count(&self) -> usize {
        self.calls.lock().expect("calls mutex poisoned").len()
    }
}

#[async_trait]
impl WorkflowDispatcher for RecordingDispatcher {
    async fn dispatch(
        &self,
        kind: ServiceKind,
        payload: &DispatchPayload,
    ) -> Result<DispatchOutcome, DispatchError> {
        self.calls
            .lock()
            .expect("calls mutex poisoned")
            .push((kind, payload.clone()));

        let reply = self
            .script
            .lock()
            .expect("script mutex poisoned")
            .pop_front()
            .unwrap_or_else(|| self.fallback.clone());

        match reply {
            Reply::Status(status, body) => Ok(DispatchOutcome::new(status, body)),
            Reply::Transport(message) => Err(DispatchError::Transport(message.to_string())),
        }
    }
}

pub(super) fn s3_request(bucket: &str) -> ServiceRequest {
    ServiceRequest::new(
        ServiceKind::S3,
        [
            ("bucket_name", bucket),
            ("bucket_env", "dev"),
            ("bucket_region", "eu-west-3"),
            ("block_public_acls", "on"),
        ],
    )
}

pub(super) fn rds_request(password: &str) -> ServiceRequest {
    ServiceRequest::new(
        ServiceKind::Rds,
        [
            ("db_identifier", "orders-db"),
            ("engine", "postgres"),
            ("engine_version", "15.4"),
            ("instance_class", "db.t3.micro"),
            ("username", "orders"),
            ("password", password),
            ("environment", "prod"),
            ("multi_az", "on"),
        ],
    )
}

/// Smallest form each service kind accepts.
pub(super) fn minimal_fields(kind: ServiceKind) -> Vec<(&'static str, &'static str)> {
    match kind {
        ServiceKind::Ec2 => vec![
            ("instance_name", "web-01"),
            ("instance_os", "ami-0abcdef1234567890"),
            ("instance_size", "t3.micro"),
            ("instance_env", "dev"),
        ],
        ServiceKind::Lambda => vec![
            ("function_name", "resize-images"),
            ("runtime", "python3.12"),
            ("handler", "app.handler"),
            ("environment", "dev"),
        ],
        ServiceKind::S3 => vec![("bucket_name", "my-site"), ("bucket_env", "dev")],
        ServiceKind::Rds => vec![
            ("db_identifier", "orders-db"),
            ("engine", "mysql"),
            ("engine_version", "8.0"),
            ("instance_class", "db.t3.micro"),
            ("username", "admin"),
            ("password", "correct-horse"),
            ("environment", "dev"),
        ],
        ServiceKind::Iam => vec![("resource_type", "role"), ("resource_name", "ci-deployer")],
        ServiceKind::SecretsManager => vec![
            ("secret_name", "dev/orders/api-key"),
            ("environment", "dev"),
            ("secret_type", "api_key"),
            ("secret_value", "abc123"),
        ],
        ServiceKind::Vpc => vec![("vpc_name", "core")],
        ServiceKind::Elb => vec![("lb_name", "public-web")],
        ServiceKind::CloudFront => vec![("origin_domain", "my-site.s3.amazonaws.com")],
        ServiceKind::Route53 => vec![("zone_name", "example.com"), ("record_value", "10.0.0.10")],
        ServiceKind::CloudWatch => vec![
            ("alarm_name", "high-cpu"),
            ("metric_name", "CPUUtilization"),
            ("threshold", "80"),
        ],
        ServiceKind::CodePipeline => vec![
            ("pipeline_name", "orders-api"),
            ("environment", "dev"),
            ("source_provider", "GitHub"),
            ("repository", "acme/orders-api"),
            ("deploy_provider", "Lambda"),
            ("lambda_function_name", "orders-api"),
        ],
        ServiceKind::CodeBuild => vec![
            ("project_name", "orders-build"),
            ("environment", "dev"),
            ("source_type", "NO_SOURCE"),
            ("image", "aws/codebuild/standard:7.0"),
        ],
        ServiceKind::CodeDeploy => vec![
            ("application_name", "orders"),
            ("compute_platform", "Server"),
            ("deployment_group_name", "orders-dev"),
            ("environment", "dev"),
        ],
        ServiceKind::Ssm => vec![("environment", "dev"), ("namespace", "/orders/dev")],
        ServiceKind::Budgets => vec![("budget_name", "platform"), ("budget_amount", "250")],
        ServiceKind::CostExplorer | ServiceKind::TrustedAdvisor => Vec::new(),
    }
}

pub(super) fn minimal_request(kind: ServiceKind) -> ServiceRequest {
    ServiceRequest::new(kind, minimal_fields(kind))
}

pub(super) async fn read_json_body(response: Response) -> Value {
    let body = response.into_body();
    let bytes = axum::body::to_bytes(body, 64 * 1024)
        .await
        .expect("body bytes");
    serde_json::from_slice(&bytes).expect("json body")
}
