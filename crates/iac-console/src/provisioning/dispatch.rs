//! Outbound `workflow_dispatch` call.
//!
//! The dispatcher sends one request and hands back the raw status and body.
//! Deciding whether that status means success is left to the presenter.

use std::fmt;
use std::time::Duration;

use async_trait::async_trait;
use reqwest::header::{HeaderMap, HeaderValue, ACCEPT, AUTHORIZATION, USER_AGENT};
use tracing::{debug, instrument};

use super::catalog::{ServiceKind, WorkflowRegistry};
use super::payload::DispatchPayload;
use super::presenter::DISPATCH_ACCEPTED;
use crate::config::GitHubConfig;

/// Upper bound on one dispatch round trip.
pub const DISPATCH_TIMEOUT: Duration = Duration::from_secs(10);

const GITHUB_JSON: &str = "application/vnd.github+json";
const API_VERSION_HEADER: &str = "X-GitHub-Api-Version";

/// Deployment defects: nothing a user can fix by editing the form.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ConfigurationError {
    #[error("no workflow file registered for service '{0}'")]
    UnregisteredWorkflow(ServiceKind),
    #[error("unknown service '{0}' in workflow overrides")]
    UnknownService(String),
    #[error("invalid dispatch client configuration: {0}")]
    InvalidClient(String),
}

#[derive(Debug, thiserror::Error)]
pub enum DispatchError {
    #[error(transparent)]
    Configuration(#[from] ConfigurationError),
    #[error("{0}")]
    Transport(String),
}

/// Raw answer of the dispatch endpoint.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DispatchOutcome {
    pub status: u16,
    pub body: String,
}

impl DispatchOutcome {
    pub fn new(status: u16, body: impl Into<String>) -> Self {
        Self {
            status,
            body: body.into(),
        }
    }

    pub fn is_accepted(&self) -> bool {
        self.status == DISPATCH_ACCEPTED
    }
}

#[async_trait]
pub trait WorkflowDispatcher: Send + Sync {
    async fn dispatch(
        &self,
        kind: ServiceKind,
        payload: &DispatchPayload,
    ) -> Result<DispatchOutcome, DispatchError>;
}

/// reqwest-backed client for the GitHub Actions REST API.
pub struct GitHubDispatchClient {
    client: reqwest::Client,
    api_base: String,
    repository: String,
    token: String,
    api_version: String,
    registry: WorkflowRegistry,
}

impl GitHubDispatchClient {
    pub fn new(github: &GitHubConfig, registry: WorkflowRegistry) -> Result<Self, ConfigurationError> {
        let mut headers = HeaderMap::new();
        headers.insert(ACCEPT, HeaderValue::from_static(GITHUB_JSON));

        let client = reqwest::Client::builder()
            .timeout(DISPATCH_TIMEOUT)
            .default_headers(headers)
            .build()
            .map_err(|err| ConfigurationError::InvalidClient(err.to_string()))?;

        Ok(Self {
            client,
            api_base: github.api_base.clone(),
            repository: github.repository_slug(),
            token: github.token.clone(),
            api_version: github.api_version.clone(),
            registry,
        })
    }

    /// Endpoint for `kind`, or the configuration error explaining why there is none.
    pub fn dispatch_url(&self, kind: ServiceKind) -> Result<String, ConfigurationError> {
        let workflow_file = self.registry.workflow_file(kind)?;
        Ok(format!(
            "{}/repos/{}/actions/workflows/{}/dispatches",
            self.api_base, self.repository, workflow_file
        ))
    }
}

impl fmt::Debug for GitHubDispatchClient {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GitHubDispatchClient")
            .field("api_base", &self.api_base)
            .field("repository", &self.repository)
            .field("api_version", &self.api_version)
            .field("token", &"<redacted>")
            .finish_non_exhaustive()
    }
}

#[async_trait]
impl WorkflowDispatcher for GitHubDispatchClient {
    #[instrument(skip(self, payload), fields(service = %kind))]
    async fn dispatch(
        &self,
        kind: ServiceKind,
        payload: &DispatchPayload,
    ) -> Result<DispatchOutcome, DispatchError> {
        let url = self.dispatch_url(kind)?;
        debug!(%url, inputs = payload.inputs().len(), "sending workflow dispatch");

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.token)
            .header(API_VERSION_HEADER, &self.api_version)
            .header(USER_AGENT, user_agent())
            .json(payload)
            .send()
            .await
            .map_err(|err| DispatchError::Transport(describe_transport_error(&err)))?;

        let status = response.status().as_u16();
        let body = response
            .text()
            .await
            .map_err(|err| DispatchError::Transport(describe_transport_error(&err)))?;

        debug!(status, "workflow dispatch answered");
        Ok(DispatchOutcome { status, body })
    }
}

fn user_agent() -> String {
    format!("iac-console/{}", env!("CARGO_PKG_VERSION"))
}

fn describe_transport_error(err: &reqwest::Error) -> String {
    if err.is_timeout() {
        format!(
            "request timed out after {}s: {err}",
            DISPATCH_TIMEOUT.as_secs()
        )
    } else {
        err.to_string()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{DEFAULT_API_BASE, DEFAULT_API_VERSION, DEFAULT_WEB_BASE};

    fn github() -> GitHubConfig {
        GitHubConfig {
            token: "ghp_secret".to_string(),
            owner: "acme".to_string(),
            repository: "platform-iac".to_string(),
            api_base: DEFAULT_API_BASE.to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        }
    }

    #[test]
    fn dispatch_url_uses_registered_workflow() {
        let client = GitHubDispatchClient::new(&github(), WorkflowRegistry::from_catalog())
            .expect("client builds");
        assert_eq!(
            client.dispatch_url(ServiceKind::S3).expect("s3 registered"),
            "https://api.github.com/repos/acme/platform-iac/actions/workflows/terraform-s3.yml/dispatches"
        );
    }

    #[test]
    fn dispatch_url_reports_missing_workflow() {
        let registry = WorkflowRegistry::from_catalog().without(ServiceKind::Rds);
        let client = GitHubDispatchClient::new(&github(), registry).expect("client builds");
        match client.dispatch_url(ServiceKind::Rds) {
            Err(ConfigurationError::UnregisteredWorkflow(ServiceKind::Rds)) => {}
            other => panic!("expected unregistered workflow, got {other:?}"),
        }
    }

    #[test]
    fn debug_output_hides_token() {
        let client = GitHubDispatchClient::new(&github(), WorkflowRegistry::from_catalog())
            .expect("client builds");
        let rendered = format!("{client:?}");
        assert!(!rendered.contains("ghp_secret"));
        assert!(rendered.contains("acme/platform-iac"));
    }
}
