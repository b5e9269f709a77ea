use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::{DateTime, Utc};
use serde::Serialize;

use super::catalog::ServiceKind;
use super::dispatch::{ConfigurationError, DispatchOutcome};
use super::params::ServiceParams;
use super::validation::ValidationError;
use crate::config::GitHubConfig;

/// Status the workflow dispatch endpoint answers with on success.
pub const DISPATCH_ACCEPTED: u16 = 204;

/// One label/value line of a success summary.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SummaryDetail {
    pub label: &'static str,
    pub value: String,
}

/// Ordered label/value pairs echoed back after a dispatch.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct SummaryDetails(Vec<SummaryDetail>);

impl SummaryDetails {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with(mut self, label: &'static str, value: impl Into<String>) -> Self {
        self.0.push(SummaryDetail {
            label,
            value: value.into(),
        });
        self
    }

    pub fn with_if(self, condition: bool, label: &'static str, value: impl Into<String>) -> Self {
        if condition {
            self.with(label, value)
        } else {
            self
        }
    }

    pub fn get(&self, label: &str) -> Option<&str> {
        self.0
            .iter()
            .find(|detail| detail.label == label)
            .map(|detail| detail.value.as_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &SummaryDetail> {
        self.0.iter()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Success page content.
#[derive(Debug, Clone, Serialize)]
pub struct DispatchReceipt {
    pub service: ServiceKind,
    pub service_name: &'static str,
    pub title: &'static str,
    pub details: SummaryDetails,
    pub repository: String,
    pub actions_url: String,
    pub dispatched_at: DateTime<Utc>,
}

/// Error page content.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FailureReport {
    pub service: ServiceKind,
    pub service_name: &'static str,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub field: Option<&'static str>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status_code: Option<u16>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub detail: Option<String>,
}

impl FailureReport {
    fn new(service: ServiceKind, message: impl Into<String>) -> Self {
        Self {
            service,
            service_name: service.descriptor().display_name,
            message: message.into(),
            field: None,
            status_code: None,
            detail: None,
        }
    }
}

/// Terminal state of one submission.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "status", rename_all = "snake_case")]
pub enum SubmissionOutcome {
    Dispatched(DispatchReceipt),
    Rejected(FailureReport),
    UpstreamError(FailureReport),
    Misconfigured(FailureReport),
    UnexpectedError(FailureReport),
}

impl SubmissionOutcome {
    pub fn service(&self) -> ServiceKind {
        match self {
            SubmissionOutcome::Dispatched(receipt) => receipt.service,
            SubmissionOutcome::Rejected(report)
            | SubmissionOutcome::UpstreamError(report)
            | SubmissionOutcome::Misconfigured(report)
            | SubmissionOutcome::UnexpectedError(report) => report.service,
        }
    }

    pub fn is_dispatched(&self) -> bool {
        matches!(self, SubmissionOutcome::Dispatched(_))
    }

    pub fn receipt(&self) -> Option<&DispatchReceipt> {
        match self {
            SubmissionOutcome::Dispatched(receipt) => Some(receipt),
            _ => None,
        }
    }

    pub fn failure(&self) -> Option<&FailureReport> {
        match self {
            SubmissionOutcome::Dispatched(_) => None,
            SubmissionOutcome::Rejected(report)
            | SubmissionOutcome::UpstreamError(report)
            | SubmissionOutcome::Misconfigured(report)
            | SubmissionOutcome::UnexpectedError(report) => Some(report),
        }
    }

    pub fn http_status(&self) -> StatusCode {
        match self {
            SubmissionOutcome::Dispatched(_) => StatusCode::OK,
            SubmissionOutcome::Rejected(_) => StatusCode::BAD_REQUEST,
            SubmissionOutcome::UpstreamError(_) | SubmissionOutcome::UnexpectedError(_) => {
                StatusCode::BAD_GATEWAY
            }
            SubmissionOutcome::Misconfigured(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for SubmissionOutcome {
    fn into_response(self) -> Response {
        (self.http_status(), Json(self)).into_response()
    }
}

/// Turns validation errors, dispatch outcomes and faults into [`SubmissionOutcome`]s.
#[derive(Debug, Clone)]
pub struct ResponsePresenter {
    repository: String,
    actions_url: String,
}

impl ResponsePresenter {
    pub fn new(github: &GitHubConfig) -> Self {
        let repository = github.repository_slug();
        let actions_url = format!("{}/{}/actions", github.web_base, repository);
        Self {
            repository,
            actions_url,
        }
    }

    pub fn rejected(&self, service: ServiceKind, error: &ValidationError) -> SubmissionOutcome {
        let mut report = FailureReport::new(service, error.to_string());
        report.field = error.field();
        SubmissionOutcome::Rejected(report)
    }

    /// 204 is the only success; anything else keeps the raw body for the operator.
    pub fn dispatched(&self, params: &ServiceParams, outcome: &DispatchOutcome) -> SubmissionOutcome {
        let service = params.kind();
        if outcome.status == DISPATCH_ACCEPTED {
            let descriptor = service.descriptor();
            return SubmissionOutcome::Dispatched(DispatchReceipt {
                service,
                service_name: descriptor.display_name,
                title: descriptor.title,
                details: params.details(),
                repository: self.repository.clone(),
                actions_url: self.actions_url.clone(),
                dispatched_at: Utc::now(),
            });
        }

        let mut report = FailureReport::new(
            service,
            format!("GitHub API error (status {})", outcome.status),
        );
        report.status_code = Some(outcome.status);
        report.detail = Some(outcome.body.clone());
        SubmissionOutcome::UpstreamError(report)
    }

    pub fn misconfigured(
        &self,
        service: ServiceKind,
        error: &ConfigurationError,
    ) -> SubmissionOutcome {
        let mut report = FailureReport::new(service, "Workflow configuration error");
        report.detail = Some(error.to_string());
        SubmissionOutcome::Misconfigured(report)
    }

    pub fn unexpected(&self, service: ServiceKind, message: impl Into<String>) -> SubmissionOutcome {
        let mut report = FailureReport::new(service, "Unexpected error");
        report.detail = Some(message.into());
        SubmissionOutcome::UnexpectedError(report)
    }
}
