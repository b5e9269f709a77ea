use std::sync::Arc;

use tracing::{debug, error, info, warn};

use super::catalog::ServiceKind;
use super::dispatch::{DispatchError, WorkflowDispatcher};
use super::params::ServiceParams;
use super::payload::DispatchPayload;
use super::presenter::{ResponsePresenter, SubmissionOutcome};
use super::request::{RequestDefaults, ServiceRequest};
use super::validation::ValidationError;
use crate::config::AppConfig;

/// Validate, build, dispatch and present one submission.
///
/// `submit` is the single error boundary: every failure kind is turned into a
/// [`SubmissionOutcome`] here, so a bad submission never escapes as an error.
pub struct ProvisioningService<D> {
    dispatcher: Arc<D>,
    defaults: RequestDefaults,
    presenter: ResponsePresenter,
}

impl<D> ProvisioningService<D>
where
    D: WorkflowDispatcher + 'static,
{
    pub fn new(dispatcher: Arc<D>, defaults: RequestDefaults, presenter: ResponsePresenter) -> Self {
        Self {
            dispatcher,
            defaults,
            presenter,
        }
    }

    pub fn from_config(dispatcher: Arc<D>, config: &AppConfig) -> Self {
        Self::new(
            dispatcher,
            RequestDefaults::new(config.provisioning.default_region.clone()),
            ResponsePresenter::new(&config.github),
        )
    }

    /// Payload that `submit` would send, without sending it.
    pub fn preview(&self, request: &ServiceRequest) -> Result<DispatchPayload, ValidationError> {
        let params = ServiceParams::validate(request, &self.defaults)?;
        Ok(DispatchPayload::for_params(&params))
    }

    /// Rejection for a submission that failed before reaching the validator.
    pub fn reject(&self, kind: ServiceKind, err: &ValidationError) -> SubmissionOutcome {
        info!(service = %kind, field = ?err.field(), error = %err, "submission rejected");
        self.presenter.rejected(kind, err)
    }

    pub async fn submit(&self, request: ServiceRequest) -> SubmissionOutcome {
        let outcome = self.resolve(request).await;
        debug!(
            service = %outcome.service(),
            status = outcome.http_status().as_u16(),
            "submission finished"
        );
        outcome
    }

    async fn resolve(&self, request: ServiceRequest) -> SubmissionOutcome {
        let kind = request.kind();

        let params = match ServiceParams::validate(&request, &self.defaults) {
            Ok(params) => params,
            Err(err) => return self.reject(kind, &err),
        };

        let payload = DispatchPayload::for_params(&params);
        match self.dispatcher.dispatch(kind, &payload).await {
            Ok(outcome) if outcome.is_accepted() => {
                info!(service = %kind, "workflow dispatched");
                self.presenter.dispatched(&params, &outcome)
            }
            Ok(outcome) => {
                warn!(
                    service = %kind,
                    status = outcome.status,
                    body = %outcome.body,
                    "workflow dispatch refused"
                );
                self.presenter.dispatched(&params, &outcome)
            }
            Err(DispatchError::Configuration(err)) => {
                error!(service = %kind, error = %err, "workflow dispatch misconfigured");
                self.presenter.misconfigured(kind, &err)
            }
            Err(DispatchError::Transport(message)) => {
                error!(service = %kind, error = %message, "workflow dispatch failed");
                self.presenter.unexpected(kind, message)
            }
        }
    }
}
