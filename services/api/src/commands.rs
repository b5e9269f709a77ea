use std::sync::Arc;

use clap::Args;
use iac_console::config::{AppConfig, ProvisioningConfig};
use iac_console::error::AppError;
use iac_console::provisioning::{
    catalog, DispatchPayload, ProvisioningService, RequestDefaults, ServiceKind, ServiceParams,
    ServiceRequest, WorkflowRegistry,
};
use iac_console::telemetry;

#[derive(Args, Debug)]
pub(crate) struct SubmitArgs {
    /// Service slug, e.g. `s3` or `secrets-manager`
    pub(crate) service: String,
    /// Form field as key=value; repeat for each field
    #[arg(long = "field", short = 'f', value_parser = crate::infra::parse_field)]
    pub(crate) fields: Vec<(String, String)>,
    /// Print the workflow and payload instead of dispatching
    #[arg(long)]
    pub(crate) dry_run: bool,
}

pub(crate) fn run_catalog() -> Result<(), AppError> {
    println!("Supported services");
    for descriptor in catalog() {
        let required = if descriptor.required_fields.is_empty() {
            "none".to_string()
        } else {
            descriptor.required_fields.join(", ")
        };
        println!(
            "- {:<16} {:<16} [{}] {}",
            descriptor.slug,
            descriptor.display_name,
            descriptor.category.label(),
            descriptor.workflow_file
        );
        println!("    required: {required}");
    }
    Ok(())
}

pub(crate) async fn run_submit(args: SubmitArgs) -> Result<(), AppError> {
    let SubmitArgs {
        service,
        fields,
        dry_run,
    } = args;

    let kind =
        ServiceKind::from_slug(&service).ok_or_else(|| AppError::UnknownService(service.clone()))?;
    let request = ServiceRequest::new(kind, fields);

    if dry_run {
        return preview(request);
    }

    let config = AppConfig::load()?;
    telemetry::init(&config.telemetry)?;

    let dispatcher = crate::infra::build_dispatcher(&config)?;
    let service = ProvisioningService::from_config(Arc::new(dispatcher), &config);
    let outcome = service.submit(request).await;

    println!("{}", serde_json::to_string_pretty(&outcome)?);
    if let Some(receipt) = outcome.receipt() {
        eprintln!("track the run at {}", receipt.actions_url);
    }
    match outcome.failure() {
        Some(report) => Err(AppError::Submission(report.message.clone())),
        None => Ok(()),
    }
}

fn preview(request: ServiceRequest) -> Result<(), AppError> {
    let provisioning = ProvisioningConfig::from_env()?;
    let registry =
        WorkflowRegistry::from_catalog().with_overrides(&provisioning.workflow_overrides)?;
    let defaults = RequestDefaults::new(provisioning.default_region);

    let params = ServiceParams::validate(&request, &defaults)?;
    let payload = DispatchPayload::for_params(&params);

    println!("workflow: {}", registry.workflow_file(request.kind())?);
    println!("{}", serde_json::to_string_pretty(&payload)?);
    Ok(())
}
