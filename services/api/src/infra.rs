use iac_console::config::AppConfig;
use iac_console::provisioning::{ConfigurationError, GitHubDispatchClient, WorkflowRegistry};
use metrics_exporter_prometheus::PrometheusHandle;
use std::sync::atomic::AtomicBool;
use std::sync::Arc;

#[derive(Clone)]
pub(crate) struct AppState {
    pub(crate) readiness: Arc<AtomicBool>,
    pub(crate) metrics: Arc<PrometheusHandle>,
}

/// Production dispatcher: catalog workflows plus configured overrides.
pub(crate) fn build_dispatcher(
    config: &AppConfig,
) -> Result<GitHubDispatchClient, ConfigurationError> {
    let registry =
        WorkflowRegistry::from_catalog().with_overrides(&config.provisioning.workflow_overrides)?;
    GitHubDispatchClient::new(&config.github, registry)
}

pub(crate) fn parse_field(raw: &str) -> Result<(String, String), String> {
    match raw.split_once('=') {
        Some((key, value)) if !key.trim().is_empty() => {
            Ok((key.trim().to_string(), value.to_string()))
        }
        _ => Err(format!("expected key=value, got '{raw}'")),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_field_splits_on_first_equals() {
        assert_eq!(
            parse_field("tags=[{\"k\":\"a=b\"}]").expect("valid field"),
            ("tags".to_string(), "[{\"k\":\"a=b\"}]".to_string())
        );
        assert_eq!(
            parse_field(" description =").expect("empty value allowed"),
            ("description".to_string(), String::new())
        );
        assert!(parse_field("=value").is_err());
        assert!(parse_field("novalue").is_err());
    }
}
