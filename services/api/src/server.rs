use crate::cli::ServeArgs;
use crate::infra::{build_dispatcher, AppState};
use crate::routes::with_operational_routes;
use axum::Extension;
use axum_prometheus::PrometheusMetricLayer;
use iac_console::config::AppConfig;
use iac_console::error::AppError;
use iac_console::provisioning::ProvisioningService;
use iac_console::telemetry;
use std::sync::atomic::Ordering;
use std::sync::Arc;
use tracing::info;

pub(crate) async fn run(mut args: ServeArgs) -> Result<(), AppError> {
    let mut config = AppConfig::load()?;

    if let Some(host) = args.host.take() {
        config.server.host = host;
    }
    if let Some(port) = args.port.take() {
        config.server.port = port;
    }

    telemetry::init(&config.telemetry)?;

    let (prometheus_layer, prometheus_handle) = PrometheusMetricLayer::pair();
    let readiness_flag = Arc::new(std::sync::atomic::AtomicBool::new(false));
    let app_state = AppState {
        readiness: readiness_flag.clone(),
        metrics: Arc::new(prometheus_handle),
    };

    let dispatcher = Arc::new(build_dispatcher(&config)?);
    let provisioning_service = Arc::new(ProvisioningService::from_config(dispatcher, &config));

    let app = with_operational_routes(provisioning_service)
        .layer(Extension(app_state))
        .layer(prometheus_layer);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    readiness_flag.store(true, Ordering::Release);

    info!(
        ?config.environment,
        %addr,
        repository = %config.github.repository_slug(),
        region = %config.provisioning.default_region,
        "iac console ready"
    );

    axum::serve(listener, app).await?;
    Ok(())
}
