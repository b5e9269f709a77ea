use crate::infra::AppState;
use axum::http::{header, StatusCode};
use axum::response::IntoResponse;
use axum::Extension;
use axum::Json;
use iac_console::provisioning::{
    catalog, provisioning_router, ProvisioningService, WorkflowDispatcher,
};
use serde_json::json;
use std::sync::Arc;

pub(crate) fn with_operational_routes<D>(service: Arc<ProvisioningService<D>>) -> axum::Router
where
    D: WorkflowDispatcher + 'static,
{
    provisioning_router(service)
        .route("/health", axum::routing::get(healthcheck))
        .route("/ready", axum::routing::get(readiness_endpoint))
        .route("/metrics", axum::routing::get(metrics_endpoint))
}

pub(crate) async fn healthcheck() -> Json<serde_json::Value> {
    Json(json!({ "status": "ok", "services": catalog().len() }))
}

pub(crate) async fn readiness_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    let ready = state.readiness.load(std::sync::atomic::Ordering::Relaxed);
    let status = if ready {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };

    let payload = if ready {
        json!({ "status": "ready" })
    } else {
        json!({ "status": "initializing" })
    };

    (status, Json(payload))
}

pub(crate) async fn metrics_endpoint(Extension(state): Extension<AppState>) -> impl IntoResponse {
    (
        StatusCode::OK,
        [(header::CONTENT_TYPE, "text/plain; version=0.0.4")],
        state.metrics.render(),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::body::Body;
    use axum::http::Request;
    use iac_console::config::{GitHubConfig, DEFAULT_API_VERSION, DEFAULT_WEB_BASE};
    use iac_console::provisioning::{
        GitHubDispatchClient, RequestDefaults, ResponsePresenter, WorkflowRegistry,
    };
    use metrics_exporter_prometheus::PrometheusBuilder;
    use std::sync::atomic::AtomicBool;
    use tower::ServiceExt;

    fn app(ready: bool) -> axum::Router {
        let github = GitHubConfig {
            token: "ghp_routes".to_string(),
            owner: "acme".to_string(),
            repository: "platform-iac".to_string(),
            api_base: "http://127.0.0.1:9".to_string(),
            web_base: DEFAULT_WEB_BASE.to_string(),
            api_version: DEFAULT_API_VERSION.to_string(),
        };
        let client = GitHubDispatchClient::new(&github, WorkflowRegistry::from_catalog())
            .expect("client builds");
        let service = Arc::new(ProvisioningService::new(
            Arc::new(client),
            RequestDefaults::default(),
            ResponsePresenter::new(&github),
        ));
        let state = AppState {
            readiness: Arc::new(AtomicBool::new(ready)),
            metrics: Arc::new(PrometheusBuilder::new().build_recorder().handle()),
        };
        with_operational_routes(service).layer(Extension(state))
    }

    async fn get(router: axum::Router, uri: &str) -> (StatusCode, serde_json::Value) {
        let response = router
            .oneshot(Request::builder().uri(uri).body(Body::empty()).expect("request"))
            .await
            .expect("router responds");
        let status = response.status();
        let bytes = axum::body::to_bytes(response.into_body(), 64 * 1024)
            .await
            .expect("body bytes");
        (status, serde_json::from_slice(&bytes).expect("json body"))
    }

    #[tokio::test]
    async fn health_reports_catalog_size() {
        let (status, body) = get(app(true), "/health").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ok");
        assert_eq!(body["services"], 18);
    }

    #[tokio::test]
    async fn readiness_follows_flag() {
        let (status, body) = get(app(false), "/ready").await;
        assert_eq!(status, StatusCode::SERVICE_UNAVAILABLE);
        assert_eq!(body["status"], "initializing");

        let (status, body) = get(app(true), "/ready").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["status"], "ready");
    }

    #[tokio::test]
    async fn provisioning_routes_are_mounted() {
        let (status, body) = get(app(true), "/api/v1/services/ssm").await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["workflow_file"], "terraform-ssm.yml");
    }
}
