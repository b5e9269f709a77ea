use std::collections::HashMap;
use std::sync::Arc;

use axum::{
    extract::{rejection::FormRejection, Path, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Form, Router,
};
use serde_json::json;

use super::catalog::{catalog, ServiceKind};
use super::dispatch::WorkflowDispatcher;
use super::request::ServiceRequest;
use super::service::ProvisioningService;
use super::validation::ValidationError;

/// Catalog browsing and per-service submission endpoints.
pub fn provisioning_router<D>(service: Arc<ProvisioningService<D>>) -> Router
where
    D: WorkflowDispatcher + 'static,
{
    Router::new()
        .route("/api/v1/services", get(catalog_handler))
        .route("/api/v1/services/:slug", get(descriptor_handler))
        .route("/api/v1/services/:slug/trigger", post(trigger_handler::<D>))
        .with_state(service)
}

async fn catalog_handler() -> Response {
    let payload = json!({
        "services": catalog(),
    });
    (StatusCode::OK, axum::Json(payload)).into_response()
}

async fn descriptor_handler(Path(slug): Path<String>) -> Response {
    match ServiceKind::from_slug(&slug) {
        Some(kind) => (StatusCode::OK, axum::Json(kind.descriptor())).into_response(),
        None => unknown_service(&slug),
    }
}

pub(crate) async fn trigger_handler<D>(
    State(service): State<Arc<ProvisioningService<D>>>,
    Path(slug): Path<String>,
    form: Result<Form<HashMap<String, String>>, FormRejection>,
) -> Response
where
    D: WorkflowDispatcher + 'static,
{
    let Some(kind) = ServiceKind::from_slug(&slug) else {
        return unknown_service(&slug);
    };
    let fields = match form {
        Ok(Form(fields)) => fields,
        Err(rejection) => {
            let err = ValidationError::MalformedForm {
                reason: rejection.body_text(),
            };
            return service.reject(kind, &err).into_response();
        }
    };

    service
        .submit(ServiceRequest::new(kind, fields))
        .await
        .into_response()
}

fn unknown_service(slug: &str) -> Response {
    let payload = json!({
        "error": format!("unknown service '{slug}'"),
    });
    (StatusCode::NOT_FOUND, axum::Json(payload)).into_response()
}
