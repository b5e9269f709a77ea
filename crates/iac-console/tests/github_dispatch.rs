use std::sync::{Arc, Mutex};

use axum::extract::{Path, State};
use axum::http::{HeaderMap, StatusCode};
use axum::routing::post;
use axum::{Json, Router};
use serde_json::{json, Value};
use tokio::net::TcpListener;

use iac_console::config::{GitHubConfig, DEFAULT_API_VERSION, DEFAULT_WEB_BASE};
use iac_console::provisioning::{
    GitHubDispatchClient, ProvisioningService, RequestDefaults, ResponsePresenter, ServiceKind,
    ServiceRequest, SubmissionOutcome, WorkflowRegistry,
};

#[derive(Debug, Clone)]
struct CapturedDispatch {
    owner: String,
    repo: String,
    workflow: String,
    headers: HeaderMap,
    body: Value,
}

#[derive(Clone)]
struct FakeGitHub {
    status: StatusCode,
    reply: &'static str,
    captured: Arc<Mutex<Vec<CapturedDispatch>>>,
}

async fn dispatch_endpoint(
    State(fake): State<FakeGitHub>,
    Path((owner, repo, workflow)): Path<(String, String, String)>,
    headers: HeaderMap,
    Json(body): Json<Value>,
) -> (StatusCode, &'static str) {
    fake.captured
        .lock()
        .expect("capture mutex poisoned")
        .push(CapturedDispatch {
            owner,
            repo,
            workflow,
            headers,
            body,
        });
    (fake.status, fake.reply)
}

/// Serves the dispatch route on an ephemeral port and returns its base URL.
async fn spawn_fake_github(status: StatusCode, reply: &'static str) -> (String, FakeGitHub) {
    let fake = FakeGitHub {
        status,
        reply,
        captured: Arc::new(Mutex::new(Vec::new())),
    };
    let app = Router::new()
        .route(
            "/repos/:owner/:repo/actions/workflows/:workflow/dispatches",
            post(dispatch_endpoint),
        )
        .with_state(fake.clone());

    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("fake github serves");
    });

    (format!("http://{addr}"), fake)
}

fn github(api_base: String) -> GitHubConfig {
    GitHubConfig {
        token: "ghp_integration".to_string(),
        owner: "acme".to_string(),
        repository: "platform-iac".to_string(),
        api_base,
        web_base: DEFAULT_WEB_BASE.to_string(),
        api_version: DEFAULT_API_VERSION.to_string(),
    }
}

fn service(
    api_base: String,
    registry: WorkflowRegistry,
) -> ProvisioningService<GitHubDispatchClient> {
    let config = github(api_base);
    let client = GitHubDispatchClient::new(&config, registry).expect("client builds");
    ProvisioningService::new(
        Arc::new(client),
        RequestDefaults::new("eu-west-3"),
        ResponsePresenter::new(&config),
    )
}

fn vpc_request() -> ServiceRequest {
    ServiceRequest::new(
        ServiceKind::Vpc,
        [("vpc_name", "core"), ("availability_zones", "3")],
    )
}

#[tokio::test]
async fn sends_documented_path_headers_and_body() {
    let (base, fake) = spawn_fake_github(StatusCode::NO_CONTENT, "").await;
    let service = service(base, WorkflowRegistry::from_catalog());

    let outcome = service.submit(vpc_request()).await;
    assert!(outcome.is_dispatched(), "unexpected outcome: {outcome:?}");

    let captured = fake.captured.lock().expect("capture mutex poisoned").clone();
    assert_eq!(captured.len(), 1);
    let call = &captured[0];
    assert_eq!(call.owner, "acme");
    assert_eq!(call.repo, "platform-iac");
    assert_eq!(call.workflow, "terraform-vpc.yml");

    let header = |name: &str| {
        call.headers
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    };
    assert_eq!(header("accept").as_deref(), Some("application/vnd.github+json"));
    assert_eq!(header("authorization").as_deref(), Some("Bearer ghp_integration"));
    assert_eq!(header("x-github-api-version").as_deref(), Some("2022-11-28"));
    assert!(header("user-agent")
        .unwrap_or_default()
        .starts_with("iac-console/"));

    assert_eq!(
        call.body,
        json!({
            "ref": "main",
            "inputs": {
                "vpc_name": "core",
                "cidr_block": "10.0.0.0/16",
                "availability_zones": "3"
            }
        })
    );
}

#[tokio::test]
async fn workflow_overrides_change_the_dispatched_file() {
    let (base, fake) = spawn_fake_github(StatusCode::NO_CONTENT, "").await;
    let overrides = vec![("vpc".to_string(), "network-core.yml".to_string())];
    let registry = WorkflowRegistry::from_catalog()
        .with_overrides(&overrides)
        .expect("known slug");
    let service = service(base, registry);

    assert!(service.submit(vpc_request()).await.is_dispatched());
    let captured = fake.captured.lock().expect("capture mutex poisoned").clone();
    assert_eq!(captured[0].workflow, "network-core.yml");
}

#[tokio::test]
async fn upstream_refusal_keeps_raw_body() {
    let (base, _fake) =
        spawn_fake_github(StatusCode::UNPROCESSABLE_ENTITY, "bad request").await;
    let service = service(base, WorkflowRegistry::from_catalog());

    match service.submit(vpc_request()).await {
        SubmissionOutcome::UpstreamError(report) => {
            assert_eq!(report.status_code, Some(422));
            assert_eq!(report.detail.as_deref(), Some("bad request"));
        }
        other => panic!("expected upstream error, got {other:?}"),
    }
}

#[tokio::test]
async fn unregistered_workflow_sends_no_traffic() {
    let (base, fake) = spawn_fake_github(StatusCode::NO_CONTENT, "").await;
    let service = service(base, WorkflowRegistry::from_catalog().without(ServiceKind::Vpc));

    match service.submit(vpc_request()).await {
        SubmissionOutcome::Misconfigured(_) => {}
        other => panic!("expected misconfigured outcome, got {other:?}"),
    }
    assert!(fake.captured.lock().expect("capture mutex poisoned").is_empty());
}

#[tokio::test]
async fn unreachable_api_is_an_unexpected_error() {
    // Bind then drop a listener so the port is known to be closed.
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral port");
    let addr = listener.local_addr().expect("local addr");
    drop(listener);

    let service = service(format!("http://{addr}"), WorkflowRegistry::from_catalog());
    match service.submit(vpc_request()).await {
        SubmissionOutcome::UnexpectedError(report) => {
            assert_eq!(report.message, "Unexpected error");
            assert!(report.detail.is_some_and(|detail| !detail.is_empty()));
        }
        other => panic!("expected unexpected error, got {other:?}"),
    }
}
