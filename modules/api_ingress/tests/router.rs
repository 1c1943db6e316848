use axum::{
    body::Body,
    extract::Extension,
    http::{Request, StatusCode},
    response::Json,
    routing::{get, post},
    Router,
};
use serde_json::{json, Value};
use tower::util::ServiceExt; // for `oneshot`

use api_ingress::{request_id::XRequestId, ApiIngress, ApiIngressConfig};
use modkit::{Problem, ProblemContext, ProblemResponse};

fn module_routes() -> Router {
    Router::new()
        .route("/echo-id", get(echo_request_id))
        .route("/upload", post(|body: String| async move { body.len().to_string() }))
        .route("/gone", get(gone))
}

async fn gone(ctx: ProblemContext) -> ProblemResponse {
    ctx.respond(Problem::new(StatusCode::GONE, "Gone", "nothing here"))
}

async fn echo_request_id(Extension(XRequestId(rid)): Extension<XRequestId>) -> Json<Value> {
    Json(json!({ "request_id": rid }))
}

fn app(config: ApiIngressConfig) -> Router {
    ApiIngress::new(config).build_router(module_routes())
}

async fn body_json(resp: axum::response::Response) -> Value {
    let bytes = axum::body::to_bytes(resp.into_body(), usize::MAX)
        .await
        .unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn health_reports_healthy_with_timestamp() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["status"], "healthy");
    assert!(json["timestamp"].as_str().is_some_and(|s| !s.is_empty()));
}

#[tokio::test]
async fn generated_request_id_reaches_handler_and_response() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/echo-id").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let header = resp
        .headers()
        .get("x-request-id")
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    assert!(!header.is_empty());

    let json = body_json(resp).await;
    assert_eq!(json["request_id"], header);
}

#[tokio::test]
async fn incoming_request_id_is_preserved() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(
            Request::builder()
                .uri("/echo-id")
                .header("x-request-id", "abc-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(
        resp.headers().get("x-request-id").and_then(|v| v.to_str().ok()),
        Some("abc-123")
    );
    let json = body_json(resp).await;
    assert_eq!(json["request_id"], "abc-123");
}

#[tokio::test]
async fn problem_trace_id_matches_generated_request_id() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/gone").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::GONE);
    let header = resp
        .headers()
        .get(modkit::REQUEST_ID_HEADER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned)
        .expect("x-request-id should be generated");
    let json = body_json(resp).await;
    assert_eq!(json["trace_id"], header.as_str());
    assert_eq!(json["instance"], "/gone");
}

#[tokio::test]
async fn unknown_route_still_carries_request_id() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/nope").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
    assert!(resp.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn openapi_document_served_when_docs_enabled() {
    let resp = app(ApiIngressConfig::default())
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::OK);
    let json = body_json(resp).await;
    assert_eq!(json["info"]["title"], "Employees API");
    assert!(json["openapi"].as_str().is_some_and(|v| v.starts_with("3.")));
}

#[tokio::test]
async fn openapi_document_absent_when_docs_disabled() {
    let config = ApiIngressConfig {
        enable_docs: false,
        ..ApiIngressConfig::default()
    };
    let resp = app(config)
        .oneshot(Request::builder().uri("/openapi.json").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn oversized_body_is_rejected() {
    let config = ApiIngressConfig {
        body_limit_bytes: 8,
        ..ApiIngressConfig::default()
    };
    let resp = app(config)
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/upload")
                .body(Body::from("definitely more than eight bytes"))
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(resp.status(), StatusCode::PAYLOAD_TOO_LARGE);
}

#[tokio::test]
async fn serve_stops_when_cancelled() {
    let ingress = ApiIngress::new(ApiIngressConfig::default());
    let router = ingress.build_router(module_routes());
    let cancel = tokio_util::sync::CancellationToken::new();
    cancel.cancel();

    let addr = "127.0.0.1:0".parse().unwrap();
    let res = tokio::time::timeout(
        std::time::Duration::from_secs(5),
        ingress.serve(addr, router, cancel),
    )
    .await
    .expect("serve should return after cancellation");
    assert!(res.is_ok());
}
