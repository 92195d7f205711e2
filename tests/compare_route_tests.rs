mod common;

use axum::{
    Router,
    body::{Body, to_bytes},
    http::{Request, StatusCode, header},
};
use common::{FakeSource, RecordingSink, service, table_scenario};
use dbcompare::server::{AppState, app_router};
use dbcompare_core::ObjectKind;
use serde_json::Value;
use std::sync::Arc;
use tower::ServiceExt;

fn app(oracle: &Arc<FakeSource>, postgres: &Arc<FakeSource>) -> Router {
    let service = service(oracle, postgres, Arc::new(RecordingSink::default()));
    app_router(AppState::new(service))
}

async fn get(app: Router, uri: &str) -> axum::response::Response {
    app.oneshot(Request::builder().uri(uri).body(Body::empty()).unwrap())
        .await
        .unwrap()
}

async fn json_body(resp: axum::response::Response) -> Value {
    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

#[tokio::test]
async fn report_is_served_as_xlsx_attachment() {
    let (oracle, postgres) = table_scenario();
    let resp = get(
        app(&oracle, &postgres),
        "/api/compare/report?oracleSchema=HR&postgresSchema=hr",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    assert_eq!(
        resp.headers()[header::CONTENT_TYPE],
        "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet"
    );
    assert_eq!(
        resp.headers()[header::CONTENT_DISPOSITION],
        "attachment; filename=\"database_comparison_HR_hr.xlsx\""
    );
    assert!(resp.headers().contains_key("x-request-id"));

    let bytes = to_bytes(resp.into_body(), usize::MAX).await.unwrap();
    assert!(bytes.starts_with(b"PK"));
}

#[tokio::test]
async fn missing_schema_parameter_is_bad_request() {
    let (oracle, postgres) = table_scenario();
    let resp = get(app(&oracle, &postgres), "/api/compare/report?oracleSchema=HR").await;

    assert_eq!(resp.status(), StatusCode::BAD_REQUEST);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "INVALID_REQUEST");
    assert_eq!(oracle.pings(), 0);
}

#[tokio::test]
async fn unreachable_oracle_is_service_unavailable() {
    let oracle = Arc::new(FakeSource::oracle("HR").down());
    let postgres = Arc::new(FakeSource::postgres("hr"));
    let resp = get(
        app(&oracle, &postgres),
        "/api/compare/report?oracleSchema=HR&postgresSchema=hr",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["code"], "CONNECTIVITY_ERROR");
    assert_eq!(
        body["error"]["message"],
        "Failed to connect to Oracle database: connection refused"
    );
    assert_eq!(body["error"]["details"]["database"], "Oracle");
}

#[tokio::test]
async fn failing_catalog_query_is_bad_gateway() {
    let oracle = Arc::new(FakeSource::oracle("HR").failing_on(ObjectKind::Index));
    let postgres = Arc::new(FakeSource::postgres("hr"));
    let resp = get(
        app(&oracle, &postgres),
        "/api/compare/report?oracleSchema=HR&postgresSchema=hr",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::BAD_GATEWAY);
    let body = json_body(resp).await;
    assert_eq!(body["error"]["details"]["objectKind"], "INDEX");
}

#[tokio::test]
async fn schemas_endpoint_returns_both_listings_and_gaps() {
    let oracle = Arc::new(FakeSource::oracle("HR").with(ObjectKind::AllObjects, &["EMP", "DEPT"]));
    let postgres = Arc::new(FakeSource::postgres("hr").with(ObjectKind::AllObjects, &["emp"]));
    let resp = get(
        app(&oracle, &postgres),
        "/api/compare/schemas?oracleSchema=HR&postgresSchema=hr",
    )
    .await;

    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["oracleObjects"].as_array().unwrap().len(), 2);
    assert_eq!(body["postgresObjects"].as_array().unwrap().len(), 1);
    assert_eq!(body["missingInPostgres"][0]["name"], "DEPT");
    assert_eq!(body["missingInPostgres"][0]["type"], "ALL_OBJECTS");
    assert!(body["missingInOracle"].as_array().unwrap().is_empty());
}

#[tokio::test]
async fn health_reflects_both_databases() {
    let (oracle, postgres) = table_scenario();
    let resp = get(app(&oracle, &postgres), "/api/health").await;
    assert_eq!(resp.status(), StatusCode::OK);
    let body = json_body(resp).await;
    assert_eq!(body["oracle"], "up");
    assert_eq!(body["postgres"], "up");

    let oracle = Arc::new(FakeSource::oracle("HR"));
    let postgres = Arc::new(FakeSource::postgres("hr").down());
    let resp = get(app(&oracle, &postgres), "/api/health").await;
    assert_eq!(resp.status(), StatusCode::SERVICE_UNAVAILABLE);
    let body = json_body(resp).await;
    assert_eq!(body["postgres"], "down");
}

#[tokio::test]
async fn unknown_route_is_not_found() {
    let (oracle, postgres) = table_scenario();
    let resp = get(app(&oracle, &postgres), "/api/compare/nope").await;
    assert_eq!(resp.status(), StatusCode::NOT_FOUND);
}

#[tokio::test]
async fn client_request_id_is_echoed() {
    let (oracle, postgres) = table_scenario();
    let resp = app(&oracle, &postgres)
        .oneshot(
            Request::builder()
                .uri("/api/health")
                .header("x-request-id", "req-123")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();
    assert_eq!(resp.headers()["x-request-id"], "req-123");
}
