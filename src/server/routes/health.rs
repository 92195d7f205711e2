use crate::server::router::AppState;
use crate::service::HealthReport;
use axum::{
    Json, Router, extract::State, http::StatusCode, response::IntoResponse, routing::get,
};

pub fn router() -> Router<AppState> {
    Router::new().route("/api/health", get(health_handler))
}

/// `200` when both databases answer their liveness query, `503` otherwise.
pub async fn health_handler(State(state): State<AppState>) -> impl IntoResponse {
    let report: HealthReport = state.service.health().await;
    let status = if report.is_up() {
        StatusCode::OK
    } else {
        StatusCode::SERVICE_UNAVAILABLE
    };
    (status, Json(report))
}
