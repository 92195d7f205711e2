use crate::error::CompareError;
use crate::report::XLSX_CONTENT_TYPE;
use crate::server::router::AppState;
use crate::service::SchemaComparison;
use axum::{
    Json, Router,
    extract::{Query, State},
    http::header,
    response::{IntoResponse, Response},
    routing::get,
};
use serde::Deserialize;

/// Query string shared by both comparison endpoints. Missing values are rejected by the
/// service as blank schemas.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SchemaPair {
    #[serde(default)]
    pub oracle_schema: Option<String>,
    #[serde(default)]
    pub postgres_schema: Option<String>,
}

impl SchemaPair {
    fn schemas(&self) -> (&str, &str) {
        (
            self.oracle_schema.as_deref().unwrap_or_default(),
            self.postgres_schema.as_deref().unwrap_or_default(),
        )
    }
}

pub fn router() -> Router<AppState> {
    Router::new()
        .route("/api/compare/report", get(report_handler))
        .route("/api/compare/schemas", get(schemas_handler))
}

/// Runs a full comparison and returns the workbook as an attachment.
pub async fn report_handler(
    State(state): State<AppState>,
    Query(params): Query<SchemaPair>,
) -> Result<Response, CompareError> {
    let (oracle_schema, postgres_schema) = params.schemas();
    let report = state
        .service
        .generate_report(oracle_schema, postgres_schema)
        .await?;

    let headers = [
        (header::CONTENT_TYPE, XLSX_CONTENT_TYPE.to_string()),
        (
            header::CONTENT_DISPOSITION,
            format!("attachment; filename=\"{}\"", report.filename),
        ),
    ];
    Ok((headers, report.bytes).into_response())
}

pub async fn schemas_handler(
    State(state): State<AppState>,
    Query(params): Query<SchemaPair>,
) -> Result<Json<SchemaComparison>, CompareError> {
    let (oracle_schema, postgres_schema) = params.schemas();
    let comparison = state
        .service
        .compare_schemas(oracle_schema, postgres_schema)
        .await?;
    Ok(Json(comparison))
}
