use axum::{Json, http::StatusCode, response::IntoResponse};
use dbcompare_core::{Dialect, ObjectKind};
use serde::Serialize;
use serde_json::Value;
use thiserror::Error as ThisError;

use super::{ReportError, SourceError};

/// Fatal outcomes of a comparison request.
#[derive(Debug, ThisError)]
pub enum CompareError {
    #[error("Failed to connect to {dialect} database: {message}")]
    Connectivity { dialect: Dialect, message: String },

    #[error("Failed to fetch {kind} objects: {source}")]
    Query {
        kind: ObjectKind,
        #[source]
        source: SourceError,
    },

    #[error("Failed to generate report: {0}")]
    Report(#[from] ReportError),

    #[error("Invalid request: {0}")]
    InvalidRequest(String),
}

impl CompareError {
    pub fn connectivity(err: SourceError) -> Self {
        CompareError::Connectivity {
            dialect: err.dialect,
            message: err.message,
        }
    }

    fn status_and_code(&self) -> (StatusCode, &'static str) {
        match self {
            CompareError::Connectivity { .. } => {
                (StatusCode::SERVICE_UNAVAILABLE, "CONNECTIVITY_ERROR")
            }
            CompareError::Query { .. } => (StatusCode::BAD_GATEWAY, "QUERY_ERROR"),
            CompareError::Report(_) => (StatusCode::INTERNAL_SERVER_ERROR, "REPORT_ERROR"),
            CompareError::InvalidRequest(_) => (StatusCode::BAD_REQUEST, "INVALID_REQUEST"),
        }
    }
}

impl IntoResponse for CompareError {
    fn into_response(self) -> axum::response::Response {
        let (status, code) = self.status_and_code();
        let details = match &self {
            CompareError::Connectivity { dialect, .. } => {
                Some(serde_json::json!({ "database": dialect.label() }))
            }
            CompareError::Query { kind, source } => Some(serde_json::json!({
                "database": source.dialect.label(),
                "objectKind": kind.as_str(),
            })),
            CompareError::Report(_) | CompareError::InvalidRequest(_) => None,
        };
        let body = ApiErrorObject {
            code: code.to_string(),
            message: self.to_string(),
            details,
        };
        (status, Json(ApiErrorBody { inner: body })).into_response()
    }
}

/// Standardized API error response payload.
#[derive(Serialize)]
pub struct ApiErrorObject {
    pub code: String,
    pub message: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub details: Option<Value>,
}

#[derive(Serialize)]
pub struct ApiErrorBody {
    #[serde(rename = "error")]
    pub inner: ApiErrorObject,
}
