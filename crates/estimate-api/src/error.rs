//! API errors rendered as JSON `{error, detail, timestamp}`.

use axum::extract::rejection::{JsonRejection, QueryRejection};
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use chrono::Local;
use estimate::EstimateError;
use serde::{Deserialize, Serialize};
use storage::StorageError;
use thiserror::Error;
use tracing::error;

const HIDDEN_DETAIL: &str = "An unexpected error occurred";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("{0}")]
    NotFound(String),

    #[error("{0}")]
    Validation(String),

    #[error("Storage error: {0}")]
    Storage(#[from] StorageError),

    #[error("Estimate error: {0}")]
    Estimate(#[from] EstimateError),

    #[error("{0}")]
    Unavailable(String),

    #[error("Expert error: {0:#}")]
    Expert(#[from] anyhow::Error),

    #[error("{0}")]
    Internal(String),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        ApiError::Validation(rejection.body_text())
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorBody {
    pub error: String,
    pub detail: String,
    pub timestamp: String,
}

impl ErrorBody {
    fn new(error: &str, detail: String) -> Self {
        Self {
            error: error.to_string(),
            detail,
            timestamp: Local::now().to_rfc3339(),
        }
    }
}

/// Marks a response produced from a server-side [`ApiError`].
#[derive(Debug, Clone, Copy)]
struct InternalFailure;

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Validation(_) => StatusCode::UNPROCESSABLE_ENTITY,
            ApiError::Unavailable(_) => StatusCode::SERVICE_UNAVAILABLE,
            ApiError::Storage(_)
            | ApiError::Estimate(_)
            | ApiError::Expert(_)
            | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn label(&self) -> &'static str {
        match self {
            ApiError::NotFound(_) => "Not found",
            ApiError::Validation(_) => "Validation error",
            ApiError::Unavailable(_) => "Service unavailable",
            _ => "Internal server error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "Request failed");
        }
        let mut response = (status, Json(ErrorBody::new(self.label(), self.to_string()))).into_response();
        if status == StatusCode::INTERNAL_SERVER_ERROR {
            response.extensions_mut().insert(InternalFailure);
        }
        response
    }
}

/// Response mapper: replaces the detail of server errors unless `debug` is on.
pub async fn hide_internal_details(State(debug): State<bool>, response: Response) -> Response {
    if debug || response.extensions().get::<InternalFailure>().is_none() {
        return response;
    }
    let status = response.status();
    (
        status,
        Json(ErrorBody::new("Internal server error", HIDDEN_DETAIL.to_string())),
    )
        .into_response()
}
