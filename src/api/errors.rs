use axum::Json;
use axum::extract::rejection::JsonRejection;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use tracing::{error, warn};

use crate::expand::ExpandError;
use crate::export::ExportError;

#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("Please provide a keyword")]
    MissingKeyword,

    #[error("Invalid request body: {0}")]
    InvalidBody(String),

    #[error("{0}")]
    Expand(#[from] ExpandError),

    #[error("{0}")]
    Export(#[from] ExportError),
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        ApiError::InvalidBody(rejection.body_text())
    }
}

impl ApiError {
    fn status(&self) -> StatusCode {
        match self {
            ApiError::MissingKeyword | ApiError::InvalidBody(_) => StatusCode::BAD_REQUEST,
            ApiError::Expand(_) | ApiError::Export(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        if status.is_server_error() {
            error!(error = %self, "request failed");
        } else {
            warn!(error = %self, "request rejected");
        }
        (status, Json(serde_json::json!({ "error": self.to_string() }))).into_response()
    }
}
