use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use sqlx::Error as SqlxError;
use thiserror::Error as ThisError;
use tracing::error;

#[derive(Debug, ThisError)]
pub enum HomeroomError {
    #[error("Database error: {0}")]
    DatabaseError(#[from] SqlxError),

    #[error("IO error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("missing required field(s): {}", .0.join(", "))]
    MissingFields(Vec<&'static str>),

    #[error("student not found")]
    StudentNotFound,

    /// An extractor refused the request (bad JSON, bad path, body too large).
    #[error("{message}")]
    Rejected { status: StatusCode, message: String },
}

impl HomeroomError {
    pub fn status(&self) -> StatusCode {
        match self {
            HomeroomError::DatabaseError(_) | HomeroomError::IoError(_) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            HomeroomError::MissingFields(_) => StatusCode::BAD_REQUEST,
            HomeroomError::StudentNotFound => StatusCode::NOT_FOUND,
            HomeroomError::Rejected { status, .. } => *status,
        }
    }
}

impl IntoResponse for HomeroomError {
    fn into_response(self) -> Response {
        let status = self.status();
        let message = if status.is_server_error() {
            error!(error = %self, "request failed");
            "An internal server error occurred.".to_string()
        } else {
            self.to_string()
        };
        (status, Json(ApiErrorResponse { error: message })).into_response()
    }
}

/// Error body shared by every endpoint: `{"error": "..."}`.
#[derive(Serialize)]
pub struct ApiErrorResponse {
    pub error: String,
}
