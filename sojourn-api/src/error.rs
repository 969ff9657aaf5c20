use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use sojourn_core::ErrorKind;

#[derive(Debug)]
pub enum ApiError {
    Core(sojourn_core::Error),
    Internal(anyhow::Error),
}

impl From<sojourn_core::Error> for ApiError {
    fn from(e: sojourn_core::Error) -> Self {
        Self::Core(e)
    }
}

impl From<anyhow::Error> for ApiError {
    fn from(e: anyhow::Error) -> Self {
        Self::Internal(e)
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match self {
            ApiError::Core(e) => {
                let kind = e.kind();
                let status = match kind {
                    ErrorKind::NotFound => StatusCode::NOT_FOUND,
                    ErrorKind::PermissionDenied => StatusCode::FORBIDDEN,
                    ErrorKind::Conflict => StatusCode::CONFLICT,
                    ErrorKind::ValidationFailed => StatusCode::BAD_REQUEST,
                    ErrorKind::Unavailable => StatusCode::SERVICE_UNAVAILABLE,
                    ErrorKind::Internal => StatusCode::INTERNAL_SERVER_ERROR,
                };
                let message = if status.is_server_error() {
                    tracing::error!("Internal Server Error: {}", e);
                    "Internal Server Error".to_string()
                } else {
                    e.to_string()
                };
                (status, kind, message)
            }
            ApiError::Internal(e) => {
                tracing::error!("Internal Server Error: {}", e);
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorKind::Internal,
                    "Internal Server Error".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": message,
            "kind": kind,
        }));

        (status, body).into_response()
    }
}
