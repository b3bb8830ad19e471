use axum::http::StatusCode;
use axum::response::IntoResponse;
use serde_json::json;
use tracing::error;

use catalog_core::DomainError;
use catalog_products::ServiceError;

pub fn service_error_to_response(err: ServiceError) -> axum::response::Response {
    match err {
        ServiceError::IdMismatch { .. } => {
            json_error(StatusCode::BAD_REQUEST, "id_mismatch", err.to_string())
        }
        ServiceError::Domain(kind) => {
            let status = match kind {
                DomainError::InvalidIdentifier => StatusCode::BAD_REQUEST,
                DomainError::NotFound => StatusCode::NOT_FOUND,
                DomainError::AlreadyExists => StatusCode::CONFLICT,
            };
            json_error(status, kind.code(), kind.to_string())
        }
        ServiceError::Backend(msg) => {
            error!(error = %msg, "unclassified failure");
            json_error(
                StatusCode::INTERNAL_SERVER_ERROR,
                "internal_error",
                "internal server error",
            )
        }
    }
}

pub fn json_error(
    status: StatusCode,
    code: &'static str,
    message: impl Into<String>,
) -> axum::response::Response {
    (
        status,
        axum::Json(json!({
            "error": code,
            "message": message.into(),
        })),
    )
        .into_response()
}
