use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use promptsheet_core::CoreError;
use serde_json::json;

/// Application-level error type for HTTP handlers.
///
/// Wraps [`CoreError`] and maps each variant to a status code.
/// Implements [`IntoResponse`] to produce consistent JSON error responses.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// A domain-level error from `promptsheet_core`.
    #[error(transparent)]
    Core(#[from] CoreError),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Core(core) => match core {
                CoreError::Configuration(msg) => {
                    tracing::error!(error = %msg, "Pipeline misconfigured");
                    (StatusCode::INTERNAL_SERVER_ERROR, core.code(), msg.clone())
                }
                CoreError::Validation(msg) => (StatusCode::BAD_REQUEST, core.code(), msg.clone()),
                CoreError::StoreRead(_)
                | CoreError::StoreWrite(_)
                | CoreError::Generation(_)
                | CoreError::AssetUpload(_)
                | CoreError::Notification(_) => {
                    tracing::error!(error = %core, "Upstream service error");
                    (StatusCode::BAD_GATEWAY, core.code(), core.to_string())
                }
                CoreError::Internal(msg) => {
                    tracing::error!(error = %msg, "Internal core error");
                    (
                        StatusCode::INTERNAL_SERVER_ERROR,
                        core.code(),
                        "An internal error occurred".to_string(),
                    )
                }
            },
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
