use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use tracing::error;

pub type ApiResult<T> = Result<T, ApiError>;

/// Terminal request failures. None of these are retried by the relay; they
/// are reported straight back to the caller.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    /// Login request missing or malformed parameters.
    #[error("{0}")]
    InvalidRequest(String),

    /// Callback arrived without a code or state parameter.
    #[error("{0}")]
    InvalidCallback(String),

    /// Unknown, replayed, or expired state. The three cases are deliberately
    /// indistinguishable so a forged callback learns nothing.
    #[error("Invalid or expired state")]
    InvalidOrExpiredState,

    /// The provider rejected the code exchange or was unreachable.
    #[error("{0}")]
    ExchangeFailed(String),

    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    fn code(&self) -> &'static str {
        match self {
            ApiError::InvalidRequest(_) => "invalid_request",
            ApiError::InvalidCallback(_) => "invalid_callback",
            ApiError::InvalidOrExpiredState => "invalid_state",
            ApiError::ExchangeFailed(_) => "exchange_failed",
            ApiError::Internal(_) => "internal_error",
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let code = self.code();
        let (status, details) = match self {
            ApiError::InvalidRequest(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidCallback(msg) => (StatusCode::BAD_REQUEST, msg),
            ApiError::InvalidOrExpiredState => (
                StatusCode::BAD_REQUEST,
                "Invalid or expired state".to_string(),
            ),
            ApiError::ExchangeFailed(msg) => (StatusCode::INTERNAL_SERVER_ERROR, msg),
            ApiError::Internal(err) => {
                error!(error = %err, "Internal server error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "Internal server error".to_string(),
                )
            }
        };

        (
            status,
            Json(serde_json::json!({ "error": code, "details": details })),
        )
            .into_response()
    }
}
