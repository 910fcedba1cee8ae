use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use giftdraw_db::RevealError;
use giftdraw_types::api::ErrorResponse;

/// Every handler failure. Rendered as `{ "error": "..." }`.
#[derive(Debug, thiserror::Error)]
pub enum ApiError {
    #[error("{0}")]
    Validation(String),
    #[error("{0}")]
    NotFound(String),
    #[error("No participants left to assign")]
    Exhausted,
    #[error("Unauthorized")]
    Unauthorized,
    #[error(transparent)]
    Internal(#[from] anyhow::Error),
}

impl ApiError {
    pub fn status(&self) -> StatusCode {
        match self {
            ApiError::Validation(_) | ApiError::Exhausted => StatusCode::BAD_REQUEST,
            ApiError::Unauthorized => StatusCode::UNAUTHORIZED,
            ApiError::NotFound(_) => StatusCode::NOT_FOUND,
            ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = self.status();
        let error = match self {
            ApiError::Internal(detail) => {
                tracing::error!("Internal error: {:#}", detail);
                "Internal server error".to_string()
            }
            other => other.to_string(),
        };
        (status, Json(ErrorResponse { error })).into_response()
    }
}

impl From<RevealError> for ApiError {
    fn from(err: RevealError) -> Self {
        match err {
            RevealError::NotFound => ApiError::NotFound("Participant not found".into()),
            RevealError::Exhausted => ApiError::Exhausted,
            RevealError::Sqlite(e) => ApiError::Internal(e.into()),
            RevealError::Storage(e) => ApiError::Internal(e),
        }
    }
}
