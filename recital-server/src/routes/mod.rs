pub mod assets;
pub mod contact;
pub mod records;

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use recital_core::remote::protocol::ErrorBody;

/// API error, rendered as `{ "error": "..." }`.
pub enum AppError {
    BadRequest(String),
    NotFound(String),
    Internal(anyhow::Error),
}

impl AppError {
    pub fn bad_request(err: impl ToString) -> Self {
        AppError::BadRequest(err.to_string())
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, message) = match self {
            AppError::BadRequest(message) => (StatusCode::BAD_REQUEST, message),
            AppError::NotFound(message) => (StatusCode::NOT_FOUND, message),
            AppError::Internal(err) => {
                tracing::error!("Request failed: {err:#}");
                (StatusCode::INTERNAL_SERVER_ERROR, err.to_string())
            }
        };

        (status, Json(ErrorBody::new(message))).into_response()
    }
}

/// Convert anyhow errors to HTTP responses
impl<E> From<E> for AppError
where
    E: Into<anyhow::Error>,
{
    fn from(err: E) -> Self {
        Self::Internal(err.into())
    }
}
