use axum::{
    Json,
    extract::rejection::{JsonRejection, QueryRejection},
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;

use crate::composer::notices;
use crate::search_client::SearchError;

#[derive(Debug, Error)]
pub enum AppError {
    #[error("bad request: {0}")]
    BadRequest(String),

    #[error("only POST events and GET debug requests are allowed")]
    MethodNotAllowed,

    /// Search failures are shown to the user as an error card.
    #[error(transparent)]
    Search(#[from] SearchError),
}

impl AppError {
    fn status_code(&self) -> StatusCode {
        match self {
            AppError::BadRequest(_) => StatusCode::BAD_REQUEST,
            AppError::MethodNotAllowed => StatusCode::METHOD_NOT_ALLOWED,
            AppError::Search(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            AppError::BadRequest(_) => "BAD_REQUEST",
            AppError::MethodNotAllowed => "METHOD_NOT_ALLOWED",
            AppError::Search(_) => "SEARCH_ERROR",
        }
    }
}

#[derive(Serialize)]
struct ErrorBody<'a> {
    error: &'a str,
    message: String,
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let status = self.status_code();
        match &self {
            AppError::Search(e) => {
                tracing::error!(error = %e, "search failed");
                (status, Json(notices::search_failed(&e.to_string()))).into_response()
            }
            _ => {
                tracing::warn!(error = %self, "rejecting request");
                let body = ErrorBody {
                    error: self.error_code(),
                    message: self.to_string(),
                };
                (status, Json(body)).into_response()
            }
        }
    }
}

pub type AppResult<T> = Result<T, AppError>;

impl From<JsonRejection> for AppError {
    fn from(err: JsonRejection) -> Self {
        AppError::BadRequest(format!("invalid JSON: {}", err.body_text()))
    }
}

impl From<QueryRejection> for AppError {
    fn from(err: QueryRejection) -> Self {
        AppError::BadRequest(err.body_text())
    }
}
