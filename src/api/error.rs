use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::envelope::{ErrorBody, FieldError};
use crate::articles::ArticleError;

/// Message returned in place of any store failure.
pub const INTERNAL_ERROR_MESSAGE: &str = "An unexpected error occurred";

/// Everything a handler can fail with. This is the only place errors are
/// turned into status codes and envelopes.
#[derive(Debug)]
pub enum ApiError {
    Article(ArticleError),
    /// The request could not be parsed (body, query string or path)
    BadRequest(String),
    /// No route matched
    RouteNotFound,
    /// The path matched but not with this method
    MethodNotAllowed,
}

impl From<ArticleError> for ApiError {
    fn from(err: ArticleError) -> Self {
        ApiError::Article(err)
    }
}

impl From<JsonRejection> for ApiError {
    fn from(rejection: JsonRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected request body");
        let message = match rejection {
            JsonRejection::MissingJsonContentType(_) => {
                "Expected request with `Content-Type: application/json`".to_string()
            }
            JsonRejection::JsonDataError(_) => "Request body has invalid field types".to_string(),
            _ => "Request body is not valid JSON".to_string(),
        };
        ApiError::BadRequest(message)
    }
}

impl From<QueryRejection> for ApiError {
    fn from(rejection: QueryRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected query string");
        ApiError::BadRequest("Invalid query parameters".to_string())
    }
}

impl From<PathRejection> for ApiError {
    fn from(rejection: PathRejection) -> Self {
        tracing::debug!(error = %rejection.body_text(), "Rejected path parameter");
        ApiError::BadRequest("Invalid article id".to_string())
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let (status, body) = match self {
            ApiError::Article(ArticleError::Validation(report)) => {
                let details = FieldError::from_report(&report);
                let summary = details
                    .iter()
                    .map(|d| format!("{}: {}", d.field, d.message))
                    .collect::<Vec<_>>()
                    .join("; ");
                (
                    StatusCode::BAD_REQUEST,
                    ErrorBody::new("validation_error", format!("Validation failed: {}", summary))
                        .with_details(details),
                )
            }
            ApiError::Article(err @ ArticleError::NotFound(_)) => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("not_found", err.to_string()),
            ),
            ApiError::Article(err @ ArticleError::EmptyUpdate) => (
                StatusCode::BAD_REQUEST,
                ErrorBody::new("empty_update", err.to_string()),
            ),
            ApiError::Article(ArticleError::Store(err)) => {
                tracing::error!(error = %err, "Unexpected store error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    ErrorBody::new("internal_error", INTERNAL_ERROR_MESSAGE),
                )
            }
            ApiError::BadRequest(message) => {
                (StatusCode::BAD_REQUEST, ErrorBody::new("bad_request", message))
            }
            ApiError::RouteNotFound => (
                StatusCode::NOT_FOUND,
                ErrorBody::new("not_found", "Resource not found"),
            ),
            ApiError::MethodNotAllowed => (
                StatusCode::METHOD_NOT_ALLOWED,
                ErrorBody::new("method_not_allowed", "Method not allowed"),
            ),
        };
        body.into_response_with(status)
    }
}
