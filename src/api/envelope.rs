use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;

/// Successful response body: `{"success": true, "data": ...}`.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
    success: bool,
    data: T,
}

impl<T: Serialize> Envelope<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            data,
        }
    }
}

impl<T: Serialize> IntoResponse for Envelope<T> {
    fn into_response(self) -> Response {
        Json(self).into_response()
    }
}

/// Failed response body: `{"success": false, "error": "...", "code": "..."}`.
#[derive(Debug, Serialize)]
pub struct ErrorBody {
    success: bool,
    error: String,
    code: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    details: Option<Vec<FieldError>>,
}

impl ErrorBody {
    pub fn new(code: &'static str, error: impl Into<String>) -> Self {
        Self {
            success: false,
            error: error.into(),
            code,
            details: None,
        }
    }

    pub fn with_details(mut self, details: Vec<FieldError>) -> Self {
        self.details = Some(details);
        self
    }

    pub fn into_response_with(self, status: StatusCode) -> Response {
        (status, Json(self)).into_response()
    }
}

/// One broken field rule, listed under `details` of a validation error.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FieldError {
    pub field: String,
    pub message: String,
}

impl FieldError {
    /// Flatten a garde report into one entry per failed field.
    pub fn from_report(report: &garde::Report) -> Vec<Self> {
        report
            .iter()
            .map(|(path, error)| {
                let field = path.to_string();
                FieldError {
                    field: if field.is_empty() { "body".to_string() } else { field },
                    message: error.message().to_string(),
                }
            })
            .collect()
    }
}

/// Payload of a successful delete.
#[derive(Debug, Serialize)]
pub struct Deleted {
    pub id: i64,
    pub message: String,
}

impl Deleted {
    pub fn new(id: i64) -> Self {
        Self {
            id,
            message: format!("Article {} deleted successfully", id),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::articles::UpdateArticle;
    use serde_json::json;

    #[test]
    fn test_success_shape() {
        let body = serde_json::to_value(Envelope::ok(Deleted::new(3))).unwrap();
        assert_eq!(
            body,
            json!({
                "success": true,
                "data": {"id": 3, "message": "Article 3 deleted successfully"}
            })
        );
    }

    #[test]
    fn test_error_shape_without_details() {
        let body = serde_json::to_value(ErrorBody::new("not_found", "Article 3 not found")).unwrap();
        assert_eq!(
            body,
            json!({"success": false, "error": "Article 3 not found", "code": "not_found"})
        );
    }

    #[test]
    fn test_error_shape_with_details() {
        let body = ErrorBody::new("validation_error", "Validation failed")
            .with_details(vec![FieldError {
                field: "title".to_string(),
                message: "must not be empty".to_string(),
            }]);
        let body = serde_json::to_value(body).unwrap();
        assert_eq!(body["details"][0]["field"], "title");
        assert_eq!(body["details"][0]["message"], "must not be empty");
    }

    #[test]
    fn test_field_errors_from_report() {
        let payload: UpdateArticle =
            serde_json::from_str(r#"{"title": "abc", "is_published": null}"#).unwrap();
        let report = payload.into_changes().unwrap_err();

        let details = FieldError::from_report(&report);
        let fields: Vec<_> = details.iter().map(|d| d.field.as_str()).collect();
        assert_eq!(fields, vec!["title", "is_published"]);
        assert_eq!(details[1].message, "must not be null");
    }
}
