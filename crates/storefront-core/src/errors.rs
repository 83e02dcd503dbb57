//! Application error type.
//!
//! Every handler, extractor and service returns [`AppError`]. It is the only
//! value that gets turned into an error response, so all failures share the
//! envelope shape from [`crate::response`].
//!
//! | Constructor | Status |
//! |---|---|
//! | [`AppError::validation`] | 400 |
//! | [`AppError::bad_request`] | 400 |
//! | [`AppError::unauthorized`] | 401 |
//! | [`AppError::forbidden`] | 403 |
//! | [`AppError::not_found`] | 404 |
//! | [`AppError::conflict`] | 409 |
//! | [`AppError::internal`] / `?` on any other error | 500 |
//!
//! Server errors never expose their message to the client. The internal
//! error chain travels with the response as an [`ErrorReport`] extension so
//! the error middleware can log it and, outside production, include it.

use anyhow::Error;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use validator::ValidationErrors;

use crate::response::{ApiResponse, FieldViolation};

pub const VALIDATION_FAILED: &str = "Validation failed";
pub const VALIDATION_ERROR_LABEL: &str = "Validation Error";
pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug)]
pub struct AppError {
    pub status: StatusCode,
    pub error: Error,
    pub details: Vec<FieldViolation>,
}

impl AppError {
    pub fn new<E>(status: StatusCode, err: E) -> Self
    where
        E: Into<Error>,
    {
        Self {
            status,
            error: err.into(),
            details: Vec::new(),
        }
    }

    pub fn internal<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn database<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::INTERNAL_SERVER_ERROR, err)
    }

    pub fn not_found<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::NOT_FOUND, err)
    }

    pub fn bad_request<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::BAD_REQUEST, err)
    }

    pub fn unauthorized<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::UNAUTHORIZED, err)
    }

    pub fn forbidden<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::FORBIDDEN, err)
    }

    pub fn conflict<E>(err: E) -> Self
    where
        E: Into<Error>,
    {
        Self::new(StatusCode::CONFLICT, err)
    }

    /// A 400 carrying every violated rule.
    pub fn validation(details: Vec<FieldViolation>) -> Self {
        Self {
            status: StatusCode::BAD_REQUEST,
            error: anyhow::anyhow!(VALIDATION_FAILED),
            details,
        }
    }

    pub fn from_validation(errors: &ValidationErrors) -> Self {
        Self::validation(violations(errors))
    }

    pub fn is_validation(&self) -> bool {
        !self.details.is_empty()
    }

    /// Message safe to show to any client.
    pub fn public_message(&self) -> String {
        if self.status.is_server_error() {
            INTERNAL_SERVER_ERROR.to_string()
        } else {
            self.error.to_string()
        }
    }

    pub fn report(&self) -> ErrorReport {
        ErrorReport {
            status: self.status,
            message: self.public_message(),
            label: self.is_validation().then(|| VALIDATION_ERROR_LABEL.to_string()),
            detail: format!("{:#}", self.error),
            details: self.details.clone(),
        }
    }
}

/// Flattens `validator` output into `{field, message}` pairs, sorted by field.
pub fn violations(errors: &ValidationErrors) -> Vec<FieldViolation> {
    let mut violations: Vec<FieldViolation> = errors
        .field_errors()
        .iter()
        .flat_map(|(field, errors)| {
            errors.iter().map(move |error| {
                let message = error
                    .message
                    .as_ref()
                    .map(|msg| msg.to_string())
                    .unwrap_or_else(|| format!("{} is invalid", field));
                FieldViolation::new(field.to_string(), message)
            })
        })
        .collect();

    violations.sort_by(|a, b| a.field.cmp(&b.field));
    violations
}

/// Everything needed to render an error envelope, attached to error responses.
#[derive(Debug, Clone)]
pub struct ErrorReport {
    pub status: StatusCode,
    pub message: String,
    pub label: Option<String>,
    pub detail: String,
    pub details: Vec<FieldViolation>,
}

impl ErrorReport {
    pub fn envelope(&self, include_detail: bool) -> ApiResponse<()> {
        let error = match (&self.label, include_detail) {
            (Some(label), _) => Some(label.clone()),
            (None, true) => Some(self.detail.clone()),
            (None, false) => None,
        };

        ApiResponse {
            details: self.details.clone(),
            ..ApiResponse::failure(self.message.clone(), error)
        }
    }
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let report = self.report();
        let mut response = (self.status, Json(report.envelope(false))).into_response();
        response.extensions_mut().insert(report);
        response
    }
}

impl<E> From<E> for AppError
where
    E: Into<Error>,
{
    fn from(err: E) -> Self {
        AppError::internal(err)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use http_body_util::BodyExt;
    use validator::Validate;

    #[derive(Validate)]
    struct Sample {
        #[validate(length(min = 3, message = "name must be at least 3 characters"))]
        name: String,
        #[validate(range(min = 0, message = "stock cannot be negative"))]
        stock: i32,
        #[validate(email)]
        email: String,
    }

    async fn body_json(response: Response) -> serde_json::Value {
        let bytes = response.into_body().collect().await.unwrap().to_bytes();
        serde_json::from_slice(&bytes).unwrap()
    }

    #[test]
    fn test_constructor_statuses() {
        let err = anyhow::anyhow!("x");
        assert_eq!(AppError::not_found(err).status, StatusCode::NOT_FOUND);
        assert_eq!(
            AppError::conflict(anyhow::anyhow!("x")).status,
            StatusCode::CONFLICT
        );
        assert_eq!(
            AppError::unauthorized(anyhow::anyhow!("x")).status,
            StatusCode::UNAUTHORIZED
        );
        assert_eq!(
            AppError::forbidden(anyhow::anyhow!("x")).status,
            StatusCode::FORBIDDEN
        );
        assert_eq!(
            AppError::bad_request(anyhow::anyhow!("x")).status,
            StatusCode::BAD_REQUEST
        );
    }

    #[test]
    fn test_unclassified_errors_become_internal() {
        let io = std::io::Error::other("disk on fire");
        let err: AppError = io.into();
        assert_eq!(err.status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(err.public_message(), INTERNAL_SERVER_ERROR);
        assert!(err.report().detail.contains("disk on fire"));
    }

    #[test]
    fn test_violations_collects_every_field() {
        let sample = Sample {
            name: "ab".to_string(),
            stock: -1,
            email: "nope".to_string(),
        };
        let errors = sample.validate().unwrap_err();
        let details = violations(&errors);

        let fields: Vec<&str> = details.iter().map(|v| v.field.as_str()).collect();
        assert_eq!(fields, vec!["email", "name", "stock"]);
        assert_eq!(details[0].message, "email is invalid");
        assert_eq!(details[1].message, "name must be at least 3 characters");
    }

    #[test]
    fn test_envelope_hides_detail_in_production() {
        let report = AppError::not_found(anyhow::anyhow!("User not found")).report();

        let hidden = report.envelope(false);
        assert!(!hidden.success);
        assert_eq!(hidden.message, "User not found");
        assert!(hidden.error.is_none());

        let shown = report.envelope(true);
        assert_eq!(shown.error.as_deref(), Some("User not found"));
    }

    #[test]
    fn test_validation_envelope_always_labelled() {
        let err = AppError::validation(vec![FieldViolation::new("price", "price is required")]);
        let envelope = err.report().envelope(false);
        assert_eq!(envelope.message, VALIDATION_FAILED);
        assert_eq!(envelope.error.as_deref(), Some(VALIDATION_ERROR_LABEL));
        assert_eq!(envelope.details.len(), 1);
    }

    #[tokio::test]
    async fn test_into_response_renders_envelope_and_report() {
        let response =
            AppError::conflict(anyhow::anyhow!("Product with this name already exists"))
                .into_response();

        assert_eq!(response.status(), StatusCode::CONFLICT);
        assert!(response.extensions().get::<ErrorReport>().is_some());

        let body = body_json(response).await;
        assert_eq!(body["success"], false);
        assert_eq!(body["message"], "Product with this name already exists");
        assert!(body.get("error").is_none());
    }
}
