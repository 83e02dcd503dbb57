//! Validating extractors.
//!
//! Handlers take these instead of the plain axum extractors, so a handler
//! body only ever sees input that already passed every `validator` rule.
//! Deserialization problems and rule violations both end in a 400 envelope.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{
        FromRequest, FromRequestParts, Path, Query, Request,
        rejection::{JsonRejection, QueryRejection},
    },
    http::request::Parts,
};
use serde::de::DeserializeOwned;
use storefront_core::{AppError, FieldViolation};
use uuid::Uuid;
use validator::Validate;

pub const INVALID_ID_FORMAT: &str = "Invalid ID format";

/// Pulls the field name out of serde's "missing field `x`" message.
fn missing_field(message: &str) -> Option<&str> {
    message
        .split("missing field `")
        .nth(1)
        .and_then(|rest| rest.split('`').next())
}

/// Drops axum's "Failed to deserialize ...: " prefix.
fn serde_message(body_text: &str) -> &str {
    body_text
        .split_once(": ")
        .map(|(_, rest)| rest)
        .unwrap_or(body_text)
}

fn json_rejection(rejection: JsonRejection) -> AppError {
    match rejection {
        JsonRejection::JsonDataError(err) => {
            let text = err.body_text();
            let violation = match missing_field(&text) {
                Some(field) => FieldViolation::new(field, format!("{} is required", field)),
                None => FieldViolation::new("body", serde_message(&text)),
            };
            AppError::validation(vec![violation])
        }
        JsonRejection::JsonSyntaxError(err) => {
            AppError::bad_request(anyhow!(err.body_text()).context("Invalid JSON format"))
        }
        JsonRejection::MissingJsonContentType(_) => {
            AppError::bad_request(anyhow!("Missing 'Content-Type: application/json' header"))
        }
        other => AppError::new(other.status(), anyhow!(other.body_text())),
    }
}

fn query_rejection(rejection: QueryRejection) -> AppError {
    let text = rejection.body_text();
    AppError::validation(vec![FieldViolation::new("query", serde_message(&text))])
}

/// JSON body that has been deserialized and validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedJson<T>(pub T);

impl<T, S> FromRequest<S> for ValidatedJson<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let Json(value) = Json::<T>::from_request(req, state)
            .await
            .map_err(json_rejection)?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(ValidatedJson(value))
    }
}

/// Query string that has been deserialized and validated.
#[derive(Debug, Clone, Copy, Default)]
pub struct ValidatedQuery<T>(pub T);

impl<T, S> FromRequestParts<S> for ValidatedQuery<T>
where
    T: DeserializeOwned + Validate,
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Query(value) = Query::<T>::from_request_parts(parts, state)
            .await
            .map_err(query_rejection)?;

        value
            .validate()
            .map_err(|errors| AppError::from_validation(&errors))?;

        Ok(ValidatedQuery(value))
    }
}

/// The `{id}` path segment, parsed as a UUID.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ResourceId(pub Uuid);

impl<S> FromRequestParts<S> for ResourceId
where
    S: Send + Sync,
{
    type Rejection = AppError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Path(raw) = Path::<String>::from_request_parts(parts, state)
            .await
            .map_err(|rejection| {
                AppError::bad_request(anyhow!(rejection.body_text()).context(INVALID_ID_FORMAT))
            })?;

        Uuid::parse_str(&raw)
            .map(ResourceId)
            .map_err(|e| AppError::bad_request(anyhow::Error::new(e).context(INVALID_ID_FORMAT)))
    }
}
