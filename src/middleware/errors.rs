//! The terminal error sink.
//!
//! [`AppError`](storefront_core::AppError) renders its own public envelope
//! and attaches an [`ErrorReport`]. This middleware is the one place that
//! logs errors and decides how much of them a client gets to see: outside
//! production the internal error chain is added as `error`.
//!
//! Error responses produced by layers that know nothing about the envelope
//! (rate limiting, method mismatch, body limit) are wrapped here as well.

use anyhow::anyhow;
use axum::{
    Json,
    extract::{OriginalUri, Request, State},
    http::{StatusCode, header},
    middleware::Next,
    response::{IntoResponse, Response},
};
use storefront_core::{AppError, ErrorReport};
use tracing::{error, warn};

use crate::state::AppState;

pub const RATE_LIMITED: &str = "Too many requests from this IP, please try again later.";

/// Fallback for unmatched routes.
pub async fn route_not_found(OriginalUri(uri): OriginalUri) -> AppError {
    AppError::not_found(anyhow!("Route {} not found", uri.path()))
}

fn is_json(response: &Response) -> bool {
    response
        .headers()
        .get(header::CONTENT_TYPE)
        .and_then(|value| value.to_str().ok())
        .is_some_and(|value| value.starts_with("application/json"))
}

/// Report for an error response that did not come from an `AppError`.
fn foreign_report(status: StatusCode) -> ErrorReport {
    let message = match status {
        StatusCode::TOO_MANY_REQUESTS => RATE_LIMITED.to_string(),
        _ => status.canonical_reason().unwrap_or("Error").to_string(),
    };
    let label =
        (status == StatusCode::TOO_MANY_REQUESTS).then(|| "Rate limit exceeded".to_string());

    ErrorReport {
        status,
        detail: message.clone(),
        message,
        label,
        details: Vec::new(),
    }
}

pub async fn error_sink(State(state): State<AppState>, req: Request, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let response = next.run(req).await;
    let status = response.status();

    let report = match response.extensions().get::<ErrorReport>() {
        Some(report) => report.clone(),
        None if (status.is_client_error() || status.is_server_error()) && !is_json(&response) => {
            foreign_report(status)
        }
        None => return response,
    };

    if status.is_server_error() {
        error!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            error = %report.detail,
            "Request failed"
        );
    } else {
        warn!(
            method = %method,
            path = %path,
            status = status.as_u16(),
            error = %report.message,
            "Request rejected"
        );
    }

    let include_detail = !state.app_config.is_production();
    let (mut parts, _) = response.into_parts();
    parts.headers.remove(header::CONTENT_LENGTH);
    parts.headers.remove(header::CONTENT_TYPE);

    let mut rendered = (
        parts.status,
        parts.headers,
        Json(report.envelope(include_detail)),
    )
        .into_response();
    rendered.extensions_mut().insert(report);
    rendered
}
