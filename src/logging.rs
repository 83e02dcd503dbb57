//! Tracing setup and per-request logging.
//!
//! The request logger wraps the whole router and records the raw request path.
//!
//! - `RUST_LOG`: filter directives (default `storefront=info,tower_http=warn`)
//! - `LOG_FORMAT`: `json` for structured console output, anything else for compact text
//! - `LOG_DIR`: if set, JSON logs are also written to a daily rolling file there

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};
use tracing::{error, info, warn};
use tracing_appender::rolling::{RollingFileAppender, Rotation};
use tracing_subscriber::{EnvFilter, Layer, fmt, layer::SubscriberExt, util::SubscriberInitExt};

pub async fn logging_middleware(req: Request, next: Next) -> Response {
    let start = Instant::now();
    let method = req.method().clone();
    // Runs before routing, so only the raw path is known here.
    let path = req.uri().path().to_string();

    let request_id = uuid::Uuid::new_v4().to_string();

    info!(
        request_id = %request_id,
        method = %method,
        path = %path,
        "Incoming request"
    );

    let response = next.run(req).await;
    let latency = start.elapsed();
    let status = response.status();

    match status.as_u16() {
        400..=499 => {
            warn!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Client error"
            );
        }
        500..=599 => {
            error!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Server error"
            );
        }
        _ => {
            info!(
                request_id = %request_id,
                method = %method,
                path = %path,
                status = %status.as_u16(),
                latency_ms = %latency.as_millis(),
                "Request completed"
            );
        }
    }

    response
}

fn env_filter() -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        EnvFilter::new(format!(
            "{}=info,storefront_db=info,tower_http=warn,axum::rejection=trace",
            env!("CARGO_CRATE_NAME")
        ))
    })
}

pub fn init_tracing() {
    let json_console = std::env::var("LOG_FORMAT").is_ok_and(|format| format == "json");

    let compact_layer = (!json_console).then(|| {
        fmt::layer()
            .with_target(false)
            .with_file(true)
            .with_line_number(true)
            .compact()
            .with_filter(env_filter())
    });

    let json_layer = json_console.then(|| {
        fmt::layer()
            .json()
            .with_current_span(true)
            .with_span_list(true)
            .with_filter(env_filter())
    });

    let file_layer = std::env::var("LOG_DIR").ok().and_then(|log_dir| {
        if let Err(e) = std::fs::create_dir_all(&log_dir) {
            eprintln!("⚠️  Failed to create log directory {}: {}", log_dir, e);
            return None;
        }

        let file_appender = RollingFileAppender::new(Rotation::DAILY, &log_dir, "storefront.json");
        Some(
            fmt::layer()
                .json()
                .with_writer(file_appender)
                .with_ansi(false)
                .with_current_span(true)
                .with_filter(env_filter()),
        )
    });

    tracing_subscriber::registry()
        .with(compact_layer)
        .with(json_layer)
        .with(file_layer)
        .init();
}
