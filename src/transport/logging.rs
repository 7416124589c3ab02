//! HTTP request/response logging middleware for the peer transport server.

use std::time::Instant;

use axum::{extract::Request, middleware::Next, response::Response};

const LOG_TARGET: &str = "transport::http";

pub async fn log_requests(request: Request, next: Next) -> Response {
    let method = request.method().clone();
    let path = request.uri().path().to_owned();
    let start = Instant::now();

    let response = next.run(request).await;

    let status = response.status();
    let duration_ms = start.elapsed().as_millis();
    tracing::debug!(
        target: LOG_TARGET,
        %method,
        %path,
        status = %status.as_u16(),
        duration_ms,
        "round request completed"
    );

    response
}
