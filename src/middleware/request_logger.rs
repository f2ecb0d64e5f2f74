use axum::{body::Body, http::Request, middleware::Next, response::Response};
use std::time::Instant;

/// Logs method, path, status and latency of every request.
pub async fn log_requests(req: Request<Body>, next: Next) -> Response {
    let method = req.method().clone();
    let path = req.uri().path().to_string();

    let start = Instant::now();
    let response = next.run(req).await;
    let status = response.status();
    let elapsed = start.elapsed();

    if status.is_server_error() {
        tracing::error!(%method, %path, status = status.as_u16(), ?elapsed, "request failed");
    } else if status.is_client_error() {
        tracing::warn!(%method, %path, status = status.as_u16(), ?elapsed, "request rejected");
    } else {
        tracing::info!(%method, %path, status = status.as_u16(), ?elapsed, "request served");
    }
    response
}
