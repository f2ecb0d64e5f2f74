pub mod api;
pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod services;
pub mod utils;

use axum::http::StatusCode;
use axum::middleware::{from_fn, from_fn_with_state};
use axum::Router;
use std::time::Duration;
use tower_http::timeout::TimeoutLayer;
use utoipa_rapidoc::RapiDoc;
use utoipa_swagger_ui::SwaggerUi;

use crate::app_state::AppState;
use crate::middleware::auth::{actor_middleware, jwt_middleware};
use crate::middleware::request_logger::log_requests;

/// Requests still running after `limit` are answered with `408`.
fn request_timeout(limit: Duration) -> TimeoutLayer {
    TimeoutLayer::with_status_code(StatusCode::REQUEST_TIMEOUT, limit)
}

/// Assembles the full application: `/api` routes (public and token-guarded),
/// health probes and the OpenAPI UIs.
pub fn build_router(state: AppState) -> Router {
    let doc = api::openapi();

    let private_routes = api::private_routes()
        .route_layer(from_fn_with_state(state.clone(), actor_middleware))
        .route_layer(from_fn_with_state(state.clone(), jwt_middleware));

    Router::new()
        .nest("/api", api::public_routes().merge(private_routes))
        .merge(api::health::health_routes())
        .merge(SwaggerUi::new("/swagger").url("/api-docs/openapi.json", doc.clone()))
        .merge(RapiDoc::with_openapi("/api-docs/rapidoc.json", doc).path("/rapidoc"))
        .layer(request_timeout(state.config.request_timeout))
        .layer(from_fn(log_requests))
        .with_state(state)
}

#[cfg(test)]
mod tests {
    use super::*;
    use axum::routing::get;
    use tokio::net::TcpListener;

    #[tokio::test]
    async fn slow_requests_time_out_with_408() {
        let app = Router::new()
            .route(
                "/slow",
                get(|| async {
                    tokio::time::sleep(Duration::from_secs(5)).await;
                    "done"
                }),
            )
            .route("/fast", get(|| async { "done" }))
            .layer(request_timeout(Duration::from_millis(50)));
        let listener = TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move { axum::serve(listener, app).await.unwrap() });

        let slow = reqwest::get(format!("http://{addr}/slow")).await.unwrap();
        assert_eq!(slow.status(), reqwest::StatusCode::REQUEST_TIMEOUT);
        let fast = reqwest::get(format!("http://{addr}/fast")).await.unwrap();
        assert_eq!(fast.status(), reqwest::StatusCode::OK);
    }
}
