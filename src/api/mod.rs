pub mod auth;
pub mod client;
pub mod employee;
pub mod extract;
pub mod health;
pub mod message;
pub mod project;
pub mod service_request;
pub mod service_type;
pub mod user;

use axum::Router;
use utoipa::OpenApi;

use crate::app_state::AppState;

/// Routes under `/api` that need no token.
pub fn public_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::auth_routes())
        .merge(service_type::public_service_type_routes())
}

/// Routes under `/api` that run behind the JWT and actor middleware.
pub fn private_routes() -> Router<AppState> {
    Router::new()
        .merge(auth::secure_auth_routes())
        .merge(user::user_routes())
        .merge(employee::employee_routes())
        .merge(client::client_routes())
        .merge(project::project_routes())
        .merge(service_request::service_request_routes())
        .merge(message::message_routes())
        .merge(service_type::service_type_routes())
}

pub fn openapi() -> utoipa::openapi::OpenApi {
    auth::AuthDoc::openapi()
        .merge_from(user::UserDoc::openapi())
        .merge_from(employee::EmployeeDoc::openapi())
        .merge_from(client::ClientDoc::openapi())
        .merge_from(project::ProjectDoc::openapi())
        .merge_from(service_request::ServiceRequestDoc::openapi())
        .merge_from(message::MessageDoc::openapi())
        .merge_from(service_type::ServiceTypeDoc::openapi())
}
