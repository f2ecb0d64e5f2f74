use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::pagination::Page;
use crate::db::models::user::{CreateClient, Role, UpdateUser, User, UserListParams};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

const CLIENT: Option<Role> = Some(Role::Client);

/// Create a client account (admin only)
#[utoipa::path(
    post,
    path = "/api/clients",
    request_body = CreateClient,
    responses(
        (status = 201, description = "Client created", body = User),
        (status = 400, description = "Missing or invalid field"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already exists")
    ),
    tag = "Clients",
    security(("bearerAuth" = []))
)]
pub async fn create_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<CreateClient>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.create_client(&actor, payload).await?;
    Ok(ApiResponse::created("Client created", user))
}

#[utoipa::path(
    get,
    path = "/api/clients",
    params(UserListParams),
    responses(
        (status = 200, description = "Paginated clients"),
        (status = 403, description = "Admin access required")
    ),
    tag = "Clients",
    security(("bearerAuth" = []))
)]
pub async fn list_clients(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<UserListParams>,
) -> Result<ApiResponse<Page<User>>, AppError> {
    let page = state.services.users.list(&actor, params, CLIENT).await?;
    Ok(ApiResponse::ok("Clients retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Client found", body = User),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearerAuth" = []))
)]
pub async fn get_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.get(&actor, &id, CLIENT).await?;
    Ok(ApiResponse::ok("Client found", user))
}

#[utoipa::path(
    put,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client user ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Client updated", body = User),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearerAuth" = []))
)]
pub async fn update_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateUser>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.update(&actor, &id, CLIENT, patch).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::ok("Client updated", user))
}

#[utoipa::path(
    delete,
    path = "/api/clients/{id}",
    params(("id" = String, Path, description = "Client user ID")),
    responses(
        (status = 200, description = "Client deleted"),
        (status = 404, description = "Client not found")
    ),
    tag = "Clients",
    security(("bearerAuth" = []))
)]
pub async fn delete_client(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.users.delete(&actor, &id, CLIENT).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::done("Client deleted"))
}

pub fn client_routes() -> Router<AppState> {
    Router::new()
        .route("/clients", get(list_clients).post(create_client))
        .route(
            "/clients/{id}",
            get(get_client).put(update_client).patch(update_client).delete(delete_client),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(create_client, list_clients, get_client, update_client, delete_client),
    components(schemas(CreateClient)),
    tags((name = "Clients", description = "Client administration"))
)]
pub struct ClientDoc;
