use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::dashboard::DashboardStats;
use crate::db::models::pagination::Page;
use crate::db::models::user::{UpdateUser, User, UserListParams};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// List users (admin only), optionally filtered by role and search term
#[utoipa::path(
    get,
    path = "/api/users",
    params(UserListParams),
    responses(
        (status = 200, description = "Paginated users"),
        (status = 400, description = "Invalid pagination"),
        (status = 403, description = "Admin access required")
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn list_users(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<UserListParams>,
) -> Result<ApiResponse<Page<User>>, AppError> {
    let page = state.services.users.list(&actor, params, None).await?;
    Ok(ApiResponse::ok("Users retrieved", page))
}

/// Get a user. Employees and clients may only read their own profile.
#[utoipa::path(
    get,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID, e.g. USER05")),
    responses(
        (status = 200, description = "User found", body = User),
        (status = 403, description = "Not your profile"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn get_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.get(&actor, &id, None).await?;
    Ok(ApiResponse::ok("User found", user))
}

/// Partially update a user. Also served on PATCH.
#[utoipa::path(
    put,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "User updated", body = User),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Field or profile not editable by caller"),
        (status = 404, description = "User not found"),
        (status = 409, description = "Email already exists")
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn update_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateUser>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.update(&actor, &id, None, patch).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::ok("User updated", user))
}

/// Delete a user (admin only, never yourself)
#[utoipa::path(
    delete,
    path = "/api/users/{id}",
    params(("id" = String, Path, description = "User ID")),
    responses(
        (status = 200, description = "User deleted"),
        (status = 400, description = "Cannot delete own account"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "User not found")
    ),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn delete_user(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.users.delete(&actor, &id, None).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::done("User deleted"))
}

/// Dashboard counters scoped to the caller
#[utoipa::path(
    get,
    path = "/api/users/dashboard/stats",
    responses((status = 200, description = "Dashboard statistics", body = DashboardStats)),
    tag = "Users",
    security(("bearerAuth" = []))
)]
pub async fn dashboard_stats(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<ApiResponse<DashboardStats>, AppError> {
    let stats = state.services.users.dashboard_stats(&actor).await?;
    Ok(ApiResponse::ok("Dashboard statistics", stats))
}

pub fn user_routes() -> Router<AppState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/dashboard/stats", get(dashboard_stats))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).patch(update_user).delete(delete_user),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(list_users, get_user, update_user, delete_user, dashboard_stats),
    components(schemas(User, UpdateUser, DashboardStats)),
    tags((name = "Users", description = "User profiles and administration"))
)]
pub struct UserDoc;
