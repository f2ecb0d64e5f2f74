use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::pagination::Page;
use crate::db::models::user::{CreateEmployee, Role, UpdateUser, User, UserListParams};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

const EMPLOYEE: Option<Role> = Some(Role::Employee);

/// Create an employee account (admin only)
#[utoipa::path(
    post,
    path = "/api/employees",
    request_body = CreateEmployee,
    responses(
        (status = 201, description = "Employee created", body = User),
        (status = 400, description = "Missing or invalid field"),
        (status = 403, description = "Admin access required"),
        (status = 409, description = "Email already exists")
    ),
    tag = "Employees",
    security(("bearerAuth" = []))
)]
pub async fn create_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<CreateEmployee>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.create_employee(&actor, payload).await?;
    Ok(ApiResponse::created("Employee created", user))
}

#[utoipa::path(
    get,
    path = "/api/employees",
    params(UserListParams),
    responses(
        (status = 200, description = "Paginated employees"),
        (status = 403, description = "Admin access required")
    ),
    tag = "Employees",
    security(("bearerAuth" = []))
)]
pub async fn list_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<UserListParams>,
) -> Result<ApiResponse<Page<User>>, AppError> {
    let page = state.services.users.list(&actor, params, EMPLOYEE).await?;
    Ok(ApiResponse::ok("Employees retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Employee found", body = User),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearerAuth" = []))
)]
pub async fn get_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.get(&actor, &id, EMPLOYEE).await?;
    Ok(ApiResponse::ok("Employee found", user))
}

#[utoipa::path(
    put,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee user ID")),
    request_body = UpdateUser,
    responses(
        (status = 200, description = "Employee updated", body = User),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearerAuth" = []))
)]
pub async fn update_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateUser>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.update(&actor, &id, EMPLOYEE, patch).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::ok("Employee updated", user))
}

#[utoipa::path(
    delete,
    path = "/api/employees/{id}",
    params(("id" = String, Path, description = "Employee user ID")),
    responses(
        (status = 200, description = "Employee deleted"),
        (status = 404, description = "Employee not found")
    ),
    tag = "Employees",
    security(("bearerAuth" = []))
)]
pub async fn delete_employee(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.users.delete(&actor, &id, EMPLOYEE).await?;
    state.actor_cache.invalidate(&id);
    Ok(ApiResponse::done("Employee deleted"))
}

pub fn employee_routes() -> Router<AppState> {
    Router::new()
        .route("/employees", get(list_employees).post(create_employee))
        .route(
            "/employees/{id}",
            get(get_employee)
                .put(update_employee)
                .patch(update_employee)
                .delete(delete_employee),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(create_employee, list_employees, get_employee, update_employee, delete_employee),
    components(schemas(CreateEmployee)),
    tags((name = "Employees", description = "Employee administration"))
)]
pub struct EmployeeDoc;
