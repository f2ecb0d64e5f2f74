use axum::{
    extract::{Path, State},
    routing::{get, patch, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::message::{Message, MessageListParams};
use crate::db::models::pagination::{Page, PageRequest};
use crate::db::models::project::{
    AssignEmployees, NewProject, Project, ProjectListParams, ProjectStatus, UpdateProgress,
    UpdateProject,
};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Create a project (admin only)
#[utoipa::path(
    post,
    path = "/api/projects",
    request_body = NewProject,
    responses(
        (status = 201, description = "Project created", body = Project),
        (status = 400, description = "Unknown client or employee"),
        (status = 403, description = "Admin access required")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn create_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<NewProject>,
) -> Result<ApiResponse<Project>, AppError> {
    let project = state.services.projects.create(&actor, payload).await?;
    Ok(ApiResponse::created("Project created", project))
}

/// List the projects visible to the caller
///
/// Admins see every project, employees the ones they are assigned to and
/// clients the ones they own.
#[utoipa::path(
    get,
    path = "/api/projects",
    params(ProjectListParams),
    responses(
        (status = 200, description = "Paginated projects"),
        (status = 400, description = "Invalid pagination")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn list_projects(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<ProjectListParams>,
) -> Result<ApiResponse<Page<Project>>, AppError> {
    let page = state.services.projects.list(&actor, params).await?;
    Ok(ApiResponse::ok("Projects retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID, e.g. PROJECT01")),
    responses(
        (status = 200, description = "Project found", body = Project),
        (status = 403, description = "Not assigned to or owner of this project"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn get_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Project>, AppError> {
    let project = state.services.projects.get(&actor, &id).await?;
    Ok(ApiResponse::ok("Project found", project))
}

#[utoipa::path(
    put,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    request_body = UpdateProject,
    responses(
        (status = 200, description = "Project updated", body = Project),
        (status = 400, description = "Invalid field"),
        (status = 403, description = "Field not editable by caller"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn update_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateProject>,
) -> Result<ApiResponse<Project>, AppError> {
    let project = state.services.projects.update(&actor, &id, patch).await?;
    Ok(ApiResponse::ok("Project updated", project))
}

#[utoipa::path(
    delete,
    path = "/api/projects/{id}",
    params(("id" = String, Path, description = "Project ID")),
    responses(
        (status = 200, description = "Project deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn delete_project(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.projects.delete(&actor, &id).await?;
    Ok(ApiResponse::done("Project deleted"))
}

/// Replace the set of employees working on a project (admin only)
#[utoipa::path(
    post,
    path = "/api/projects/{id}/assign",
    params(("id" = String, Path, description = "Project ID")),
    request_body = AssignEmployees,
    responses(
        (status = 200, description = "Employees assigned", body = Project),
        (status = 400, description = "Unknown employee"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn assign_employees(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<AssignEmployees>,
) -> Result<ApiResponse<Project>, AppError> {
    let project = state
        .services
        .projects
        .assign_employees(&actor, &id, &payload.employee_ids)
        .await?;
    Ok(ApiResponse::ok("Employees assigned", project))
}

#[utoipa::path(
    patch,
    path = "/api/projects/{id}/progress",
    params(("id" = String, Path, description = "Project ID")),
    request_body = UpdateProgress,
    responses(
        (status = 200, description = "Progress updated", body = Project),
        (status = 400, description = "Progress outside 0-100"),
        (status = 403, description = "Not assigned to or owner of this project"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn update_progress(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(payload): AppJson<UpdateProgress>,
) -> Result<ApiResponse<Project>, AppError> {
    let project = state
        .services
        .projects
        .update_progress(&actor, &id, payload.progress)
        .await?;
    Ok(ApiResponse::ok("Progress updated", project))
}

/// Messages of one project, newest first
#[utoipa::path(
    get,
    path = "/api/projects/{id}/messages",
    params(
        ("id" = String, Path, description = "Project ID"),
        ("page" = Option<u32>, Query, description = "Page number, from 1"),
        ("page_size" = Option<u32>, Query, description = "Items per page, 1-100")
    ),
    responses(
        (status = 200, description = "Paginated messages"),
        (status = 403, description = "Not assigned to or owner of this project"),
        (status = 404, description = "Project not found")
    ),
    tag = "Projects",
    security(("bearerAuth" = []))
)]
pub async fn project_messages(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppQuery(params): AppQuery<MessageListParams>,
) -> Result<ApiResponse<Page<Message>>, AppError> {
    let page = PageRequest::new(params.page, params.page_size)?;
    let messages = state.services.messages.list_by_project(&actor, &id, page).await?;
    Ok(ApiResponse::ok("Messages retrieved", messages))
}

pub fn project_routes() -> Router<AppState> {
    Router::new()
        .route("/projects", get(list_projects).post(create_project))
        .route(
            "/projects/{id}",
            get(get_project).put(update_project).delete(delete_project),
        )
        .route("/projects/{id}/assign", post(assign_employees))
        .route("/projects/{id}/progress", patch(update_progress))
        .route("/projects/{id}/messages", get(project_messages))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_project, list_projects, get_project, update_project, delete_project,
        assign_employees, update_progress, project_messages
    ),
    components(schemas(
        Project, ProjectStatus, NewProject, UpdateProject, AssignEmployees, UpdateProgress
    )),
    tags((name = "Projects", description = "Project management"))
)]
pub struct ProjectDoc;
