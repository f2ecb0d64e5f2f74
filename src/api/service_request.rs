use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::pagination::Page;
use crate::db::models::project::Project;
use crate::db::models::service_request::{
    ApproveServiceRequest, NewServiceRequest, RequestStatus, ServiceRequest,
    ServiceRequestListParams, UpdateServiceRequest,
};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Open a service request (clients only)
#[utoipa::path(
    post,
    path = "/api/service-requests",
    request_body = NewServiceRequest,
    responses(
        (status = 201, description = "Service request created", body = ServiceRequest),
        (status = 400, description = "Title is required"),
        (status = 403, description = "Only clients can create service requests")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn create_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<NewServiceRequest>,
) -> Result<ApiResponse<ServiceRequest>, AppError> {
    let request = state.services.service_requests.create(&actor, payload).await?;
    Ok(ApiResponse::created("Service request created", request))
}

/// List service requests. Clients only see their own.
#[utoipa::path(
    get,
    path = "/api/service-requests",
    params(ServiceRequestListParams),
    responses((status = 200, description = "Paginated service requests")),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn list_service_requests(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<ServiceRequestListParams>,
) -> Result<ApiResponse<Page<ServiceRequest>>, AppError> {
    let page = state.services.service_requests.list(&actor, params).await?;
    Ok(ApiResponse::ok("Service requests retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/service-requests/{id}",
    params(("id" = String, Path, description = "Service request ID, e.g. SERVICE01")),
    responses(
        (status = 200, description = "Service request found", body = ServiceRequest),
        (status = 403, description = "Not your service request"),
        (status = 404, description = "Service request not found")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn get_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ServiceRequest>, AppError> {
    let request = state.services.service_requests.get(&actor, &id).await?;
    Ok(ApiResponse::ok("Service request found", request))
}

/// Edit title or description (admins and employees)
#[utoipa::path(
    put,
    path = "/api/service-requests/{id}",
    params(("id" = String, Path, description = "Service request ID")),
    request_body = UpdateServiceRequest,
    responses(
        (status = 200, description = "Service request updated", body = ServiceRequest),
        (status = 403, description = "Clients cannot update service requests"),
        (status = 404, description = "Service request not found")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn update_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateServiceRequest>,
) -> Result<ApiResponse<ServiceRequest>, AppError> {
    let request = state.services.service_requests.update(&actor, &id, patch).await?;
    Ok(ApiResponse::ok("Service request updated", request))
}

#[utoipa::path(
    delete,
    path = "/api/service-requests/{id}",
    params(("id" = String, Path, description = "Service request ID")),
    responses(
        (status = 200, description = "Service request deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service request not found")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn delete_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.service_requests.delete(&actor, &id).await?;
    Ok(ApiResponse::done("Service request deleted"))
}

/// Approve a pending request, creating its project (admin only)
#[utoipa::path(
    post,
    path = "/api/service-requests/{id}/approve",
    params(("id" = String, Path, description = "Service request ID")),
    request_body = ApproveServiceRequest,
    responses(
        (status = 201, description = "Project created from the request", body = Project),
        (status = 400, description = "Request is not pending or unknown employee"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service request not found")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn approve_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    payload: Option<AppJson<ApproveServiceRequest>>,
) -> Result<ApiResponse<Project>, AppError> {
    let payload = payload.map(|AppJson(body)| body).unwrap_or_default();
    let project = state
        .services
        .service_requests
        .approve(&actor, &id, &payload.employee_ids)
        .await?;
    Ok(ApiResponse::created("Service request approved", project))
}

/// Reject a pending request (admin only)
#[utoipa::path(
    post,
    path = "/api/service-requests/{id}/reject",
    params(("id" = String, Path, description = "Service request ID")),
    responses(
        (status = 200, description = "Service request rejected", body = ServiceRequest),
        (status = 400, description = "Request is not pending"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service request not found")
    ),
    tag = "Service Requests",
    security(("bearerAuth" = []))
)]
pub async fn reject_service_request(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ServiceRequest>, AppError> {
    let request = state.services.service_requests.reject(&actor, &id).await?;
    Ok(ApiResponse::ok("Service request rejected", request))
}

pub fn service_request_routes() -> Router<AppState> {
    Router::new()
        .route(
            "/service-requests",
            get(list_service_requests).post(create_service_request),
        )
        .route(
            "/service-requests/{id}",
            get(get_service_request)
                .put(update_service_request)
                .delete(delete_service_request),
        )
        .route("/service-requests/{id}/approve", post(approve_service_request))
        .route("/service-requests/{id}/reject", post(reject_service_request))
}

#[derive(OpenApi)]
#[openapi(
    paths(
        create_service_request, list_service_requests, get_service_request,
        update_service_request, delete_service_request, approve_service_request,
        reject_service_request
    ),
    components(schemas(
        ServiceRequest, RequestStatus, NewServiceRequest, UpdateServiceRequest,
        ApproveServiceRequest
    )),
    tags((name = "Service Requests", description = "Client requests and the approval workflow"))
)]
pub struct ServiceRequestDoc;
