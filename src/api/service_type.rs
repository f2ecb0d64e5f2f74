use axum::{
    extract::{Path, State},
    routing::{get, post},
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::service_type::{
    NewServiceType, ServiceType, ServiceTypeListParams, ServiceTypeStatus, UpdateServiceType,
};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Public catalog of service types
#[utoipa::path(
    get,
    path = "/api/service-types",
    params(ServiceTypeListParams),
    responses((status = 200, description = "Service types", body = [ServiceType])),
    tag = "Service Types"
)]
pub async fn list_service_types(
    State(state): State<AppState>,
    AppQuery(params): AppQuery<ServiceTypeListParams>,
) -> Result<ApiResponse<Vec<ServiceType>>, AppError> {
    let types = state.services.service_types.list(params.status).await?;
    Ok(ApiResponse::ok("Service types retrieved", types))
}

#[utoipa::path(
    post,
    path = "/api/service-types",
    request_body = NewServiceType,
    responses(
        (status = 201, description = "Service type created", body = ServiceType),
        (status = 403, description = "Admin access required")
    ),
    tag = "Service Types",
    security(("bearerAuth" = []))
)]
pub async fn create_service_type(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<NewServiceType>,
) -> Result<ApiResponse<ServiceType>, AppError> {
    let service_type = state.services.service_types.create(&actor, payload).await?;
    Ok(ApiResponse::created("Service type created", service_type))
}

#[utoipa::path(
    get,
    path = "/api/service-types/{id}",
    params(("id" = String, Path, description = "Service type UUID")),
    responses(
        (status = 200, description = "Service type found", body = ServiceType),
        (status = 404, description = "Service type not found")
    ),
    tag = "Service Types",
    security(("bearerAuth" = []))
)]
pub async fn get_service_type(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<ApiResponse<ServiceType>, AppError> {
    let service_type = state.services.service_types.get(&id).await?;
    Ok(ApiResponse::ok("Service type found", service_type))
}

#[utoipa::path(
    put,
    path = "/api/service-types/{id}",
    params(("id" = String, Path, description = "Service type UUID")),
    request_body = UpdateServiceType,
    responses(
        (status = 200, description = "Service type updated", body = ServiceType),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service type not found")
    ),
    tag = "Service Types",
    security(("bearerAuth" = []))
)]
pub async fn update_service_type(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
    AppJson(patch): AppJson<UpdateServiceType>,
) -> Result<ApiResponse<ServiceType>, AppError> {
    let service_type = state.services.service_types.update(&actor, &id, patch).await?;
    Ok(ApiResponse::ok("Service type updated", service_type))
}

#[utoipa::path(
    delete,
    path = "/api/service-types/{id}",
    params(("id" = String, Path, description = "Service type UUID")),
    responses(
        (status = 200, description = "Service type deleted"),
        (status = 403, description = "Admin access required"),
        (status = 404, description = "Service type not found")
    ),
    tag = "Service Types",
    security(("bearerAuth" = []))
)]
pub async fn delete_service_type(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.service_types.delete(&actor, &id).await?;
    Ok(ApiResponse::done("Service type deleted"))
}

/// Routes reachable without a token.
pub fn public_service_type_routes() -> Router<AppState> {
    Router::new().route("/service-types", get(list_service_types))
}

pub fn service_type_routes() -> Router<AppState> {
    Router::new()
        .route("/service-types", post(create_service_type))
        .route(
            "/service-types/{id}",
            get(get_service_type)
                .put(update_service_type)
                .delete(delete_service_type),
        )
}

#[derive(OpenApi)]
#[openapi(
    paths(
        list_service_types, create_service_type, get_service_type,
        update_service_type, delete_service_type
    ),
    components(schemas(ServiceType, ServiceTypeStatus, NewServiceType, UpdateServiceType)),
    tags((name = "Service Types", description = "Catalog of offered services"))
)]
pub struct ServiceTypeDoc;
