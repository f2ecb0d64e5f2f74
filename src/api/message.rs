use axum::{
    extract::{Path, State},
    routing::get,
    Extension, Router,
};
use utoipa::OpenApi;

use crate::api::extract::{AppJson, AppQuery};
use crate::app_state::AppState;
use crate::db::models::message::{Message, MessageListParams, NewMessage};
use crate::db::models::pagination::Page;
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Post a message to a project the caller belongs to
#[utoipa::path(
    post,
    path = "/api/messages",
    request_body = NewMessage,
    responses(
        (status = 201, description = "Message sent", body = Message),
        (status = 400, description = "Content is required"),
        (status = 403, description = "Not a member of the project"),
        (status = 404, description = "Project not found")
    ),
    tag = "Messages",
    security(("bearerAuth" = []))
)]
pub async fn create_message(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppJson(payload): AppJson<NewMessage>,
) -> Result<ApiResponse<Message>, AppError> {
    let message = state.services.messages.create(&actor, payload).await?;
    Ok(ApiResponse::created("Message sent", message))
}

/// Messages across every project visible to the caller, newest first
#[utoipa::path(
    get,
    path = "/api/messages",
    params(MessageListParams),
    responses((status = 200, description = "Paginated messages")),
    tag = "Messages",
    security(("bearerAuth" = []))
)]
pub async fn list_messages(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    AppQuery(params): AppQuery<MessageListParams>,
) -> Result<ApiResponse<Page<Message>>, AppError> {
    let page = state.services.messages.list(&actor, params).await?;
    Ok(ApiResponse::ok("Messages retrieved", page))
}

#[utoipa::path(
    get,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message ID, e.g. MESSAGE01")),
    responses(
        (status = 200, description = "Message found", body = Message),
        (status = 403, description = "Not a member of the project"),
        (status = 404, description = "Message not found")
    ),
    tag = "Messages",
    security(("bearerAuth" = []))
)]
pub async fn get_message(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<Message>, AppError> {
    let message = state.services.messages.get(&actor, &id).await?;
    Ok(ApiResponse::ok("Message found", message))
}

#[utoipa::path(
    delete,
    path = "/api/messages/{id}",
    params(("id" = String, Path, description = "Message ID")),
    responses(
        (status = 200, description = "Message deleted"),
        (status = 403, description = "Can only delete own messages"),
        (status = 404, description = "Message not found")
    ),
    tag = "Messages",
    security(("bearerAuth" = []))
)]
pub async fn delete_message(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
    Path(id): Path<String>,
) -> Result<ApiResponse<()>, AppError> {
    state.services.messages.delete(&actor, &id).await?;
    Ok(ApiResponse::done("Message deleted"))
}

pub fn message_routes() -> Router<AppState> {
    Router::new()
        .route("/messages", get(list_messages).post(create_message))
        .route("/messages/{id}", get(get_message).delete(delete_message))
}

#[derive(OpenApi)]
#[openapi(
    paths(create_message, list_messages, get_message, delete_message),
    components(schemas(Message, NewMessage)),
    tags((name = "Messages", description = "Project conversations"))
)]
pub struct MessageDoc;
