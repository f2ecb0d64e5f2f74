use axum::{
    extract::State,
    routing::{get, post},
    Extension, Router,
};
use utoipa::openapi::security::{Http, HttpAuthScheme, SecurityScheme};
use utoipa::{Modify, OpenApi};

use crate::api::extract::AppJson;
use crate::app_state::AppState;
use crate::db::models::user::{LoginRequest, LoginResponse, RegisterRequest, User};
use crate::error::AppError;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Handles user registration.
///
/// Anyone may sign up as an employee or a client. An admin account is only
/// accepted while no user exists yet.
///
/// # Returns
/// * `201 Created` - The new user.
/// * `400 Bad Request` - Missing name, malformed email or short password.
/// * `403 Forbidden` - Admin sign-up after the first account exists.
/// * `409 Conflict` - Email already registered.
#[utoipa::path(
    post,
    path = "/api/auth/register",
    request_body = RegisterRequest,
    tag = "Authentication",
    responses(
        (status = 201, description = "User registered", body = User),
        (status = 400, description = "Invalid registration details"),
        (status = 403, description = "Admin self-registration refused"),
        (status = 409, description = "Email already exists"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn register(
    State(state): State<AppState>,
    AppJson(payload): AppJson<RegisterRequest>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.auth.register(payload).await?;
    Ok(ApiResponse::created("User registered", user))
}

/// Handles user login
///
/// # Returns
/// * `200 OK` - A JWT token and the user.
/// * `401 Unauthorized` - Unknown email or wrong password.
/// * `403 Forbidden` - The account is inactive.
#[utoipa::path(
    post,
    path = "/api/auth/login",
    tag = "Authentication",
    request_body(content = LoginRequest, description = "User login details"),
    responses(
        (status = 200, description = "Successful login", body = LoginResponse),
        (status = 401, description = "Invalid email or password"),
        (status = 403, description = "Account is inactive"),
        (status = 500, description = "Internal Server Error")
    )
)]
pub async fn login(
    State(state): State<AppState>,
    AppJson(payload): AppJson<LoginRequest>,
) -> Result<ApiResponse<LoginResponse>, AppError> {
    let response = state.services.auth.login(payload).await?;
    Ok(ApiResponse::ok("Login successful", response))
}

/// Profile of the authenticated caller
#[utoipa::path(
    get,
    path = "/api/auth/me",
    tag = "Authentication",
    responses(
        (status = 200, description = "Current user", body = User),
        (status = 401, description = "Missing or invalid token")
    ),
    security(("bearerAuth" = []))
)]
pub async fn me(
    State(state): State<AppState>,
    Extension(actor): Extension<Actor>,
) -> Result<ApiResponse<User>, AppError> {
    let user = state.services.users.get(&actor, &actor.id, None).await?;
    Ok(ApiResponse::ok("Current user", user))
}

pub fn auth_routes() -> Router<AppState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

pub fn secure_auth_routes() -> Router<AppState> {
    Router::new().route("/auth/me", get(me))
}

pub struct SecurityAddon;

impl Modify for SecurityAddon {
    fn modify(&self, openapi: &mut utoipa::openapi::OpenApi) {
        let components = openapi.components.get_or_insert_with(Default::default);
        components.add_security_scheme(
            "bearerAuth",
            SecurityScheme::Http(Http::new(HttpAuthScheme::Bearer)),
        );
    }
}

#[derive(OpenApi)]
#[openapi(
    paths(login, register, me),
    components(schemas(LoginRequest, LoginResponse, RegisterRequest, User)),
    tags((name = "Authentication", description = "User Auth Endpoints")),
    modifiers(&SecurityAddon)
)]
pub struct AuthDoc;
