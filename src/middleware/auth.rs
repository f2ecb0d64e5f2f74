use std::sync::Arc;
use std::time::Duration;

use axum::{
    body::Body,
    extract::{Request, State},
    http::StatusCode,
    middleware::Next,
    response::{IntoResponse, Response},
};
use moka::sync::Cache;
use tracing::{error, warn};

use crate::app_state::AppState;
use crate::db::models::user::User;
use crate::services::auth::Claims;
use crate::services::Actor;
use crate::utils::api_response::ApiResponse;

/// Loaded callers, keyed by user id. Entries are dropped when the user is
/// updated or deleted, and expire after the configured TTL otherwise.
pub type ActorCache = Arc<Cache<String, User>>;

pub fn create_actor_cache(ttl: Duration) -> ActorCache {
    Arc::new(Cache::builder().time_to_live(ttl).max_capacity(10_000).build())
}

fn reject(status: StatusCode, message: &str) -> Response {
    ApiResponse::<()>::error(status, message, None).into_response()
}

/// **JWT Middleware** (Handles Token Authentication)
pub async fn jwt_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    // Step 1: Extract Authorization header
    let auth_header = req.headers().get("Authorization").ok_or_else(|| {
        error!("Missing Authorization header");
        reject(StatusCode::UNAUTHORIZED, "Missing Authorization header")
    })?;

    // Step 2: Convert header to string
    let token_str = auth_header.to_str().map_err(|_| {
        error!("Invalid Authorization header format");
        reject(StatusCode::UNAUTHORIZED, "Invalid Authorization header format")
    })?;

    // Step 3: Strip "Bearer " prefix
    let token = token_str.strip_prefix("Bearer ").ok_or_else(|| {
        error!("Invalid token format (missing 'Bearer ' prefix)");
        reject(StatusCode::UNAUTHORIZED, "Invalid token format (missing 'Bearer ' prefix)")
    })?;

    // Step 4: Decode the JWT token
    let claims = state.services.auth.verify_token(token).map_err(|e| {
        error!("JWT decoding failed: {e}");
        e.into_response()
    })?;

    req.extensions_mut().insert(claims);
    Ok(next.run(req).await)
}

/// Resolves the token subject to a live account and attaches the [`Actor`].
/// A deleted account is a 401, a deactivated one a 403.
pub async fn actor_middleware(
    State(state): State<AppState>,
    mut req: Request<Body>,
    next: Next,
) -> Result<Response, Response> {
    let claims = req.extensions().get::<Claims>().cloned().ok_or_else(|| {
        error!("Missing JWT claims in request");
        reject(StatusCode::UNAUTHORIZED, "Missing JWT claims in request")
    })?;

    let user = match state.actor_cache.get(&claims.sub) {
        Some(user) => user,
        None => {
            let user = state
                .services
                .users
                .find(&claims.sub)
                .await
                .map_err(IntoResponse::into_response)?
                .ok_or_else(|| {
                    warn!("Token for deleted user {}", claims.sub);
                    reject(StatusCode::UNAUTHORIZED, "User no longer exists")
                })?;
            state.actor_cache.insert(user.id.clone(), user.clone());
            user
        }
    };

    if !user.is_active() {
        warn!("Inactive user {} attempted a request", user.id);
        return Err(reject(StatusCode::FORBIDDEN, "Account is inactive"));
    }

    req.extensions_mut().insert(Actor::from(&user));
    Ok(next.run(req).await)
}
