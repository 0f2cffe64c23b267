//! `/users` routes.
//!
//! Listing and deletion are admin-only. Reading and updating a single user
//! is allowed for that user or an admin.

use axum::{
    Json, Router,
    extract::{Path, State, rejection::JsonRejection},
    http::StatusCode,
    routing::get,
};

use crate::auth::{AuthError, CurrentUser, PublicUser, RequireAdmin, UserId};
use crate::server::GatewayState;
use crate::services::UserUpdate;

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/users", get(list_users))
        .route("/users/me", get(me))
        .route(
            "/users/{id}",
            get(get_user).put(update_user).delete(delete_user),
        )
}

fn parse_id(raw: &str) -> Result<UserId, AuthError> {
    raw.parse()
        .map_err(|_| AuthError::InvalidInput(format!("Invalid user id: {raw}")))
}

fn authorize_self_or_admin(user: &PublicUser, target: UserId) -> Result<(), AuthError> {
    if user.id == target || user.role.is_admin() {
        Ok(())
    } else {
        Err(AuthError::Forbidden(
            "Not allowed to access this user".to_string(),
        ))
    }
}

fn not_found() -> AuthError {
    AuthError::NotFound("User not found".to_string())
}

async fn list_users(
    State(state): State<GatewayState>,
    RequireAdmin(_admin): RequireAdmin,
) -> Result<Json<Vec<PublicUser>>, AuthError> {
    Ok(Json(state.users.list_users().await?))
}

async fn me(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
) -> Result<Json<PublicUser>, AuthError> {
    let current = state.users.get_user(user.id).await?.ok_or_else(not_found)?;
    Ok(Json(current))
}

async fn get_user(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
) -> Result<Json<PublicUser>, AuthError> {
    let id = parse_id(&id)?;
    authorize_self_or_admin(&user, id)?;

    let target = state.users.get_user(id).await?.ok_or_else(not_found)?;
    Ok(Json(target))
}

async fn update_user(
    State(state): State<GatewayState>,
    CurrentUser(user): CurrentUser,
    Path(id): Path<String>,
    body: Result<Json<UserUpdate>, JsonRejection>,
) -> Result<Json<PublicUser>, AuthError> {
    let id = parse_id(&id)?;
    authorize_self_or_admin(&user, id)?;

    let Json(update) = body.map_err(|e| AuthError::InvalidInput(e.body_text()))?;
    Ok(Json(state.users.update_user(id, update).await?))
}

async fn delete_user(
    State(state): State<GatewayState>,
    RequireAdmin(_admin): RequireAdmin,
    Path(id): Path<String>,
) -> Result<StatusCode, AuthError> {
    let id = parse_id(&id)?;
    state.users.delete_user(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
