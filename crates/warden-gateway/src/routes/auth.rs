//! `/auth` routes.

use axum::{
    Json, Router,
    extract::{State, rejection::JsonRejection},
    http::StatusCode,
    routing::post,
};
use serde::Deserialize;
use warden_core::{ValidationError, require_non_empty};

use crate::auth::{AuthError, AuthMode, LoginResponse, PublicUser};
use crate::server::GatewayState;

/// Registration body.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RegisterRequest {
    name: Option<String>,
    email: Option<String>,
    password: Option<String>,
    master_key: Option<String>,
}

/// Login body.
#[derive(Debug, Deserialize)]
struct LoginRequest {
    email: Option<String>,
    password: Option<String>,
    mode: Option<String>,
}

pub fn router() -> Router<GatewayState> {
    Router::new()
        .route("/auth/register", post(register))
        .route("/auth/login", post(login))
}

async fn register(
    State(state): State<GatewayState>,
    body: Result<Json<RegisterRequest>, JsonRejection>,
) -> Result<(StatusCode, Json<PublicUser>), AuthError> {
    let Json(req) = body.map_err(|e| AuthError::InvalidInput(e.body_text()))?;

    let (Some(name), Some(email), Some(password)) = (req.name, req.email, req.password) else {
        return Err(AuthError::InvalidInput(
            "name, email and password are required".to_string(),
        ));
    };
    // Field errors win over a bad master key
    require_non_empty("name", &name)?;
    require_non_empty("email", &email)?;
    if password.is_empty() {
        return Err(ValidationError::Required("password").into());
    }

    let role = state
        .auth_service
        .registration_role(req.master_key.as_deref())?;

    let user = state
        .auth_service
        .register(&name, &email, &password, role)
        .await?;

    Ok((StatusCode::CREATED, Json(user)))
}

async fn login(
    State(state): State<GatewayState>,
    body: Result<Json<LoginRequest>, JsonRejection>,
) -> Result<Json<LoginResponse>, AuthError> {
    let Json(req) = body.map_err(|e| AuthError::InvalidInput(e.body_text()))?;

    let mode = AuthMode::from_flag(req.mode.as_deref());
    let identifier = req.email.unwrap_or_default();
    let secret = req.password.unwrap_or_default();

    let response = state.auth_service.login(mode, &identifier, &secret).await?;
    Ok(Json(response))
}
