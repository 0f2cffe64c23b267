//! Authentication and authorization for the gateway.
//!
//! This module provides:
//! - User model with role-based access control
//! - Password hashing and verification
//! - JWT token issuance and validation
//! - Login strategies (email/password and master key)
//! - Auth extractors for protected routes

mod jwt;
mod middleware;
mod password;
mod strategy;
mod users;

pub use jwt::{Claims, JwtManager};
pub use middleware::{AuthState, CurrentUser, RequireAdmin, ensure_role};
pub use password::{hash_password, verify_password};
pub use strategy::{
    AuthMode, AuthStrategy, LoginResponse, MasterKeyStrategy, PasswordStrategy, Strategy,
};
pub use users::{MASTER_USER_ID, NewUser, PublicUser, User, UserId, UserRole};

use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde::Serialize;
use thiserror::Error;
use warden_core::ValidationError;

/// Authentication errors.
///
/// Every failure the gateway can surface to a caller maps to one of these.
#[derive(Debug, Error)]
pub enum AuthError {
    /// Missing or malformed request input.
    #[error("{0}")]
    InvalidInput(String),

    /// A user with this email already exists.
    #[error("User already exists")]
    UserExists,

    /// Unknown email or wrong password. Deliberately indistinguishable.
    #[error("Invalid credentials")]
    InvalidCredentials,

    /// Master key missing, unconfigured, or wrong.
    #[error("Invalid master key")]
    InvalidMasterKey,

    /// No usable bearer token on the request.
    #[error("{0}")]
    Unauthenticated(String),

    /// Authenticated, but not allowed to do this.
    #[error("{0}")]
    Forbidden(String),

    /// Target record does not exist.
    #[error("{0}")]
    NotFound(String),

    /// Token could not be issued or decoded.
    #[error("Token error: {0}")]
    Token(String),

    /// Credential store failure.
    #[error("Storage error: {0}")]
    Storage(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),
}

impl AuthError {
    /// HTTP status and machine-readable code for this error.
    #[must_use]
    pub const fn status(&self) -> (StatusCode, &'static str) {
        match self {
            Self::InvalidInput(_) => (StatusCode::BAD_REQUEST, "invalid_input"),
            Self::UserExists => (StatusCode::BAD_REQUEST, "user_exists"),
            Self::InvalidCredentials => (StatusCode::UNAUTHORIZED, "invalid_credentials"),
            Self::InvalidMasterKey => (StatusCode::UNAUTHORIZED, "invalid_master_key"),
            Self::Unauthenticated(_) => (StatusCode::UNAUTHORIZED, "unauthenticated"),
            Self::Forbidden(_) => (StatusCode::FORBIDDEN, "forbidden"),
            Self::NotFound(_) => (StatusCode::NOT_FOUND, "not_found"),
            Self::Token(_) | Self::Storage(_) | Self::Config(_) => {
                (StatusCode::INTERNAL_SERVER_ERROR, "internal_error")
            }
        }
    }
}

impl From<ValidationError> for AuthError {
    fn from(e: ValidationError) -> Self {
        Self::InvalidInput(e.to_string())
    }
}

impl From<sqlx::Error> for AuthError {
    fn from(e: sqlx::Error) -> Self {
        Self::Storage(e.to_string())
    }
}

/// Error response body.
#[derive(Debug, Serialize)]
struct AuthErrorResponse {
    error: String,
    code: &'static str,
}

impl IntoResponse for AuthError {
    fn into_response(self) -> Response {
        let (status, code) = self.status();

        // Internals stay in the log
        let error = if status.is_server_error() {
            tracing::error!(error = %self, "Request failed");
            "Internal server error".to_string()
        } else {
            self.to_string()
        };

        (status, Json(AuthErrorResponse { error, code })).into_response()
    }
}
