//! # Warden Gateway
//!
//! HTTP API for registration, login, and role-gated user management.
//!
//! Tokens are HS256 JWTs. Every protected request re-reads the token's
//! subject from the store, so deletions and role changes apply immediately.

#![forbid(unsafe_code)]
#![warn(missing_docs)]

/// Authentication and authorization.
pub mod auth;
mod routes;
mod server;
/// Registration, login, and user management services.
pub mod services;
/// SQLite-backed user storage.
pub mod store;

pub use auth::{AuthError, AuthMode, AuthState, PublicUser, UserRole};
pub use server::{Gateway, GatewayState, build_router};
pub use services::{AuthService, UserService, UserUpdate};
pub use store::UserStore;

use warden_core::Config;

/// Connect the configured store and run the gateway until Ctrl-C.
///
/// # Errors
///
/// Returns error if server fails to start.
pub async fn start(config: Config) -> Result<(), GatewayError> {
    let gateway = Gateway::connect(config).await?;
    gateway.run().await
}

/// Gateway errors.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Server error.
    #[error("Server error: {0}")]
    Server(String),

    /// Configuration error.
    #[error("Config error: {0}")]
    Config(String),

    /// Auth or storage initialization failed.
    #[error(transparent)]
    Auth(#[from] AuthError),

    /// IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
