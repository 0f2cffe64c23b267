//! HTTP routes.

mod auth;
mod users;

use axum::Router;

use crate::server::GatewayState;

/// All API routes, without state or layers.
pub fn api() -> Router<GatewayState> {
    Router::new().merge(auth::router()).merge(users::router())
}
