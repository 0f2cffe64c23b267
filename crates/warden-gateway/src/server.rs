//! Gateway server.

use std::net::{IpAddr, SocketAddr};
use std::sync::Arc;

use axum::{Router, extract::FromRef, routing::get};
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use warden_core::Config;

use crate::GatewayError;
use crate::auth::AuthState;
use crate::routes;
use crate::services::{AuthService, UserService};
use crate::store::UserStore;

/// State shared across handlers.
#[derive(Debug, Clone)]
pub struct GatewayState {
    /// Authentication state.
    pub auth: Arc<AuthState>,
    /// Registration and login.
    pub auth_service: AuthService,
    /// User CRUD.
    pub users: UserService,
}

impl GatewayState {
    /// Build handler state from initialized auth state.
    #[must_use]
    pub fn new(auth: Arc<AuthState>) -> Self {
        Self {
            auth_service: AuthService::new(Arc::clone(&auth)),
            users: UserService::new(auth.users.clone()),
            auth,
        }
    }
}

impl FromRef<GatewayState> for Arc<AuthState> {
    fn from_ref(state: &GatewayState) -> Self {
        Arc::clone(&state.auth)
    }
}

/// Build the application router.
pub fn build_router(state: GatewayState, cors: bool) -> Router {
    let app = Router::new()
        .route("/", get(root_handler))
        .route("/health", get(health_handler))
        .merge(routes::api())
        .with_state(state)
        .layer(TraceLayer::new_for_http());

    if cors {
        app.layer(CorsLayer::permissive())
    } else {
        app
    }
}

async fn root_handler() -> &'static str {
    "API running"
}

async fn health_handler() -> &'static str {
    "OK"
}

/// Gateway server.
#[derive(Debug)]
pub struct Gateway {
    config: Config,
    state: GatewayState,
}

impl Gateway {
    /// Open the configured database and initialize auth.
    ///
    /// # Errors
    ///
    /// Returns error if the store cannot be opened or auth cannot be initialized.
    pub async fn connect(config: Config) -> Result<Self, GatewayError> {
        let store =
            UserStore::connect(&config.database.url, config.database.max_connections).await?;
        Self::with_store(config, store)
    }

    /// Build a gateway over an existing store.
    ///
    /// # Errors
    ///
    /// Returns error if auth cannot be initialized.
    pub fn with_store(config: Config, store: UserStore) -> Result<Self, GatewayError> {
        let auth = AuthState::initialize(config.auth.clone(), store)?;
        let state = GatewayState::new(Arc::new(auth));
        Ok(Self { config, state })
    }

    /// Handler state.
    #[must_use]
    pub const fn state(&self) -> &GatewayState {
        &self.state
    }

    /// The application router, ready to serve.
    #[must_use]
    pub fn router(&self) -> Router {
        build_router(self.state.clone(), self.config.gateway.cors)
    }

    fn socket_addr(&self) -> Result<SocketAddr, GatewayError> {
        let ip: IpAddr = self.config.gateway.bind_address.parse().map_err(|e| {
            GatewayError::Config(format!(
                "Invalid bind address '{}': {e}",
                self.config.gateway.bind_address
            ))
        })?;
        Ok(SocketAddr::new(ip, self.config.gateway.port))
    }

    /// Run the gateway until Ctrl-C.
    ///
    /// # Errors
    ///
    /// Returns error if the address is invalid or the listener fails.
    pub async fn run(&self) -> Result<(), GatewayError> {
        let addr = self.socket_addr()?;

        let listener = tokio::net::TcpListener::bind(addr).await?;
        tracing::info!("Gateway API listening on http://{}", addr);

        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown_signal())
            .await
            .map_err(|e| GatewayError::Server(e.to_string()))?;

        tracing::info!("Gateway stopped");
        Ok(())
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}

#[cfg(test)]
mod tests {
    use axum::body::Body;
    use axum::http::{Request, StatusCode};
    use tower::ServiceExt;

    use super::*;

    async fn gateway() -> Gateway {
        let store = UserStore::in_memory().await.unwrap();
        Gateway::with_store(Config::default(), store).unwrap()
    }

    async fn get_text(app: Router, uri: &str) -> (StatusCode, String) {
        let response = app
            .oneshot(Request::get(uri).body(Body::empty()).unwrap())
            .await
            .unwrap();
        let status = response.status();
        let body = axum::body::to_bytes(response.into_body(), usize::MAX)
            .await
            .unwrap();
        (status, String::from_utf8(body.to_vec()).unwrap())
    }

    #[tokio::test]
    async fn test_root_and_health() {
        let gateway = gateway().await;

        assert_eq!(
            get_text(gateway.router(), "/").await,
            (StatusCode::OK, "API running".to_string())
        );
        assert_eq!(
            get_text(gateway.router(), "/health").await,
            (StatusCode::OK, "OK".to_string())
        );
    }

    #[tokio::test]
    async fn test_socket_addr() {
        let mut config = Config::default();
        config.gateway.bind_address = "::1".to_string();
        config.gateway.port = 8080;
        let store = UserStore::in_memory().await.unwrap();
        let gateway = Gateway::with_store(config, store).unwrap();
        assert_eq!(
            gateway.socket_addr().unwrap(),
            "[::1]:8080".parse::<SocketAddr>().unwrap()
        );

        let mut config = Config::default();
        config.gateway.bind_address = "localhost".to_string();
        let store = UserStore::in_memory().await.unwrap();
        let gateway = Gateway::with_store(config, store).unwrap();
        assert!(matches!(gateway.socket_addr(), Err(GatewayError::Config(_))));
    }

    #[tokio::test]
    async fn test_unknown_route() {
        let gateway = gateway().await;
        let (status, _) = get_text(gateway.router(), "/nope").await;
        assert_eq!(status, StatusCode::NOT_FOUND);
    }

    #[tokio::test]
    async fn test_cors_headers() {
        let gateway = gateway().await;
        let response = gateway
            .router()
            .oneshot(
                Request::get("/health")
                    .header("origin", "http://example.com")
                    .body(Body::empty())
                    .unwrap(),
            )
            .await
            .unwrap();

        assert!(
            response
                .headers()
                .contains_key("access-control-allow-origin")
        );
    }
}
