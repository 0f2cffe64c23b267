//! Authentication extractors for axum.

use std::sync::Arc;

use axum::{
    extract::{FromRef, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use warden_core::{AuthConfig, MAX_TOKEN_EXPIRY_HOURS, MasterKey};

use super::AuthError;
use super::jwt::JwtManager;
use super::strategy::{AuthMode, MasterKeyStrategy, PasswordStrategy, Strategy};
use super::users::{PublicUser, UserRole};
use crate::store::UserStore;

/// Shared authentication state.
pub struct AuthState {
    /// Auth configuration.
    pub config: AuthConfig,
    /// JWT manager.
    pub jwt: JwtManager,
    /// User store.
    pub users: UserStore,
    master_key: Option<MasterKey>,
}

impl AuthState {
    /// Initialize auth state, generating a JWT secret if none is configured.
    ///
    /// A generated secret lives only as long as the process, so tokens do
    /// not survive a restart.
    ///
    /// # Errors
    ///
    /// Returns error if initialization fails.
    pub fn initialize(mut config: AuthConfig, users: UserStore) -> Result<Self, AuthError> {
        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&config.token_expiry_hours) {
            return Err(AuthError::Config(format!(
                "tokenExpiryHours must be between 1 and {MAX_TOKEN_EXPIRY_HOURS}"
            )));
        }

        let jwt_secret = match config.jwt_secret.as_deref().filter(|s| !s.is_empty()) {
            Some(secret) => secret.to_string(),
            None => {
                tracing::warn!(
                    "No JWT secret configured; generated an ephemeral one. Tokens will not survive a restart"
                );
                let secret = JwtManager::generate_hex_secret();
                config.jwt_secret = Some(secret.clone());
                secret
            }
        };

        let master_key = config
            .master_key
            .as_deref()
            .filter(|k| !k.is_empty())
            .map(MasterKey::new);
        if master_key.is_none() {
            tracing::info!("No master key configured; admin registration and master login are disabled");
        }

        let jwt = JwtManager::new(jwt_secret.as_bytes(), config.token_expiry());

        Ok(Self {
            config,
            jwt,
            users,
            master_key,
        })
    }

    /// The configured master key, if any.
    #[must_use]
    pub const fn master_key(&self) -> Option<&MasterKey> {
        self.master_key.as_ref()
    }

    /// Login strategy for the requested mode.
    #[must_use]
    pub fn strategy(&self, mode: AuthMode) -> Strategy<'_> {
        match mode {
            AuthMode::Password => Strategy::Password(PasswordStrategy::new(&self.users, &self.jwt)),
            AuthMode::Master => {
                Strategy::MasterKey(MasterKeyStrategy::new(self.master_key(), &self.jwt))
            }
        }
    }

    /// Resolve a token to the subject's current record.
    ///
    /// Returns `None` if the signature or expiry check fails, the subject is
    /// missing, or the subject no longer exists. Role and email embedded in
    /// the token are ignored.
    ///
    /// # Errors
    ///
    /// Returns error only if the store lookup fails.
    pub async fn validate_token(&self, token: &str) -> Result<Option<PublicUser>, AuthError> {
        let claims = match self.jwt.validate_token(token) {
            Ok(claims) => claims,
            Err(e) => {
                tracing::debug!(error = %e, "Rejected bearer token");
                return Ok(None);
            }
        };

        let Some(user_id) = claims.user_id() else {
            tracing::debug!(sub = %claims.sub, "Token subject is not a user id");
            return Ok(None);
        };

        let user = self.users.get(user_id).await?;
        if user.is_none() {
            tracing::debug!(user_id, "Token subject no longer exists");
        }

        Ok(user.map(|u| u.to_public()))
    }
}

impl std::fmt::Debug for AuthState {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("AuthState")
            .field("config", &self.config)
            .field("jwt", &self.jwt)
            .field("master_key", &self.master_key)
            .finish_non_exhaustive()
    }
}

/// Check the resolved user's role.
///
/// # Errors
///
/// Returns `Unauthenticated` if no user was resolved, `Forbidden` if the
/// role does not match.
pub fn ensure_role(user: Option<&PublicUser>, required: UserRole) -> Result<(), AuthError> {
    let user = user.ok_or_else(|| AuthError::Unauthenticated("Not authenticated".to_string()))?;

    if user.role == required {
        Ok(())
    } else {
        Err(AuthError::Forbidden(format!("{required} role required")))
    }
}

/// Extractor for authenticated requests.
///
/// Resolves the bearer token to the user's current record.
#[derive(Debug, Clone)]
pub struct CurrentUser(pub PublicUser);

impl<S> FromRequestParts<S> for CurrentUser
where
    S: Send + Sync,
    Arc<AuthState>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        if let Some(user) = parts.extensions.get::<PublicUser>() {
            return Ok(Self(user.clone()));
        }

        let auth_state = Arc::<AuthState>::from_ref(state);

        let auth_header = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|v| v.to_str().ok())
            .ok_or_else(|| AuthError::Unauthenticated("Missing Authorization header".to_string()))?;

        let token = JwtManager::extract_from_header(auth_header).ok_or_else(|| {
            AuthError::Unauthenticated("Invalid Authorization header format".to_string())
        })?;

        let user = auth_state
            .validate_token(token)
            .await?
            .ok_or_else(|| AuthError::Unauthenticated("Invalid or expired token".to_string()))?;

        parts.extensions.insert(user.clone());
        Ok(Self(user))
    }
}

/// Require admin role extractor.
#[derive(Debug, Clone)]
pub struct RequireAdmin(pub PublicUser);

impl<S> FromRequestParts<S> for RequireAdmin
where
    S: Send + Sync,
    Arc<AuthState>: FromRef<S>,
{
    type Rejection = AuthError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let CurrentUser(user) = CurrentUser::from_request_parts(parts, state).await?;
        ensure_role(Some(&user), UserRole::Admin)?;
        Ok(Self(user))
    }
}

#[cfg(test)]
mod tests {
    use chrono::Utc;

    use super::*;
    use crate::auth::{MASTER_USER_ID, NewUser};

    fn public(role: UserRole) -> PublicUser {
        PublicUser {
            id: 1,
            name: "Ana".to_string(),
            email: "a@x.com".to_string(),
            role,
            created_at: Utc::now(),
        }
    }

    async fn state() -> AuthState {
        let config = AuthConfig::builder()
            .jwt_secret("test-secret")
            .master_key("K")
            .build();
        AuthState::initialize(config, UserStore::in_memory().await.unwrap()).unwrap()
    }

    #[test]
    fn test_ensure_role() {
        assert!(ensure_role(Some(&public(UserRole::Admin)), UserRole::Admin).is_ok());
        assert!(matches!(
            ensure_role(Some(&public(UserRole::User)), UserRole::Admin),
            Err(AuthError::Forbidden(_))
        ));
        assert!(matches!(
            ensure_role(None, UserRole::Admin),
            Err(AuthError::Unauthenticated(_))
        ));
    }

    #[tokio::test]
    async fn test_generates_missing_secret() {
        let store = UserStore::in_memory().await.unwrap();
        let state = AuthState::initialize(AuthConfig::default(), store).unwrap();

        assert_eq!(state.config.jwt_secret.as_ref().map(String::len), Some(64));
        assert!(state.master_key().is_none());
    }

    #[tokio::test]
    async fn test_rejects_out_of_range_expiry() {
        for hours in [0, MAX_TOKEN_EXPIRY_HOURS + 1, u64::MAX] {
            let config = AuthConfig::builder()
                .jwt_secret("test-secret")
                .token_expiry_hours(hours)
                .build();
            let store = UserStore::in_memory().await.unwrap();
            assert!(matches!(
                AuthState::initialize(config, store),
                Err(AuthError::Config(_))
            ));
        }
    }

    #[tokio::test]
    async fn test_validate_token_refetches_user() {
        let state = state().await;
        let user = state
            .users
            .create(&NewUser {
                name: "Ana".to_string(),
                email: "a@x.com".to_string(),
                password_hash: "$argon2id$placeholder".to_string(),
                role: UserRole::User,
            })
            .await
            .unwrap();

        // Role in the token says ADMIN; the store says USER
        let (token, _) = state
            .jwt
            .create_token(user.id, &user.email, UserRole::Admin)
            .unwrap();

        let resolved = state.validate_token(&token).await.unwrap().unwrap();
        assert_eq!(resolved.id, user.id);
        assert_eq!(resolved.role, UserRole::User);

        state.users.delete(user.id).await.unwrap();
        assert!(state.validate_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_validate_token_rejects_garbage() {
        let state = state().await;
        assert!(state.validate_token("garbage").await.unwrap().is_none());

        let foreign = JwtManager::new(b"other", std::time::Duration::from_secs(60));
        let (token, _) = foreign.create_token(1, "a@x.com", UserRole::User).unwrap();
        assert!(state.validate_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_master_subject_does_not_resolve() {
        let state = state().await;
        let (token, _) = state
            .jwt
            .create_token(MASTER_USER_ID, "master", UserRole::Admin)
            .unwrap();

        assert!(state.validate_token(&token).await.unwrap().is_none());
    }

    #[tokio::test]
    async fn test_strategy_selection() {
        let state = state().await;
        assert!(matches!(
            state.strategy(AuthMode::Password),
            Strategy::Password(_)
        ));
        assert!(matches!(
            state.strategy(AuthMode::Master),
            Strategy::MasterKey(_)
        ));
    }
}
