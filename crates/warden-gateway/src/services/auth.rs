//! Registration and login.

use std::sync::Arc;

use warden_core::{ValidationError, normalize_email, normalize_name};

use crate::auth::{
    AuthError, AuthMode, AuthState, AuthStrategy, LoginResponse, NewUser, PublicUser, UserRole,
    hash_password,
};

/// Registration and login orchestration.
#[derive(Debug, Clone)]
pub struct AuthService {
    auth: Arc<AuthState>,
}

impl AuthService {
    /// Create an auth service over shared auth state.
    #[must_use]
    pub const fn new(auth: Arc<AuthState>) -> Self {
        Self { auth }
    }

    /// Role granted to a registration carrying an optional master key.
    ///
    /// No key (or an empty one) means `USER`; the configured key means `ADMIN`.
    ///
    /// # Errors
    ///
    /// Returns `InvalidMasterKey` for any other key, including when none is configured.
    pub fn registration_role(&self, master_key: Option<&str>) -> Result<UserRole, AuthError> {
        let Some(candidate) = master_key.filter(|k| !k.is_empty()) else {
            return Ok(UserRole::User);
        };

        match self.auth.master_key() {
            Some(key) if key.verify(candidate) => Ok(UserRole::Admin),
            _ => {
                tracing::warn!("Registration rejected: invalid master key");
                Err(AuthError::InvalidMasterKey)
            }
        }
    }

    /// Register a new user with the given role.
    ///
    /// The role is trusted; callers grant `ADMIN` only after
    /// [`registration_role`](Self::registration_role).
    ///
    /// # Errors
    ///
    /// Returns `InvalidInput` for empty or malformed fields and `UserExists`
    /// if the email is taken.
    pub async fn register(
        &self,
        name: &str,
        email: &str,
        password: &str,
        role: UserRole,
    ) -> Result<PublicUser, AuthError> {
        let name = normalize_name(name)?;
        let email = normalize_email(email)?;
        if password.is_empty() {
            return Err(ValidationError::Required("password").into());
        }

        if self.auth.users.get_by_email(&email).await?.is_some() {
            return Err(AuthError::UserExists);
        }

        let password_hash = hash_password(password)?;
        let user = self
            .auth
            .users
            .create(&NewUser {
                name,
                email,
                password_hash,
                role,
            })
            .await?;

        tracing::info!(user_id = user.id, role = %user.role, "Registered user");
        Ok(user.to_public())
    }

    /// Log in with the strategy selected by `mode`.
    ///
    /// # Errors
    ///
    /// Returns the strategy's failure, e.g. `InvalidCredentials`.
    pub async fn login(
        &self,
        mode: AuthMode,
        identifier: &str,
        secret: &str,
    ) -> Result<LoginResponse, AuthError> {
        match self.auth.strategy(mode).authenticate(identifier, secret).await {
            Ok(response) => {
                tracing::info!(user_id = response.user.id, ?mode, "Login succeeded");
                Ok(response)
            }
            Err(e) => {
                tracing::warn!(?mode, error = %e, "Login failed");
                Err(e)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use warden_core::AuthConfig;

    use super::*;
    use crate::store::UserStore;

    async fn service() -> AuthService {
        let config = AuthConfig::builder()
            .jwt_secret("test-secret")
            .master_key("K")
            .build();
        let state = AuthState::initialize(config, UserStore::in_memory().await.unwrap()).unwrap();
        AuthService::new(Arc::new(state))
    }

    #[tokio::test]
    async fn test_register_normalizes_and_hides_hash() {
        let service = service().await;
        let user = service
            .register(" Ana ", " A@X.COM ", "pw", UserRole::User)
            .await
            .unwrap();

        assert_eq!(user.name, "Ana");
        assert_eq!(user.email, "a@x.com");
        assert_eq!(user.role, UserRole::User);

        let stored = service.auth.users.get(user.id).await.unwrap().unwrap();
        assert_ne!(stored.password_hash, "pw");
        assert!(stored.password_hash.starts_with("$argon2"));
    }

    #[tokio::test]
    async fn test_register_rejects_empty_fields() {
        let service = service().await;

        for (name, email, password) in [
            ("", "a@x.com", "pw"),
            ("A", "", "pw"),
            ("A", "a@x.com", ""),
        ] {
            let result = service
                .register(name, email, password, UserRole::User)
                .await;
            assert!(matches!(result, Err(AuthError::InvalidInput(_))));
        }
        assert_eq!(service.auth.users.count().await.unwrap(), 0);
    }

    #[tokio::test]
    async fn test_register_duplicate_email() {
        let service = service().await;
        service
            .register("A", "a@x.com", "pw", UserRole::User)
            .await
            .unwrap();

        let result = service
            .register("B", "A@x.com", "other", UserRole::User)
            .await;
        assert!(matches!(result, Err(AuthError::UserExists)));
        assert_eq!(service.auth.users.count().await.unwrap(), 1);
    }

    #[tokio::test]
    async fn test_registration_role() {
        let service = service().await;
        assert_eq!(service.registration_role(None).unwrap(), UserRole::User);
        assert_eq!(service.registration_role(Some("")).unwrap(), UserRole::User);
        assert_eq!(service.registration_role(Some("K")).unwrap(), UserRole::Admin);
        assert!(matches!(
            service.registration_role(Some("nope")),
            Err(AuthError::InvalidMasterKey)
        ));
    }

    #[tokio::test]
    async fn test_registration_role_without_master_key() {
        let config = AuthConfig::builder().jwt_secret("test-secret").build();
        let state = AuthState::initialize(config, UserStore::in_memory().await.unwrap()).unwrap();
        let service = AuthService::new(Arc::new(state));

        assert!(matches!(
            service.registration_role(Some("anything")),
            Err(AuthError::InvalidMasterKey)
        ));
    }

    #[tokio::test]
    async fn test_login_modes() {
        let service = service().await;
        let user = service
            .register("A", "a@x.com", "pw", UserRole::User)
            .await
            .unwrap();

        let response = service
            .login(AuthMode::Password, "a@x.com", "pw")
            .await
            .unwrap();
        assert_eq!(response.user.id, user.id);

        let master = service
            .login(AuthMode::Master, "ops@x.com", "K")
            .await
            .unwrap();
        assert_eq!(master.user.role, UserRole::Admin);

        assert!(matches!(
            service.login(AuthMode::Password, "a@x.com", "K").await,
            Err(AuthError::InvalidCredentials)
        ));
        assert!(matches!(
            service.login(AuthMode::Master, "a@x.com", "pw").await,
            Err(AuthError::InvalidMasterKey)
        ));
    }
}
