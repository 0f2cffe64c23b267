//! Login strategies.
//!
//! Two ways to obtain a token:
//! - `PasswordStrategy`: stored email and password hash
//! - `MasterKeyStrategy`: the configured master key, yielding a pseudo-admin
//!
//! The caller picks one per request with [`AuthMode`]. Strategies borrow
//! the shared state and hold nothing mutable.

use async_trait::async_trait;
use serde::Serialize;
use warden_core::{MasterKey, normalize_email};

use super::AuthError;
use super::jwt::JwtManager;
use super::password::verify_password;
use super::users::PublicUser;
use crate::store::UserStore;

/// Which credential a login request carries.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum AuthMode {
    /// Email and password.
    #[default]
    Password,
    /// Master key in the secret position.
    Master,
}

impl AuthMode {
    /// Select a mode from the optional `mode` request field.
    ///
    /// Only the exact string `"master"` selects the master-key strategy.
    #[must_use]
    pub fn from_flag(flag: Option<&str>) -> Self {
        match flag {
            Some("master") => Self::Master,
            _ => Self::Password,
        }
    }
}

/// Successful login.
#[derive(Debug, Clone, Serialize)]
pub struct LoginResponse {
    /// Signed bearer token.
    pub token: String,
    /// The authenticated identity.
    pub user: PublicUser,
}

/// A way of turning credentials into a signed token.
#[async_trait]
pub trait AuthStrategy: Send + Sync {
    /// Authenticate `identifier`/`secret` and issue a token.
    async fn authenticate(&self, identifier: &str, secret: &str)
    -> Result<LoginResponse, AuthError>;
}

/// Email/password login against the user store.
#[derive(Debug)]
pub struct PasswordStrategy<'a> {
    users: &'a UserStore,
    jwt: &'a JwtManager,
}

impl<'a> PasswordStrategy<'a> {
    /// Create a password strategy.
    #[must_use]
    pub const fn new(users: &'a UserStore, jwt: &'a JwtManager) -> Self {
        Self { users, jwt }
    }
}

#[async_trait]
impl AuthStrategy for PasswordStrategy<'_> {
    async fn authenticate(&self, email: &str, password: &str) -> Result<LoginResponse, AuthError> {
        // Unknown email and wrong password must look the same to the caller
        let email = normalize_email(email).map_err(|_| AuthError::InvalidCredentials)?;

        let user = self
            .users
            .get_by_email(&email)
            .await?
            .ok_or(AuthError::InvalidCredentials)?;

        verify_password(password, &user.password_hash)?;

        let (token, _) = self.jwt.create_token(user.id, &user.email, user.role)?;

        Ok(LoginResponse {
            token,
            user: user.to_public(),
        })
    }
}

/// Master-key login. Issues a token for a non-persisted admin identity.
#[derive(Debug)]
pub struct MasterKeyStrategy<'a> {
    master_key: Option<&'a MasterKey>,
    jwt: &'a JwtManager,
}

impl<'a> MasterKeyStrategy<'a> {
    /// Create a master-key strategy. With no key configured every attempt fails.
    #[must_use]
    pub const fn new(master_key: Option<&'a MasterKey>, jwt: &'a JwtManager) -> Self {
        Self { master_key, jwt }
    }
}

#[async_trait]
impl AuthStrategy for MasterKeyStrategy<'_> {
    async fn authenticate(&self, identifier: &str, key: &str) -> Result<LoginResponse, AuthError> {
        let verified = self.master_key.is_some_and(|master| master.verify(key));
        if !verified {
            return Err(AuthError::InvalidMasterKey);
        }

        let user = PublicUser::master(identifier);
        let (token, _) = self.jwt.create_token(user.id, &user.email, user.role)?;

        Ok(LoginResponse { token, user })
    }
}

/// Strategy chosen for a single request.
#[derive(Debug)]
pub enum Strategy<'a> {
    /// Email/password.
    Password(PasswordStrategy<'a>),
    /// Master key.
    MasterKey(MasterKeyStrategy<'a>),
}

#[async_trait]
impl AuthStrategy for Strategy<'_> {
    async fn authenticate(&self, identifier: &str, secret: &str) -> Result<LoginResponse, AuthError> {
        match self {
            Self::Password(s) => s.authenticate(identifier, secret).await,
            Self::MasterKey(s) => s.authenticate(identifier, secret).await,
        }
    }
}
