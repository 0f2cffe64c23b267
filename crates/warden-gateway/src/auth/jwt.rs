//! JWT token management.

use std::time::Duration;

use chrono::{DateTime, Utc};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, TokenData, Validation, decode, encode};
use rand::RngCore;
use serde::{Deserialize, Serialize};

use super::AuthError;
use super::users::{UserId, UserRole};

/// JWT claims.
///
/// `email` and `role` describe the subject at issuance only. Authorization
/// always re-reads the subject from the store.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Claims {
    /// Subject (user ID).
    pub sub: String,
    /// Email at issuance.
    pub email: String,
    /// Role at issuance.
    pub role: UserRole,
    /// Issued at (Unix timestamp).
    pub iat: i64,
    /// Expiration (Unix timestamp).
    pub exp: i64,
}

impl Claims {
    /// Parse the subject as a user ID.
    #[must_use]
    pub fn user_id(&self) -> Option<UserId> {
        self.sub.parse().ok()
    }
}

/// JWT manager for creating and validating tokens.
pub struct JwtManager {
    encoding_key: EncodingKey,
    decoding_key: DecodingKey,
    expiry: Duration,
}

impl JwtManager {
    /// Create a new JWT manager with a secret key.
    #[must_use]
    pub fn new(secret: &[u8], expiry: Duration) -> Self {
        Self {
            encoding_key: EncodingKey::from_secret(secret),
            decoding_key: DecodingKey::from_secret(secret),
            expiry,
        }
    }

    /// Generate a random 256-bit secret as hex string.
    #[must_use]
    pub fn generate_hex_secret() -> String {
        let mut bytes = [0u8; 32];
        rand::thread_rng().fill_bytes(&mut bytes);
        hex::encode(bytes)
    }

    /// Create a token for a user.
    ///
    /// # Errors
    ///
    /// Returns error if token encoding fails.
    pub fn create_token(
        &self,
        user_id: UserId,
        email: &str,
        role: UserRole,
    ) -> Result<(String, DateTime<Utc>), AuthError> {
        let now = Utc::now();
        let lifetime = chrono::Duration::from_std(self.expiry)
            .map_err(|e| AuthError::Config(format!("Token expiry out of range: {e}")))?;
        let exp = now + lifetime;

        let claims = Claims {
            sub: user_id.to_string(),
            email: email.to_string(),
            role,
            iat: now.timestamp(),
            exp: exp.timestamp(),
        };

        let token = self.encode(&claims)?;
        Ok((token, exp))
    }

    fn encode(&self, claims: &Claims) -> Result<String, AuthError> {
        encode(&Header::default(), claims, &self.encoding_key)
            .map_err(|e| AuthError::Token(format!("Encoding failed: {e}")))
    }

    /// Validate signature and expiry, then decode.
    ///
    /// # Errors
    ///
    /// Returns error if token is invalid or expired.
    pub fn validate_token(&self, token: &str) -> Result<Claims, AuthError> {
        let validation = Validation::default();

        let token_data: TokenData<Claims> = decode(token, &self.decoding_key, &validation)
            .map_err(|e| AuthError::Token(format!("Validation failed: {e}")))?;

        Ok(token_data.claims)
    }

    /// Extract token from Authorization header.
    ///
    /// Expects format: "Bearer <token>"
    #[must_use]
    pub fn extract_from_header(header: &str) -> Option<&str> {
        header
            .strip_prefix("Bearer ")
            .or_else(|| header.strip_prefix("bearer "))
            .map(str::trim)
            .filter(|token| !token.is_empty() && !token.contains(' '))
    }
}

impl std::fmt::Debug for JwtManager {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("JwtManager")
            .field("expiry", &self.expiry)
            .finish_non_exhaustive()
    }
}
