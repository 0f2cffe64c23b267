//! User model.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use super::AuthError;

/// Store-assigned user identifier.
pub type UserId = i64;

/// Subject of master-key sessions. Never assigned by the store.
pub const MASTER_USER_ID: UserId = 0;

/// User role for access control.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum UserRole {
    /// Regular account. Can see and edit only itself.
    #[default]
    User,
    /// Full administrative access.
    Admin,
}

impl UserRole {
    /// Check if this role has admin privileges.
    #[must_use]
    pub const fn is_admin(self) -> bool {
        matches!(self, Self::Admin)
    }

    /// Canonical string form, as stored and serialized.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::User => "USER",
            Self::Admin => "ADMIN",
        }
    }
}

impl std::fmt::Display for UserRole {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}

impl std::str::FromStr for UserRole {
    type Err = AuthError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_uppercase().as_str() {
            "USER" => Ok(Self::User),
            "ADMIN" => Ok(Self::Admin),
            _ => Err(AuthError::InvalidInput(format!("Unknown role: {s}"))),
        }
    }
}

/// User account as persisted.
#[derive(Debug, Clone)]
pub struct User {
    /// Store-assigned ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Lowercased, unique email.
    pub email: String,
    /// Argon2 PHC hash. Never leaves the gateway.
    pub password_hash: String,
    /// User role.
    pub role: UserRole,
    /// When the user registered.
    pub created_at: DateTime<Utc>,
}

impl User {
    /// Project to the public representation (no password hash).
    #[must_use]
    pub fn to_public(&self) -> PublicUser {
        PublicUser {
            id: self.id,
            name: self.name.clone(),
            email: self.email.clone(),
            role: self.role,
            created_at: self.created_at,
        }
    }
}

/// Fields for inserting a user. The store assigns `id` and `created_at`.
#[derive(Debug, Clone)]
pub struct NewUser {
    /// Display name.
    pub name: String,
    /// Normalized email.
    pub email: String,
    /// Argon2 PHC hash.
    pub password_hash: String,
    /// Initial role.
    pub role: UserRole,
}

/// Public user representation (for API responses).
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PublicUser {
    /// User ID.
    pub id: UserId,
    /// Display name.
    pub name: String,
    /// Email address.
    pub email: String,
    /// User role.
    pub role: UserRole,
    /// When created.
    pub created_at: DateTime<Utc>,
}

impl PublicUser {
    /// Pseudo-admin identity for master-key sessions. Never persisted.
    #[must_use]
    pub fn master(email: &str) -> Self {
        let email = if email.trim().is_empty() {
            "master".to_string()
        } else {
            email.trim().to_string()
        };

        Self {
            id: MASTER_USER_ID,
            name: "Master".to_string(),
            email,
            role: UserRole::Admin,
            created_at: Utc::now(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_parsing() {
        assert_eq!("admin".parse::<UserRole>().unwrap(), UserRole::Admin);
        assert_eq!("USER".parse::<UserRole>().unwrap(), UserRole::User);
        assert!("operator".parse::<UserRole>().is_err());
        assert_eq!(UserRole::default(), UserRole::User);
    }

    #[test]
    fn test_role_serialization() {
        assert_eq!(serde_json::to_string(&UserRole::Admin).unwrap(), "\"ADMIN\"");
        let parsed: UserRole = serde_json::from_str("\"USER\"").unwrap();
        assert_eq!(parsed, UserRole::User);
    }

    #[test]
    fn test_public_projection_has_no_password() {
        let user = User {
            id: 7,
            name: "Ana".to_string(),
            email: "ana@x.com".to_string(),
            password_hash: "$argon2id$secret".to_string(),
            role: UserRole::User,
            created_at: Utc::now(),
        };

        let json = serde_json::to_value(user.to_public()).unwrap();
        assert_eq!(json["id"], 7);
        assert_eq!(json["email"], "ana@x.com");
        assert_eq!(json["role"], "USER");
        assert!(json.get("passwordHash").is_none());
        assert!(json.get("password").is_none());
        assert!(!json.to_string().contains("argon2"));
    }

    #[test]
    fn test_master_identity() {
        let master = PublicUser::master("ops@x.com");
        assert_eq!(master.id, MASTER_USER_ID);
        assert_eq!(master.role, UserRole::Admin);
        assert_eq!(master.email, "ops@x.com");

        assert_eq!(PublicUser::master("  ").email, "master");
    }
}
