//! User storage backed by SQLite.

use std::path::Path;
use std::str::FromStr;

use chrono::{DateTime, Utc};
use sqlx::FromRow;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePool, SqlitePoolOptions};

use crate::auth::{AuthError, NewUser, User, UserId, UserRole};

const SCHEMA: &str = r"
CREATE TABLE IF NOT EXISTS users (
    id INTEGER PRIMARY KEY AUTOINCREMENT,
    name TEXT NOT NULL,
    email TEXT NOT NULL UNIQUE,
    password_hash TEXT NOT NULL,
    role TEXT NOT NULL DEFAULT 'USER',
    created_at TEXT NOT NULL
)
";

const USER_COLUMNS: &str = "id, name, email, password_hash, role, created_at";

#[derive(Debug, FromRow)]
struct UserRow {
    id: i64,
    name: String,
    email: String,
    password_hash: String,
    role: String,
    created_at: DateTime<Utc>,
}

impl TryFrom<UserRow> for User {
    type Error = AuthError;

    fn try_from(row: UserRow) -> Result<Self, Self::Error> {
        let role = UserRole::from_str(&row.role)
            .map_err(|_| AuthError::Storage(format!("Unknown role in store: {}", row.role)))?;

        Ok(Self {
            id: row.id,
            name: row.name,
            email: row.email,
            password_hash: row.password_hash,
            role,
            created_at: row.created_at,
        })
    }
}

/// Persistent user store.
///
/// Email uniqueness is enforced by the schema, so concurrent inserts of the
/// same email cannot both succeed.
#[derive(Debug, Clone)]
pub struct UserStore {
    pool: SqlitePool,
}

impl UserStore {
    /// Open (creating if needed) the database at `url` and apply the schema.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be opened or migrated.
    pub async fn connect(url: &str, max_connections: u32) -> Result<Self, AuthError> {
        let options = SqliteConnectOptions::from_str(url)
            .map_err(|e| AuthError::Storage(format!("Invalid database URL: {e}")))?
            .create_if_missing(true);

        if let Some(parent) = options.get_filename().parent() {
            if !parent.as_os_str().is_empty() {
                create_parent_dir(parent)?;
            }
        }

        let pool = SqlitePoolOptions::new()
            .max_connections(max_connections)
            .connect_with(options)
            .await
            .map_err(|e| AuthError::Storage(format!("Failed to open user database: {e}")))?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Private in-memory store, used by tests and throwaway gateways.
    ///
    /// # Errors
    ///
    /// Returns error if the database cannot be created.
    pub async fn in_memory() -> Result<Self, AuthError> {
        let options = SqliteConnectOptions::from_str("sqlite::memory:")
            .map_err(|e| AuthError::Storage(format!("Invalid database URL: {e}")))?;

        // Every connection to :memory: is a separate database; keep exactly one alive.
        let pool = SqlitePoolOptions::new()
            .max_connections(1)
            .min_connections(1)
            .idle_timeout(None)
            .max_lifetime(None)
            .connect_with(options)
            .await?;

        let store = Self { pool };
        store.migrate().await?;
        Ok(store)
    }

    /// Apply the schema. Idempotent.
    async fn migrate(&self) -> Result<(), AuthError> {
        sqlx::query(SCHEMA).execute(&self.pool).await?;
        Ok(())
    }

    /// Insert a user. The store assigns `id` and `created_at`.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserExists` if the email is taken.
    pub async fn create(&self, user: &NewUser) -> Result<User, AuthError> {
        let sql = format!(
            "INSERT INTO users (name, email, password_hash, role, created_at) \
             VALUES (?, ?, ?, ?, ?) RETURNING {USER_COLUMNS}"
        );

        let row: UserRow = sqlx::query_as(&sql)
            .bind(&user.name)
            .bind(&user.email)
            .bind(&user.password_hash)
            .bind(user.role.as_str())
            .bind(Utc::now())
            .fetch_one(&self.pool)
            .await
            .map_err(map_unique_violation)?;

        row.try_into()
    }

    /// Get a user by ID.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn get(&self, id: UserId) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE id = ?");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(id)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// Get a user by (normalized) email.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn get_by_email(&self, email: &str) -> Result<Option<User>, AuthError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users WHERE email = ?");

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(email)
            .fetch_optional(&self.pool)
            .await?
            .map(User::try_from)
            .transpose()
    }

    /// List all users in ID order.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn list(&self) -> Result<Vec<User>, AuthError> {
        let sql = format!("SELECT {USER_COLUMNS} FROM users ORDER BY id");

        sqlx::query_as::<_, UserRow>(&sql)
            .fetch_all(&self.pool)
            .await?
            .into_iter()
            .map(User::try_from)
            .collect()
    }

    /// Update name and/or email. `None` leaves a field unchanged.
    ///
    /// Returns `None` if the user does not exist.
    ///
    /// # Errors
    ///
    /// Returns `AuthError::UserExists` if the new email is taken.
    pub async fn update(
        &self,
        id: UserId,
        name: Option<&str>,
        email: Option<&str>,
    ) -> Result<Option<User>, AuthError> {
        let sql = format!(
            "UPDATE users SET name = COALESCE(?, name), email = COALESCE(?, email) \
             WHERE id = ? RETURNING {USER_COLUMNS}"
        );

        sqlx::query_as::<_, UserRow>(&sql)
            .bind(name)
            .bind(email)
            .bind(id)
            .fetch_optional(&self.pool)
            .await
            .map_err(map_unique_violation)?
            .map(User::try_from)
            .transpose()
    }

    /// Delete a user. Returns whether a row was removed.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn delete(&self, id: UserId) -> Result<bool, AuthError> {
        let result = sqlx::query("DELETE FROM users WHERE id = ?")
            .bind(id)
            .execute(&self.pool)
            .await?;

        Ok(result.rows_affected() > 0)
    }

    /// Count total users.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn count(&self) -> Result<i64, AuthError> {
        let (count,): (i64,) = sqlx::query_as("SELECT COUNT(*) FROM users")
            .fetch_one(&self.pool)
            .await?;
        Ok(count)
    }

    /// Check if any users exist.
    ///
    /// # Errors
    ///
    /// Returns error if storage fails.
    pub async fn is_empty(&self) -> Result<bool, AuthError> {
        Ok(self.count().await? == 0)
    }
}

fn create_parent_dir(parent: &Path) -> Result<(), AuthError> {
    std::fs::create_dir_all(parent).map_err(|e| {
        AuthError::Storage(format!(
            "Failed to create database directory {}: {e}",
            parent.display()
        ))
    })
}

fn map_unique_violation(e: sqlx::Error) -> AuthError {
    match e {
        sqlx::Error::Database(ref db) if db.is_unique_violation() => AuthError::UserExists,
        other => AuthError::from(other),
    }
}
