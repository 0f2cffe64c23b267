//! Configuration loading and validation.
//!
//! Config is read from a JSON5 file and then overlaid with `WARDEN_*`
//! environment variables. Location: `~/.warden/warden.json`

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;

/// Default access token lifetime in hours.
const DEFAULT_TOKEN_EXPIRY_HOURS: u64 = 8;
/// Upper bound on access token lifetime (30 days).
pub const MAX_TOKEN_EXPIRY_HOURS: u64 = 720;

/// Configuration errors.
#[derive(Error, Debug)]
pub enum ConfigError {
    /// IO error reading config file.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    /// JSON5 parsing error.
    #[error("Parse error: {0}")]
    Parse(#[from] json5::Error),

    /// Config validation error.
    #[error("Validation error: {0}")]
    Validation(String),
}

/// Main configuration structure.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Config {
    /// HTTP listener configuration.
    #[serde(default)]
    pub gateway: GatewayConfig,

    /// Credential store configuration.
    #[serde(default)]
    pub database: DatabaseConfig,

    /// Token and bootstrap-secret configuration.
    #[serde(default)]
    pub auth: AuthConfig,
}

impl Config {
    /// Load configuration from the default location.
    ///
    /// Falls back to defaults when no file exists.
    ///
    /// # Errors
    ///
    /// Returns error if the file exists but cannot be read or parsed.
    pub fn load_default() -> Result<Self, ConfigError> {
        let path = Self::default_path();
        if path.exists() {
            Self::load(&path)
        } else {
            Ok(Self::default())
        }
    }

    /// Load configuration from a specific path.
    ///
    /// # Errors
    ///
    /// Returns error if file cannot be read, parsed, or fails validation.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path)?;
        let config: Self = json5::from_str(&content)?;
        config.validate()?;
        Ok(config)
    }

    /// Save configuration to a path.
    ///
    /// # Errors
    ///
    /// Returns error if serialization or file write fails.
    pub fn save(&self, path: &Path) -> Result<(), ConfigError> {
        if let Some(parent) = path.parent() {
            std::fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string_pretty(self)
            .map_err(|e| ConfigError::Validation(e.to_string()))?;
        std::fs::write(path, content)?;
        Ok(())
    }

    /// Get the default config file path.
    #[must_use]
    pub fn default_path() -> PathBuf {
        Self::state_dir().join("warden.json")
    }

    /// Get the Warden state directory.
    ///
    /// Uses `WARDEN_STATE_DIR` env var if set, otherwise `~/.warden`.
    #[must_use]
    pub fn state_dir() -> PathBuf {
        if let Ok(dir) = std::env::var("WARDEN_STATE_DIR") {
            PathBuf::from(dir)
        } else if let Some(home) = dirs::home_dir() {
            home.join(".warden")
        } else {
            PathBuf::from(".warden")
        }
    }

    /// Apply overrides from the process environment.
    #[must_use]
    pub fn with_env_overrides(self) -> Self {
        self.with_overrides(|key| std::env::var(key).ok())
    }

    /// Apply `WARDEN_*` overrides read through `lookup`.
    ///
    /// Numeric values that fail to parse are ignored.
    #[must_use]
    pub fn with_overrides(mut self, lookup: impl Fn(&str) -> Option<String>) -> Self {
        if let Some(port) = lookup("WARDEN_PORT") {
            match port.parse() {
                Ok(port) => self.gateway.port = port,
                Err(_) => tracing::warn!(value = %port, "Ignoring invalid WARDEN_PORT"),
            }
        }

        if let Some(bind) = lookup("WARDEN_BIND") {
            self.gateway.bind_address = bind;
        }

        if let Some(url) = lookup("WARDEN_DATABASE_URL") {
            self.database.url = url;
        }

        if let Some(secret) = lookup("WARDEN_JWT_SECRET").filter(|s| !s.is_empty()) {
            self.auth.jwt_secret = Some(secret);
        }

        if let Some(key) = lookup("WARDEN_MASTER_KEY").filter(|s| !s.is_empty()) {
            self.auth.master_key = Some(key);
        }

        if let Some(hours) = lookup("WARDEN_TOKEN_EXPIRY_HOURS") {
            match hours.parse() {
                Ok(hours) => self.auth.token_expiry_hours = hours,
                Err(_) => {
                    tracing::warn!(value = %hours, "Ignoring invalid WARDEN_TOKEN_EXPIRY_HOURS");
                }
            }
        }

        self
    }

    /// Validate the configuration.
    ///
    /// # Errors
    ///
    /// Returns `ConfigError::Validation` describing the first invalid field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.gateway.port == 0 {
            return Err(ConfigError::Validation(
                "Gateway port cannot be 0".to_string(),
            ));
        }

        if self.database.max_connections == 0 {
            return Err(ConfigError::Validation(
                "Database max connections must be at least 1".to_string(),
            ));
        }

        if !(1..=MAX_TOKEN_EXPIRY_HOURS).contains(&self.auth.token_expiry_hours) {
            return Err(ConfigError::Validation(format!(
                "Token expiry must be between 1 and {MAX_TOKEN_EXPIRY_HOURS} hours"
            )));
        }

        Ok(())
    }
}

/// HTTP listener configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GatewayConfig {
    /// Port to listen on.
    #[serde(default = "default_port")]
    pub port: u16,

    /// Address to bind.
    #[serde(default = "default_bind_address")]
    pub bind_address: String,

    /// Enable permissive CORS.
    #[serde(default = "default_true")]
    pub cors: bool,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            port: default_port(),
            bind_address: default_bind_address(),
            cors: true,
        }
    }
}

const fn default_port() -> u16 {
    3000
}

fn default_bind_address() -> String {
    "127.0.0.1".to_string()
}

const fn default_true() -> bool {
    true
}

/// Credential store configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DatabaseConfig {
    /// Database connection URL.
    #[serde(default = "default_database_url")]
    pub url: String,

    /// Maximum pooled connections.
    #[serde(default = "default_max_connections")]
    pub max_connections: u32,
}

impl Default for DatabaseConfig {
    fn default() -> Self {
        Self {
            url: default_database_url(),
            max_connections: default_max_connections(),
        }
    }
}

fn default_database_url() -> String {
    format!("sqlite://{}", Config::state_dir().join("warden.db").display())
}

const fn default_max_connections() -> u32 {
    5
}

/// Authentication configuration.
#[derive(Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct AuthConfig {
    /// Token signing secret. Generated at startup if not set.
    #[serde(default)]
    pub jwt_secret: Option<String>,

    /// Bootstrap secret for admin registration and master-key login.
    #[serde(default)]
    pub master_key: Option<String>,

    /// Access token expiry in hours.
    #[serde(default = "default_token_expiry")]
    pub token_expiry_hours: u64,
}

const fn default_token_expiry() -> u64 {
    DEFAULT_TOKEN_EXPIRY_HOURS
}

impl Default for AuthConfig {
    fn default() -> Self {
        Self {
            jwt_secret: None,
            master_key: None,
            token_expiry_hours: default_token_expiry(),
        }
    }
}

impl AuthConfig {
    /// Create a new auth config builder.
    #[must_use]
    pub fn builder() -> AuthConfigBuilder {
        AuthConfigBuilder::default()
    }

    /// Get token expiry as Duration.
    #[must_use]
    pub const fn token_expiry(&self) -> Duration {
        Duration::from_secs(self.token_expiry_hours.saturating_mul(3600))
    }
}

impl std::fmt::Debug for AuthConfig {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let redact = |v: &Option<String>| v.as_ref().map(|_| "[REDACTED]");
        f.debug_struct("AuthConfig")
            .field("jwt_secret", &redact(&self.jwt_secret))
            .field("master_key", &redact(&self.master_key))
            .field("token_expiry_hours", &self.token_expiry_hours)
            .finish()
    }
}

/// Builder for `AuthConfig`.
#[derive(Debug, Default)]
pub struct AuthConfigBuilder {
    config: AuthConfig,
}

impl AuthConfigBuilder {
    /// Set the token signing secret.
    #[must_use]
    pub fn jwt_secret(mut self, secret: impl Into<String>) -> Self {
        self.config.jwt_secret = Some(secret.into());
        self
    }

    /// Set the bootstrap master key.
    #[must_use]
    pub fn master_key(mut self, key: impl Into<String>) -> Self {
        self.config.master_key = Some(key.into());
        self
    }

    /// Set token expiry in hours.
    #[must_use]
    pub const fn token_expiry_hours(mut self, hours: u64) -> Self {
        self.config.token_expiry_hours = hours;
        self
    }

    /// Build the config.
    #[must_use]
    pub fn build(self) -> AuthConfig {
        self.config
    }
}
