//! # Warden Core
//!
//! Shared building blocks for the Warden authentication service.
//!
//! This crate provides:
//! - Configuration loading and validation (JSON5 file + environment overrides)
//! - Secret wrappers that never print their contents
//! - Input validation and normalization for user-supplied fields

#![forbid(unsafe_code)]
#![warn(missing_docs)]

pub mod config;
pub mod secrets;
pub mod validation;

pub use config::{
    AuthConfig, AuthConfigBuilder, Config, ConfigError, DatabaseConfig, GatewayConfig,
    MAX_TOKEN_EXPIRY_HOURS,
};
pub use secrets::MasterKey;
pub use validation::{ValidationError, normalize_email, normalize_name, require_non_empty};
