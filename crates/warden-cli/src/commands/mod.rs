//! CLI command implementations.

pub mod admin;
pub mod config;
pub mod serve;
pub mod status;

pub use admin::run_admin;
pub use config::run_config;
pub use serve::run_serve;
pub use status::run_status;

use warden_core::Config;

use crate::ui;

/// Load the config file (or defaults) and apply `WARDEN_*` overrides.
///
/// # Errors
///
/// Returns error if the file exists but is invalid, or overrides are out of range.
pub fn load_config() -> anyhow::Result<Config> {
    let path = Config::default_path();
    if !path.exists() {
        ui::warning(&format!(
            "No configuration at {}, using defaults",
            path.display()
        ));
    }

    tracing::debug!(path = %path.display(), "Loading configuration");
    let config = Config::load_default()?.with_env_overrides();
    config.validate()?;
    Ok(config)
}
