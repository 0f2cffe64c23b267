//! Config command - inspect configuration.

use anyhow::Result;
use serde_json::Value;
use warden_core::Config;
use warden_gateway::auth::JwtManager;

use crate::ui;

const REDACTED: &str = "[REDACTED]";

/// Config command arguments.
#[derive(Debug, Clone)]
pub struct ConfigArgs {
    /// What to do.
    pub action: ConfigAction,
}

/// Config actions.
#[derive(Debug, Clone, Copy)]
pub enum ConfigAction {
    /// Print the effective configuration.
    Show,
    /// Print the config file path.
    Path,
    /// Print a new JWT secret.
    GenerateSecret,
}

/// Run the config command.
pub fn run_config(args: &ConfigArgs) -> Result<()> {
    match args.action {
        ConfigAction::Show => show_config(),
        ConfigAction::Path => {
            println!("{}", Config::default_path().display());
            Ok(())
        }
        ConfigAction::GenerateSecret => {
            println!("{}", JwtManager::generate_hex_secret());
            Ok(())
        }
    }
}

fn show_config() -> Result<()> {
    let config = super::load_config()?;

    ui::header("Warden Configuration");
    ui::kv("File", &Config::default_path().display().to_string());
    println!();
    println!("{}", serde_json::to_string_pretty(&redacted(&config)?)?);

    Ok(())
}

/// Serialize `config` with both secrets masked.
fn redacted(config: &Config) -> Result<Value> {
    let mut value = serde_json::to_value(config)?;

    if let Some(auth) = value.get_mut("auth").and_then(Value::as_object_mut) {
        for key in ["jwtSecret", "masterKey"] {
            if let Some(secret) = auth.get_mut(key) {
                if !secret.is_null() {
                    *secret = Value::String(REDACTED.to_string());
                }
            }
        }
    }

    Ok(value)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use warden_core::AuthConfig;

    use super::*;

    #[test]
    fn test_redacts_secrets() {
        let config = Config {
            auth: AuthConfig::builder()
                .jwt_secret("jwt-value")
                .master_key("master-value")
                .build(),
            ..Config::default()
        };

        let value = redacted(&config).unwrap();
        assert_eq!(value["auth"]["jwtSecret"], REDACTED);
        assert_eq!(value["auth"]["masterKey"], REDACTED);
        assert_eq!(value["auth"]["tokenExpiryHours"], 8);

        let text = value.to_string();
        assert!(!text.contains("jwt-value"));
        assert!(!text.contains("master-value"));
    }

    #[test]
    fn test_unset_secrets_stay_null() {
        let value = redacted(&Config::default()).unwrap();
        assert!(value["auth"]["jwtSecret"].is_null());
        assert!(value["auth"]["masterKey"].is_null());
    }
}
