//! Serve command - run the gateway server.

use anyhow::Result;

use crate::ui;

/// Serve command arguments.
#[derive(Debug, Clone, Default)]
pub struct ServeArgs {
    /// Port override.
    pub port: Option<u16>,
    /// Bind address override.
    pub bind: Option<String>,
}

/// Run the gateway until Ctrl-C.
pub async fn run_serve(args: ServeArgs) -> Result<()> {
    let mut config = super::load_config()?;

    if let Some(port) = args.port {
        config.gateway.port = port;
    }
    if let Some(bind) = args.bind {
        config.gateway.bind_address = bind;
    }
    config.validate()?;
    tracing::debug!(
        bind = %config.gateway.bind_address,
        port = config.gateway.port,
        database = %config.database.url,
        "Resolved serve configuration"
    );

    ui::header("Starting Warden Gateway");
    ui::kv(
        "Address",
        &format!("{}:{}", config.gateway.bind_address, config.gateway.port),
    );
    ui::kv("Database", &config.database.url);
    ui::kv(
        "Token expiry",
        &format!("{}h", config.auth.token_expiry_hours),
    );
    if config.auth.master_key.as_deref().is_none_or(str::is_empty) {
        ui::warning("No master key configured; admin registration is disabled");
    }
    println!();
    ui::info("Press Ctrl+C to stop");
    println!();

    warden_gateway::start(config).await?;

    ui::success("Gateway stopped");
    Ok(())
}
