//! Status command - probe a running gateway.

use std::time::Duration;

use anyhow::Result;

use crate::ui;

/// Status command arguments.
#[derive(Debug, Clone, Default)]
pub struct StatusArgs {
    /// Port to probe.
    pub port: Option<u16>,
}

/// Run the status command.
pub async fn run_status(args: StatusArgs) -> Result<()> {
    ui::header("Warden Status");

    let port = match args.port {
        Some(port) => port,
        None => super::load_config()?.gateway.port,
    };
    ui::kv("Port", &port.to_string());

    match probe_health(port).await {
        Ok(body) => ui::success(&format!("Gateway is running ({body})")),
        Err(e) => {
            ui::error(&format!("Gateway is not reachable: {e}"));
            ui::info("Start with: warden serve");
        }
    }

    Ok(())
}

/// Fetch `GET /health`.
async fn probe_health(port: u16) -> Result<String, String> {
    let client = reqwest::Client::builder()
        .timeout(Duration::from_secs(2))
        .build()
        .map_err(|e| e.to_string())?;

    let resp = client
        .get(format!("http://127.0.0.1:{port}/health"))
        .send()
        .await
        .map_err(|e| e.to_string())?;

    if !resp.status().is_success() {
        return Err(format!("HTTP {}", resp.status()));
    }

    resp.text().await.map_err(|e| e.to_string())
}
